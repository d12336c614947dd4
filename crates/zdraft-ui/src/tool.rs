//! Tool 系统
//!
//! 每个绘图/导航工具是一个独立的状态机，直接在 [`DraftingSession`] 上
//! 注册预览和最终实体。施工过程中创建的实体立即可见。
//!
//! 约定：`cancel` 必须幂等，并让实体集合恢复到本次施工开始之前的状态。

use crate::error::ToolResult;
use crate::events::{Key, PointerEvent};
use crate::session::DraftingSession;
use serde::{Deserialize, Serialize};
use zdraft_core::properties::Color;

/// 工具类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    // 绘图
    Point,
    Line,
    Polyline,
    Circle,
    Arc,
    Ellipse,
    Polygon,
    Rectangle,
    Spline,
    Text,

    // 编辑
    Select,
    Move,

    // 导航
    Pan,
    Zoom,
}

impl ToolKind {
    pub const ALL: [ToolKind; 14] = [
        ToolKind::Point,
        ToolKind::Line,
        ToolKind::Polyline,
        ToolKind::Circle,
        ToolKind::Arc,
        ToolKind::Ellipse,
        ToolKind::Polygon,
        ToolKind::Rectangle,
        ToolKind::Spline,
        ToolKind::Text,
        ToolKind::Select,
        ToolKind::Move,
        ToolKind::Pan,
        ToolKind::Zoom,
    ];

    /// 注册名
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Point => "point",
            ToolKind::Line => "line",
            ToolKind::Polyline => "polyline",
            ToolKind::Circle => "circle",
            ToolKind::Arc => "arc",
            ToolKind::Ellipse => "ellipse",
            ToolKind::Polygon => "polygon",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Spline => "spline",
            ToolKind::Text => "text",
            ToolKind::Select => "select",
            ToolKind::Move => "move",
            ToolKind::Pan => "pan",
            ToolKind::Zoom => "zoom",
        }
    }

    /// 默认快捷键
    pub fn shortcut(&self) -> char {
        match self {
            ToolKind::Point => 'p',
            ToolKind::Line => 'l',
            ToolKind::Polyline => 'o',
            ToolKind::Circle => 'c',
            ToolKind::Arc => 'a',
            ToolKind::Ellipse => 'e',
            ToolKind::Polygon => 'g',
            ToolKind::Rectangle => 'r',
            ToolKind::Spline => 's',
            ToolKind::Text => 't',
            ToolKind::Select => 'v',
            ToolKind::Move => 'm',
            ToolKind::Pan => 'h',
            ToolKind::Zoom => 'z',
        }
    }

    pub fn from_name(name: &str) -> Option<ToolKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// 所有工具的统一接口
pub trait Tool: Send {
    fn kind(&self) -> ToolKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    // ========== 事件处理 ==========

    /// 左键点击，`color` 为新建实体的颜色
    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        color: Color,
    ) -> ToolResult<()>;

    fn on_mouse_move(&mut self, _session: &mut DraftingSession, _event: PointerEvent) -> ToolResult<()> {
        Ok(())
    }

    fn on_mouse_up(&mut self, _session: &mut DraftingSession, _event: PointerEvent) -> ToolResult<()> {
        Ok(())
    }

    /// 滚轮，`delta > 0` 表示向上滚
    fn on_wheel(
        &mut self,
        _session: &mut DraftingSession,
        _event: PointerEvent,
        _delta: f64,
    ) -> ToolResult<()> {
        Ok(())
    }

    /// 数值输入（例如多边形边数）
    fn on_value(&mut self, _session: &mut DraftingSession, _value: f64) -> ToolResult<()> {
        Ok(())
    }

    /// 按键；默认只处理 Escape
    fn on_key_down(&mut self, session: &mut DraftingSession, key: Key) -> ToolResult<()> {
        if key == Key::Escape {
            self.cancel(session);
        }
        Ok(())
    }

    /// 放弃当前施工并撤掉它创建的全部实体
    fn cancel(&mut self, session: &mut DraftingSession);

    /// 是否处于施工（或拖拽、编辑）中
    fn is_active(&self) -> bool;

    /// 是否独占键盘输入（文本编辑时快捷键不生效）
    fn captures_keys(&self) -> bool {
        false
    }
}
