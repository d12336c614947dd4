//! 工具管理器
//!
//! 按名称注册工具实例，并把事件转发给当前激活的工具。

use crate::error::{ToolError, ToolResult};
use crate::events::{Key, PointerEvent};
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use crate::tools::create_tool;
use std::collections::HashMap;
use tracing::{debug, info};
use zdraft_core::config::DraftConfig;

pub struct ToolManager {
    tools: HashMap<String, Box<dyn Tool>>,
    active: Option<String>,
}

impl ToolManager {
    /// 空的管理器
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            active: None,
        }
    }

    /// 注册全部内置工具，默认激活选择工具
    pub fn with_defaults(config: &DraftConfig) -> Self {
        let mut manager = Self::new();
        for kind in ToolKind::ALL {
            manager.register(kind.name(), create_tool(kind, config));
        }
        manager.set_active_tool(ToolKind::Select.name());
        manager
    }

    /// 注册工具；同名工具被替换
    pub fn register(&mut self, name: &str, tool: Box<dyn Tool>) {
        self.tools.insert(name.to_string(), tool);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// 已注册的工具名（排序后）
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 切换激活工具；未注册的名称被忽略
    ///
    /// 不会取消原工具的施工，未完成的预览实体会留在实体管理器中。
    /// 需要清理时使用 [`ToolManager::switch_tool`]。
    pub fn set_active_tool(&mut self, name: &str) -> bool {
        if !self.tools.contains_key(name) {
            debug!(tool = name, "ignoring unknown tool");
            return false;
        }
        self.active = Some(name.to_string());
        info!(tool = name, "tool activated");
        true
    }

    /// 先取消原工具的施工，再切换
    pub fn switch_tool(&mut self, name: &str, session: &mut DraftingSession) -> ToolResult<()> {
        if !self.tools.contains_key(name) {
            return Err(ToolError::UnknownTool(name.to_string()));
        }
        if let Some(tool) = self.active_tool_mut() {
            tool.cancel(session);
        }
        self.set_active_tool(name);
        Ok(())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_tool(&self) -> Option<&dyn Tool> {
        let name = self.active.as_ref()?;
        self.tools.get(name).map(|tool| &**tool)
    }

    pub fn active_tool_mut(&mut self) -> Option<&mut (dyn Tool + 'static)> {
        let name = self.active.as_ref()?;
        self.tools.get_mut(name).map(|tool| &mut **tool)
    }

    /// 按名称取得已注册工具
    pub fn tool_mut(&mut self, name: &str) -> Option<&mut (dyn Tool + 'static)> {
        self.tools.get_mut(name).map(|tool| &mut **tool)
    }

    // ========== 事件转发 ==========

    pub fn on_left_click(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        let color = session.color;
        match self.active_tool_mut() {
            Some(tool) => tool.on_left_click(session, event, color),
            None => Ok(()),
        }
    }

    pub fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        match self.active_tool_mut() {
            Some(tool) => tool.on_mouse_move(session, event),
            None => Ok(()),
        }
    }

    pub fn on_mouse_up(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        match self.active_tool_mut() {
            Some(tool) => tool.on_mouse_up(session, event),
            None => Ok(()),
        }
    }

    pub fn on_wheel(&mut self, session: &mut DraftingSession, event: PointerEvent, delta: f64) -> ToolResult<()> {
        match self.active_tool_mut() {
            Some(tool) => tool.on_wheel(session, event, delta),
            None => Ok(()),
        }
    }

    pub fn on_value(&mut self, session: &mut DraftingSession, value: f64) -> ToolResult<()> {
        match self.active_tool_mut() {
            Some(tool) => tool.on_value(session, value),
            None => Ok(()),
        }
    }

    pub fn on_key_down(&mut self, session: &mut DraftingSession, key: Key) -> ToolResult<()> {
        match self.active_tool_mut() {
            Some(tool) => tool.on_key_down(session, key),
            None => Ok(()),
        }
    }

    /// 取消当前工具的施工
    pub fn cancel(&mut self, session: &mut DraftingSession) {
        if let Some(tool) = self.active_tool_mut() {
            tool.cancel(session);
        }
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}
