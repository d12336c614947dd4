//! 选择/移动工具
//!
//! 点击时做点击测试；命中则进入拖拽，记录锚点。拖拽中每次移动按
//! 与上一次位置的增量平移实体，松开鼠标结束拖拽。
//! 拖拽中取消会把实体移回锚点。

use crate::error::ToolResult;
use crate::events::PointerEvent;
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use tracing::{debug, warn};
use zdraft_core::entity::EntityId;
use zdraft_core::math::Point2;
use zdraft_core::properties::Color;

#[derive(Debug, Clone, Copy)]
struct Drag {
    entity: EntityId,
    anchor: Point2,
    last: Point2,
}

/// 两个工具共用的拖拽状态
#[derive(Debug, Default)]
struct Dragger {
    drag: Option<Drag>,
}

impl Dragger {
    /// 点击测试并开始拖拽，返回命中的实体
    fn grab(&mut self, session: &DraftingSession, event: &PointerEvent) -> Option<EntityId> {
        let position = session.world_position(event);
        let entity = session.entities.hit_test(position)?;
        self.drag = Some(Drag {
            entity,
            anchor: position,
            last: position,
        });
        Some(entity)
    }

    fn drag_to(&mut self, session: &mut DraftingSession, event: &PointerEvent) -> ToolResult<()> {
        let Some(drag) = self.drag.as_mut() else {
            return Ok(());
        };
        let position = session.world_position(event);
        session.entities.translate_entity(drag.entity, position - drag.last)?;
        drag.last = position;
        Ok(())
    }

    fn release(&mut self) {
        if let Some(drag) = self.drag.take() {
            debug!(entity = %drag.entity, dx = drag.last.x - drag.anchor.x, dy = drag.last.y - drag.anchor.y, "drag finished");
        }
    }

    fn revert(&mut self, session: &mut DraftingSession) {
        if let Some(drag) = self.drag.take() {
            if let Err(err) = session.entities.translate_entity(drag.entity, drag.anchor - drag.last) {
                warn!(entity = %drag.entity, %err, "failed to revert drag");
            }
        }
    }
}

/// 选择工具：命中的实体成为高亮选中项，并可拖拽
#[derive(Debug, Default)]
pub struct SelectTool {
    dragger: Dragger,
    selected: Option<EntityId>,
}

impl SelectTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        _color: Color,
    ) -> ToolResult<()> {
        self.selected = self.dragger.grab(session, &event);
        session.entities.set_highlight(self.selected);
        Ok(())
    }

    fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        self.dragger.drag_to(session, &event)
    }

    fn on_mouse_up(&mut self, _session: &mut DraftingSession, _event: PointerEvent) -> ToolResult<()> {
        self.dragger.release();
        Ok(())
    }

    fn cancel(&mut self, session: &mut DraftingSession) {
        self.dragger.revert(session);
    }

    fn is_active(&self) -> bool {
        self.dragger.drag.is_some()
    }
}

/// 移动工具：只拖拽，不改变选中状态
#[derive(Debug, Default)]
pub struct MoveTool {
    dragger: Dragger,
}

impl MoveTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for MoveTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Move
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        _color: Color,
    ) -> ToolResult<()> {
        self.dragger.grab(session, &event);
        Ok(())
    }

    fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        self.dragger.drag_to(session, &event)
    }

    fn on_mouse_up(&mut self, _session: &mut DraftingSession, _event: PointerEvent) -> ToolResult<()> {
        self.dragger.release();
        Ok(())
    }

    fn cancel(&mut self, session: &mut DraftingSession) {
        self.dragger.revert(session);
    }

    fn is_active(&self) -> bool {
        self.dragger.drag.is_some()
    }
}
