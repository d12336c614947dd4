//! 点工具：一次点击创建一个点

use crate::error::ToolResult;
use crate::events::PointerEvent;
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use zdraft_core::entity::Entity;
use zdraft_core::geometry::{Geometry, Point};
use zdraft_core::properties::Color;

#[derive(Debug, Default)]
pub struct PointTool;

impl PointTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for PointTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Point
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        color: Color,
    ) -> ToolResult<()> {
        let position = session.resolve_point(&event, None, &[]);
        let point = Entity::new(Geometry::Point(Point::from_point2(position))).with_color(color);
        session.entities.add_entity(point);
        Ok(())
    }

    fn cancel(&mut self, _session: &mut DraftingSession) {}

    fn is_active(&self) -> bool {
        false
    }
}
