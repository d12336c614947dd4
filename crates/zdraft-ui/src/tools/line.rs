//! 线段工具
//!
//! 第一次点击创建起点、跟随指针的终点和连接两者的线段（都立即提交），
//! 第二次点击固定终点。

use super::discard_all;
use crate::error::ToolResult;
use crate::events::PointerEvent;
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::geometry::{Geometry, Line, Point};
use zdraft_core::properties::Color;

/// 施工中的线段
#[derive(Debug, Clone, Copy)]
struct Draft {
    start: EntityId,
    end: EntityId,
    line: EntityId,
}

#[derive(Debug, Default)]
pub struct LineTool {
    draft: Option<Draft>,
}

impl LineTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// 终点跟随指针，参考点为起点
    fn track_end(&self, session: &mut DraftingSession, draft: Draft, event: &PointerEvent) -> ToolResult<()> {
        let reference = session.entities.point_position(draft.start);
        let position = session.resolve_point(event, reference, &[draft.end]);
        session.entities.set_point_position(draft.end, position)?;
        Ok(())
    }
}

impl Tool for LineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Line
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        color: Color,
    ) -> ToolResult<()> {
        match self.draft {
            None => {
                let position = session.resolve_point(&event, None, &[]);
                let point = Entity::new(Geometry::Point(Point::from_point2(position))).with_color(color);
                let start = session.entities.add_entity(point.clone());
                let end = session.entities.add_entity(point);
                let line = session
                    .entities
                    .add_entity(Entity::new(Geometry::Line(Line::new(start, end))).with_color(color));
                self.draft = Some(Draft { start, end, line });
            }
            Some(draft) => {
                self.track_end(session, draft, &event)?;
                self.draft = None;
            }
        }
        Ok(())
    }

    fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        match self.draft {
            Some(draft) => self.track_end(session, draft, &event),
            None => Ok(()),
        }
    }

    fn cancel(&mut self, session: &mut DraftingSession) {
        if let Some(draft) = self.draft.take() {
            discard_all(session, self.kind(), &[draft.start, draft.end, draft.line]);
        }
    }

    fn is_active(&self) -> bool {
        self.draft.is_some()
    }
}
