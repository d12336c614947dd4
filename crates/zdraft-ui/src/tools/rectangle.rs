//! 矩形工具：第一次点击确定一个角点，指针确定对角点，第二次点击或 Enter 完成

use super::discard_all;
use crate::error::ToolResult;
use crate::events::{Key, PointerEvent};
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::error::CoreError;
use zdraft_core::geometry::{Geometry, Rectangle};
use zdraft_core::math::Point2;
use zdraft_core::properties::Color;

#[derive(Debug, Clone, Copy)]
struct Draft {
    corner: Point2,
    rectangle: EntityId,
}

#[derive(Debug, Default)]
pub struct RectangleTool {
    draft: Option<Draft>,
}

impl RectangleTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn track_corner(session: &mut DraftingSession, draft: Draft, event: &PointerEvent) -> ToolResult<()> {
        let opposite = session.resolve_point(event, Some(draft.corner), &[]);
        match session.entities.get_mut(draft.rectangle).map(|e| &mut e.geometry) {
            Some(Geometry::Rectangle(rect)) => {
                rect.corner_b = opposite;
                Ok(())
            }
            _ => Err(CoreError::EntityNotFound(draft.rectangle).into()),
        }
    }
}

impl Tool for RectangleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Rectangle
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        color: Color,
    ) -> ToolResult<()> {
        match self.draft {
            None => {
                let corner = session.resolve_point(&event, None, &[]);
                let rectangle = session.entities.add_entity(
                    Entity::new(Geometry::Rectangle(Rectangle::new(corner, corner))).with_color(color),
                );
                self.draft = Some(Draft { corner, rectangle });
            }
            Some(draft) => {
                Self::track_corner(session, draft, &event)?;
                self.draft = None;
            }
        }
        Ok(())
    }

    fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        match self.draft {
            Some(draft) => Self::track_corner(session, draft, &event),
            None => Ok(()),
        }
    }

    fn on_key_down(&mut self, session: &mut DraftingSession, key: Key) -> ToolResult<()> {
        match key {
            Key::Enter => self.draft = None,
            Key::Escape => self.cancel(session),
            _ => {}
        }
        Ok(())
    }

    fn cancel(&mut self, session: &mut DraftingSession) {
        if let Some(draft) = self.draft.take() {
            discard_all(session, self.kind(), &[draft.rectangle]);
        }
    }

    fn is_active(&self) -> bool {
        self.draft.is_some()
    }
}
