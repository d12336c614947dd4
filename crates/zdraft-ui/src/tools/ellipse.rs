//! 椭圆工具
//!
//! 第一次点击确定中心；临时边缘点跟随指针，`radius_x = |dx|`，`radius_y = |dy|`；
//! 第二次点击完成。

use super::discard_all;
use crate::error::ToolResult;
use crate::events::PointerEvent;
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::error::CoreError;
use zdraft_core::geometry::{Ellipse, Geometry, Point};
use zdraft_core::math::Point2;
use zdraft_core::properties::Color;

#[derive(Debug, Clone, Copy)]
struct Draft {
    center: Point2,
    ellipse: EntityId,
    edge: EntityId,
}

#[derive(Debug, Default)]
pub struct EllipseTool {
    draft: Option<Draft>,
}

impl EllipseTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn track_edge(session: &mut DraftingSession, draft: Draft, event: &PointerEvent) -> ToolResult<()> {
        let edge = session.resolve_point(event, Some(draft.center), &[draft.edge]);
        session.entities.set_point_position(draft.edge, edge)?;
        match session.entities.get_mut(draft.ellipse).map(|e| &mut e.geometry) {
            Some(Geometry::Ellipse(ellipse)) => {
                let delta = edge - draft.center;
                ellipse.set_radii(delta.x.abs(), delta.y.abs());
                Ok(())
            }
            _ => Err(CoreError::EntityNotFound(draft.ellipse).into()),
        }
    }
}

impl Tool for EllipseTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Ellipse
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        color: Color,
    ) -> ToolResult<()> {
        match self.draft {
            None => {
                let center = session.resolve_point(&event, None, &[]);
                let ellipse = session.entities.add_entity(
                    Entity::new(Geometry::Ellipse(Ellipse::new(center, 0.0, 0.0))).with_color(color),
                );
                let edge = session
                    .entities
                    .add_temporary_entity(Entity::new(Geometry::Point(Point::from_point2(center))));
                self.draft = Some(Draft { center, ellipse, edge });
            }
            Some(draft) => {
                Self::track_edge(session, draft, &event)?;
                session.entities.discard(draft.edge);
                self.draft = None;
            }
        }
        Ok(())
    }

    fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        match self.draft {
            Some(draft) => Self::track_edge(session, draft, &event),
            None => Ok(()),
        }
    }

    fn cancel(&mut self, session: &mut DraftingSession) {
        if let Some(draft) = self.draft.take() {
            discard_all(session, self.kind(), &[draft.ellipse, draft.edge]);
        }
    }

    fn is_active(&self) -> bool {
        self.draft.is_some()
    }
}
