//! 圆工具
//!
//! 第一次点击确定圆心（已提交的点）并创建半径为零的圆；
//! 移动指针时由圆心到指针的距离更新半径，临时的边缘标记跟随指针；
//! 第二次点击或 Enter 完成。

use super::discard_all;
use crate::error::ToolResult;
use crate::events::{Key, PointerEvent};
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::error::CoreError;
use zdraft_core::geometry::{Circle, Geometry, Point};
use zdraft_core::math::Point2;
use zdraft_core::properties::Color;

#[derive(Debug, Clone, Copy)]
struct Draft {
    center: Point2,
    center_point: EntityId,
    circle: EntityId,
    edge: EntityId,
}

#[derive(Debug, Default)]
pub struct CircleTool {
    draft: Option<Draft>,
}

impl CircleTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn track_edge(session: &mut DraftingSession, draft: Draft, event: &PointerEvent) -> ToolResult<()> {
        let edge = session.resolve_point(event, Some(draft.center), &[draft.edge]);
        session.entities.set_point_position(draft.edge, edge)?;
        match session.entities.get_mut(draft.circle).map(|e| &mut e.geometry) {
            Some(Geometry::Circle(circle)) => {
                circle.set_radius((edge - draft.center).norm());
                Ok(())
            }
            _ => Err(CoreError::EntityNotFound(draft.circle).into()),
        }
    }

    fn finish(&mut self, session: &mut DraftingSession) {
        if let Some(draft) = self.draft.take() {
            session.entities.discard(draft.edge);
        }
    }
}

impl Tool for CircleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Circle
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
                let marker = Entity::new(Geometry::Point(Point::from_point2(center))).with_color(color);
                let center_point = session.entities.add_entity(marker.clone());
                let circle = session
                    .entities
                    .add_entity(Entity::new(Geometry::Circle(Circle::new(center, 0.0))).with_color(color));
                let edge = session.entities.add_temporary_entity(marker);
                self.draft = Some(Draft {
                    center,
                    center_point,
                    circle,
                    edge,
                });
            }
            Some(draft) => {
                Self::track_edge(session, draft, &event)?;
                self.finish(session);
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

    fn on_key_down(&mut self, session: &mut DraftingSession, key: Key) -> ToolResult<()> {
        match key {
            Key::Enter => self.finish(session),
            Key::Escape => self.cancel(session),
            _ => {}
        }
        Ok(())
    }

    fn cancel(&mut self, session: &mut DraftingSession) {
        if let Some(draft) = self.draft.take() {
            discard_all(session, self.kind(), &[draft.center_point, draft.circle, draft.edge]);
        }
    }

    fn is_active(&self) -> bool {
        self.draft.is_some()
    }
}
