//! 样条工具（Catmull-Rom）
//!
//! 每次点击追加一个已提交控制点，末尾的临时控制点跟随指针；
//! Enter/Space 去掉临时控制点后完成。

use super::discard_all;
use crate::error::ToolResult;
use crate::events::{Key, PointerEvent};
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use tracing::debug;
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::geometry::{Geometry, Point, Spline};
use zdraft_core::math::Point2;
use zdraft_core::properties::Color;

#[derive(Debug)]
struct Draft {
    spline: EntityId,
    control_points: Vec<EntityId>,
    trailing: EntityId,
}

impl Draft {
    fn created(self) -> Vec<EntityId> {
        let mut created = self.control_points;
        created.extend([self.trailing, self.spline]);
        created
    }
}

#[derive(Debug, Default)]
pub struct SplineTool {
    draft: Option<Draft>,
}

impl SplineTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(session: &mut DraftingSession, draft: &Draft, event: &PointerEvent) -> Point2 {
        let reference = draft
            .control_points
            .last()
            .and_then(|id| session.entities.point_position(*id));
        session.resolve_point(event, reference, &[draft.trailing])
    }

    /// 用新的控制点序列替换样条并重算曲线
    fn set_control_points(session: &mut DraftingSession, spline: EntityId, ids: Vec<EntityId>) -> ToolResult<()> {
        session
            .entities
            .update_geometry(spline, Geometry::Spline(Spline::new(ids, &[])))?;
        Ok(())
    }

    fn finish(&mut self, session: &mut DraftingSession) -> ToolResult<()> {
        let Some(draft) = self.draft.take() else {
            return Ok(());
        };
        if draft.control_points.len() < 2 {
            discard_all(session, self.kind(), &draft.created());
            return Ok(());
        }
        Self::set_control_points(session, draft.spline, draft.control_points.clone())?;
        session.entities.discard(draft.trailing);
        debug!(control_points = draft.control_points.len(), "spline finished");
        Ok(())
    }
}

impl Tool for SplineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Spline
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        color: Color,
    ) -> ToolResult<()> {
        match self.draft.as_mut() {
            None => {
                let position = session.resolve_point(&event, None, &[]);
                let point = Entity::new(Geometry::Point(Point::from_point2(position))).with_color(color);
                let first = session.entities.add_entity(point.clone());
                let trailing = session.entities.add_temporary_entity(point);
                let spline = Spline::new(vec![first, trailing], &[position, position]);
                let spline = session
                    .entities
                    .add_entity(Entity::new(Geometry::Spline(spline)).with_color(color));
                self.draft = Some(Draft {
                    spline,
                    control_points: vec![first],
                    trailing,
                });
            }
            Some(draft) => {
                let position = Self::resolve(session, draft, &event);
                let point = session
                    .entities
                    .add_entity(Entity::new(Geometry::Point(Point::from_point2(position))).with_color(color));
                draft.control_points.push(point);
                session.entities.set_point_position(draft.trailing, position)?;

                let mut ids = draft.control_points.clone();
                ids.push(draft.trailing);
                Self::set_control_points(session, draft.spline, ids)?;
            }
        }
        Ok(())
    }

    fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        if let Some(draft) = self.draft.as_ref() {
            let position = Self::resolve(session, draft, &event);
            session.entities.set_point_position(draft.trailing, position)?;
        }
        Ok(())
    }

    fn on_key_down(&mut self, session: &mut DraftingSession, key: Key) -> ToolResult<()> {
        match key {
            Key::Enter | Key::Space => self.finish(session),
            Key::Escape => {
                self.cancel(session);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn cancel(&mut self, session: &mut DraftingSession) {
        if let Some(draft) = self.draft.take() {
            discard_all(session, self.kind(), &draft.created());
        }
    }

    fn is_active(&self) -> bool {
        self.draft.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{click, close, hover};
    use zdraft_core::algorithms::SPLINE_SUBDIVISIONS;

    fn spline(session: &DraftingSession) -> Spline {
        session
            .entities
            .entities()
            .iter()
            .find_map(|e| match &e.geometry {
                Geometry::Spline(s) => Some(s.clone()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_curve_follows_trailing_point() {
        let mut session = DraftingSession::default();
        let mut tool = SplineTool::new();

        click(&mut tool, &mut session, 0.0, 0.0);
        hover(&mut tool, &mut session, 0.5, 0.5);
        let curve = spline(&session).curve;
        assert!(close(*curve.last().unwrap(), Point2::new(0.5, 0.5)));
    }

    #[test]
    fn test_finish_drops_trailing_point() {
        let mut session = DraftingSession::default();
        let mut tool = SplineTool::new();

        click(&mut tool, &mut session, 0.0, 0.0);
        click(&mut tool, &mut session, 0.5, 0.5);
        click(&mut tool, &mut session, 1.0, 0.0);
        hover(&mut tool, &mut session, 0.9, -0.9);
        tool.on_key_down(&mut session, Key::Enter).unwrap();

        let s = spline(&session);
        assert_eq!(s.control_points.len(), 3);
        assert_eq!(s.curve.len(), 2 * SPLINE_SUBDIVISIONS + 1);
        assert!(close(*s.curve.last().unwrap(), Point2::new(1.0, 0.0)));
        assert!(session.entities.temporary_entities().is_empty());
        // 三个控制点 + 样条
        assert_eq!(session.entities.len(), 4);
    }

    #[test]
    fn test_escape_removes_spline_and_control_points() {
        let mut session = DraftingSession::default();
        let mut tool = SplineTool::new();

        click(&mut tool, &mut session, 0.0, 0.0);
        click(&mut tool, &mut session, 0.5, 0.5);
        tool.on_key_down(&mut session, Key::Escape).unwrap();
        assert!(session.entities.is_empty());
        assert!(session.entities.temporary_entities().is_empty());
    }
}
