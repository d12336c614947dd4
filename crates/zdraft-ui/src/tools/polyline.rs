//! 多段线工具
//!
//! 每次点击追加一个已提交顶点；末尾一个临时点跟随指针形成橡皮筋段。
//! Enter/Space 去掉橡皮筋段后完成。

use super::discard_all;
use crate::error::ToolResult;
use crate::events::{Key, PointerEvent};
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use tracing::debug;
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::error::CoreError;
use zdraft_core::geometry::{Geometry, Point, Polyline};
use zdraft_core::math::Point2;
use zdraft_core::properties::Color;

#[derive(Debug)]
struct Draft {
    polyline: EntityId,
    /// 已提交的顶点
    vertices: Vec<EntityId>,
    /// 跟随指针的临时点
    trailing: EntityId,
}

#[derive(Debug, Default)]
pub struct PolylineTool {
    draft: Option<Draft>,
}

impl PolylineTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(session: &mut DraftingSession, draft: &Draft, event: &PointerEvent) -> Point2 {
        let reference = draft
            .vertices
            .last()
            .and_then(|id| session.entities.point_position(*id));
        session.resolve_point(event, reference, &[draft.trailing])
    }

    fn polyline_mut<'a>(session: &'a mut DraftingSession, id: EntityId) -> ToolResult<&'a mut Polyline> {
        match session.entities.get_mut(id).map(|e| &mut e.geometry) {
            Some(Geometry::Polyline(pl)) => Ok(pl),
            _ => Err(CoreError::EntityNotFound(id).into()),
        }
    }

    /// 完成：去掉橡皮筋段；不足两个顶点时整体放弃
    fn finish(&mut self, session: &mut DraftingSession) -> ToolResult<()> {
        let Some(draft) = self.draft.take() else {
            return Ok(());
        };
        if draft.vertices.len() < 2 {
            let mut created = draft.vertices;
            created.extend([draft.trailing, draft.polyline]);
            discard_all(session, self.kind(), &created);
            return Ok(());
        }

        Self::polyline_mut(session, draft.polyline)?.trim_last_segment();
        session.entities.discard(draft.trailing);
        debug!(vertices = draft.vertices.len(), "polyline finished");
        Ok(())
    }
}

impl Tool for PolylineTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Polyline
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
                let polyline = session.entities.add_entity(
                    Entity::new(Geometry::Polyline(Polyline::new(vec![first, trailing]))).with_color(color),
                );
                self.draft = Some(Draft {
                    polyline,
                    vertices: vec![first],
                    trailing,
                });
            }
            Some(draft) => {
                let position = Self::resolve(session, draft, &event);
                let vertex = session
                    .entities
                    .add_entity(Entity::new(Geometry::Point(Point::from_point2(position))).with_color(color));
                draft.vertices.push(vertex);

                // 新顶点插在临时点之前
                let polyline = Self::polyline_mut(session, draft.polyline)?;
                let at = polyline.vertices.len() - 1;
                polyline.vertices.insert(at, vertex);
                session.entities.set_point_position(draft.trailing, position)?;
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
            let mut created = draft.vertices;
            created.extend([draft.trailing, draft.polyline]);
            discard_all(session, self.kind(), &created);
        }
    }

    fn is_active(&self) -> bool {
        self.draft.is_some()
    }
}
