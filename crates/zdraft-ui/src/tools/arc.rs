//! 三点圆弧工具
//!
//! 依次点击起点、中间点、终点。第二次点击后以（起点, 中间点, 指针）
//! 构造临时圆弧，指针移动时重新拟合；第三次点击固定终点并提交。
//! 三点共线时圆弧退化为直线段，不报错。

use super::discard_all;
use crate::error::ToolResult;
use crate::events::PointerEvent;
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use tracing::debug;
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::error::CoreError;
use zdraft_core::geometry::{Arc, Geometry, Point};
use zdraft_core::math::Point2;
use zdraft_core::properties::Color;

/// 圆弧绘制状态
#[derive(Debug, Clone, Copy)]
enum Status {
    /// 等待起点
    SetStart,
    /// 等待中间点
    SetMid { start: EntityId },
    /// 等待终点，临时圆弧跟随指针
    SetEnd {
        start: EntityId,
        mid: EntityId,
        end: EntityId,
        arc: EntityId,
    },
}

#[derive(Debug)]
pub struct ArcTool {
    status: Status,
}

impl ArcTool {
    pub fn new() -> Self {
        Self {
            status: Status::SetStart,
        }
    }

    fn position(session: &DraftingSession, id: EntityId) -> ToolResult<Point2> {
        session
            .entities
            .point_position(id)
            .ok_or_else(|| CoreError::EntityNotFound(id).into())
    }

    /// 移动临时终点；引用它的圆弧由实体管理器重新拟合
    fn track_end(session: &mut DraftingSession, mid: EntityId, end: EntityId, event: &PointerEvent) -> ToolResult<Point2> {
        let reference = session.entities.point_position(mid);
        let position = session.resolve_point(event, reference, &[end]);
        session.entities.set_point_position(end, position)?;
        Ok(position)
    }
}

impl Default for ArcTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ArcTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Arc
    }

    fn on_left_click(
        &mut self,
        session: &mut DraftingSession,
        event: PointerEvent,
        color: Color,
    ) -> ToolResult<()> {
        let point_entity = |p: Point2| Entity::new(Geometry::Point(Point::from_point2(p))).with_color(color);

        self.status = match self.status {
            Status::SetStart => {
                let position = session.resolve_point(&event, None, &[]);
                let start = session.entities.add_entity(point_entity(position));
                Status::SetMid { start }
            }
            Status::SetMid { start } => {
                let start_position = Self::position(session, start)?;
                let position = session.resolve_point(&event, Some(start_position), &[]);
                let mid = session.entities.add_entity(point_entity(position));
                let end = session.entities.add_temporary_entity(point_entity(position));
                let arc = Arc::new([start, mid, end], [start_position, position, position]);
                let arc = session
                    .entities
                    .add_temporary_entity(Entity::new(Geometry::Arc(arc)).with_color(color));
                Status::SetEnd { start, mid, end, arc }
            }
            Status::SetEnd { mid, end, arc, .. } => {
                Self::track_end(session, mid, end, &event)?;
                session.entities.commit_temporary(end)?;
                session.entities.commit_temporary(arc)?;
                session.entities.refresh(arc);
                debug!(%arc, "arc committed");
                Status::SetStart
            }
        };
        Ok(())
    }

    fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        if let Status::SetEnd { mid, end, .. } = self.status {
            Self::track_end(session, mid, end, &event)?;
        }
        Ok(())
    }

    fn cancel(&mut self, session: &mut DraftingSession) {
        let created = match self.status {
            Status::SetStart => return,
            Status::SetMid { start } => vec![start],
            Status::SetEnd { start, mid, end, arc } => vec![start, mid, end, arc],
        };
        self.status = Status::SetStart;
        discard_all(session, self.kind(), &created);
    }

    fn is_active(&self) -> bool {
        !matches!(self.status, Status::SetStart)
    }
}
