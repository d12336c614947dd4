//! 正多边形工具
//!
//! 第一次点击确定中心，指针到中心的距离为外接圆半径；
//! 边数可在施工中随时修改，完成时使用当前边数。

use super::discard_all;
use crate::error::ToolResult;
use crate::events::{Key, PointerEvent};
use crate::session::DraftingSession;
use crate::tool::{Tool, ToolKind};
use zdraft_core::entity::{Entity, EntityId};
use zdraft_core::error::CoreError;
use zdraft_core::geometry::{Geometry, Polygon};
use zdraft_core::math::Point2;
use zdraft_core::properties::Color;

#[derive(Debug, Clone, Copy)]
struct Draft {
    center: Point2,
    polygon: EntityId,
}

#[derive(Debug)]
pub struct PolygonTool {
    num_sides: usize,
    draft: Option<Draft>,
}

impl PolygonTool {
    pub fn new() -> Self {
        Self::with_sides(Polygon::MIN_SIDES)
    }

    /// 指定默认边数，钳制到 `MIN_SIDES..=MAX_SIDES`
    pub fn with_sides(num_sides: usize) -> Self {
        Self {
            num_sides: num_sides.clamp(Polygon::MIN_SIDES, Polygon::MAX_SIDES),
            draft: None,
        }
    }

    pub fn num_sides(&self) -> usize {
        self.num_sides
    }

    /// 修改边数，施工中的多边形立即更新
    pub fn set_num_sides(&mut self, session: &mut DraftingSession, num_sides: usize) -> ToolResult<()> {
        self.num_sides = Polygon::check_sides(num_sides)?;
        if let Some(draft) = self.draft {
            Self::polygon_mut(session, draft.polygon)?.set_num_sides(num_sides)?;
        }
        Ok(())
    }

    fn polygon_mut<'a>(session: &'a mut DraftingSession, id: EntityId) -> ToolResult<&'a mut Polygon> {
        match session.entities.get_mut(id).map(|e| &mut e.geometry) {
            Some(Geometry::Polygon(pg)) => Ok(pg),
            _ => Err(CoreError::EntityNotFound(id).into()),
        }
    }

    fn track_radius(session: &mut DraftingSession, draft: Draft, event: &PointerEvent) -> ToolResult<()> {
        let edge = session.resolve_point(event, Some(draft.center), &[]);
        Self::polygon_mut(session, draft.polygon)?.set_radius((edge - draft.center).norm());
        Ok(())
    }
}

impl Default for PolygonTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for PolygonTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Polygon
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
                let polygon = Polygon::new(center, self.num_sides, 0.0)?;
                let polygon = session
                    .entities
                    .add_entity(Entity::new(Geometry::Polygon(polygon)).with_color(color));
                self.draft = Some(Draft { center, polygon });
            }
            Some(draft) => {
                Self::track_radius(session, draft, &event)?;
                self.draft = None;
            }
        }
        Ok(())
    }

    fn on_mouse_move(&mut self, session: &mut DraftingSession, event: PointerEvent) -> ToolResult<()> {
        match self.draft {
            Some(draft) => Self::track_radius(session, draft, &event),
            None => Ok(()),
        }
    }

    /// 数值输入为边数，四舍五入取整
    fn on_value(&mut self, session: &mut DraftingSession, value: f64) -> ToolResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::InvalidPolygonSides(0).into());
        }
        self.set_num_sides(session, value.round() as usize)
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
            discard_all(session, self.kind(), &[draft.polygon]);
        }
    }

    fn is_active(&self) -> bool {
        self.draft.is_some()
    }
}
