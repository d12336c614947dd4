//! 绘图会话
//!
//! 持有全部领域状态（相机、视口、实体、约束、比例、配置），
//! 以可变引用传给每个工具的事件处理方法。

use crate::events::PointerEvent;
use zdraft_core::camera::{Camera, Viewport};
use zdraft_core::config::DraftConfig;
use zdraft_core::constraint::{ConstraintManager, SnapScene};
use zdraft_core::entity::EntityId;
use zdraft_core::entity_manager::EntityManager;
use zdraft_core::math::Point2;
use zdraft_core::properties::Color;
use zdraft_core::scale::ScaleManager;

#[derive(Debug)]
pub struct DraftingSession {
    pub camera: Camera,
    pub viewport: Viewport,
    pub entities: EntityManager,
    pub constraints: ConstraintManager,
    pub scales: ScaleManager,
    pub config: DraftConfig,
    /// 新建实体使用的颜色
    pub color: Color,
}

impl DraftingSession {
    pub fn new(config: DraftConfig) -> Self {
        Self {
            camera: Camera::new(),
            viewport: Viewport::default(),
            entities: EntityManager::with_tolerance(config.hit_tolerances()),
            constraints: ConstraintManager::new(config.snap_threshold),
            scales: ScaleManager::new(),
            color: config.default_color,
            config,
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// 指针位置对应的世界坐标（未经约束）
    pub fn world_position(&self, event: &PointerEvent) -> Point2 {
        self.camera.screen_to_world(event.x, event.y, &self.viewport)
    }

    /// 世界坐标对应的指针事件
    pub fn pointer_at(&self, world: Point2) -> PointerEvent {
        let (x, y) = self.camera.world_to_screen(world, &self.viewport);
        PointerEvent::new(x, y)
    }

    /// 指针位置经约束链调整后的世界坐标
    ///
    /// `reference` 缺省为指针位置本身；`exclude` 中的实体不参与点捕捉。
    /// 捕捉命中的点会被设为高亮，未命中时清除高亮。
    pub fn resolve_point(
        &mut self,
        event: &PointerEvent,
        reference: Option<Point2>,
        exclude: &[EntityId],
    ) -> Point2 {
        let current = self.world_position(event);
        let reference = reference.unwrap_or(current);
        let adjustment = {
            let scene = SnapScene::new(&self.entities).excluding(exclude);
            self.constraints.apply_constraints(current, reference, &scene)
        };
        self.entities.set_highlight(adjustment.snapped_to);
        adjustment.point
    }
}

impl Default for DraftingSession {
    fn default() -> Self {
        Self::new(DraftConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zdraft_core::constraint::ConstraintKind;
    use zdraft_core::math::EPSILON;

    #[test]
    fn test_resolve_without_constraints_is_identity() {
        let mut session = DraftingSession::default();
        let event = session.pointer_at(Point2::new(0.3, -0.2));
        let p = session.resolve_point(&event, None, &[]);
        assert!((p - Point2::new(0.3, -0.2)).norm() < 1e-9);
        assert_eq!(session.entities.highlighted(), None);
    }

    #[test]
    fn test_resolve_snaps_and_highlights() {
        let mut session = DraftingSession::default();
        let target = session.entities.add_point(Point2::new(0.5, 0.5));
        session.constraints.toggle_constraint(ConstraintKind::PointSnap);

        let event = session.pointer_at(Point2::new(0.51, 0.5));
        let p = session.resolve_point(&event, None, &[]);
        assert!((p - Point2::new(0.5, 0.5)).norm() < EPSILON);
        assert_eq!(session.entities.highlighted(), Some(target));

        // 排除后不再捕捉
        let p = session.resolve_point(&event, None, &[target]);
        assert!((p.x - 0.51).abs() < 1e-9);
        assert_eq!(session.entities.highlighted(), None);
    }

    #[test]
    fn test_resolve_orthogonal_uses_reference() {
        let mut session = DraftingSession::default();
        session.constraints.toggle_constraint(ConstraintKind::Orthogonal);
        let event = session.pointer_at(Point2::new(0.5, 0.1));
        let p = session.resolve_point(&event, Some(Point2::origin()), &[]);
        assert!((p.x - 0.5).abs() < 1e-9);
        assert!(p.y.abs() < EPSILON);
    }
}
