//! 约束系统
//!
//! 约束在工具接受候选点之前对其进行调整：
//! - 正交 (Orthogonal)：锁定到过参考点的水平或竖直线
//! - 点捕捉 (PointSnap)：吸附到阈值内最近的点实体
//!
//! 约束求值是纯函数：点捕捉只报告命中的实体 ID，高亮由调用方处理。

use crate::entity::EntityId;
use crate::entity_manager::EntityManager;
use crate::math::Point2;
use serde::{Deserialize, Serialize};

/// 约束类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    Orthogonal,
    PointSnap,
}

impl ConstraintKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Orthogonal => "Orthogonal",
            ConstraintKind::PointSnap => "Point Snap",
        }
    }
}

/// 约束调整结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub point: Point2,
    /// 点捕捉命中的实体
    pub snapped_to: Option<EntityId>,
}

impl Adjustment {
    pub fn unchanged(point: Point2) -> Self {
        Self {
            point,
            snapped_to: None,
        }
    }
}

/// 约束求值时可见的场景
pub struct SnapScene<'a> {
    pub entities: &'a EntityManager,
    /// 不参与捕捉的实体（例如正在跟随指针的点本身）
    pub exclude: &'a [EntityId],
}

impl<'a> SnapScene<'a> {
    pub fn new(entities: &'a EntityManager) -> Self {
        Self {
            entities,
            exclude: &[],
        }
    }

    pub fn excluding(mut self, exclude: &'a [EntityId]) -> Self {
        self.exclude = exclude;
        self
    }
}

/// 正交约束
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrthogonalConstraint;

impl OrthogonalConstraint {
    /// 锁定到位移较大的轴；相等时取竖直方向
    pub fn apply(&self, current: Point2, reference: Point2) -> Point2 {
        let dx = (current.x - reference.x).abs();
        let dy = (current.y - reference.y).abs();
        if dx > dy {
            Point2::new(current.x, reference.y)
        } else {
            Point2::new(reference.x, current.y)
        }
    }
}

/// 点捕捉约束
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSnapConstraint {
    pub threshold: f64,
}

impl PointSnapConstraint {
    pub const DEFAULT_THRESHOLD: f64 = 0.02;

    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// 最近的点实体在阈值内时返回其坐标和 ID
    pub fn apply(&self, current: Point2, scene: &SnapScene) -> Option<Adjustment> {
        let (id, position, distance) = scene
            .entities
            .points()
            .filter(|(id, _)| !scene.exclude.contains(id))
            .map(|(id, p)| (id, p, (p - current).norm()))
            .min_by(|a, b| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))?;

        (distance <= self.threshold).then_some(Adjustment {
            point: position,
            snapped_to: Some(id),
        })
    }
}

impl Default for PointSnapConstraint {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

/// 约束（封闭枚举）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    Orthogonal(OrthogonalConstraint),
    PointSnap(PointSnapConstraint),
}

impl Constraint {
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Constraint::Orthogonal(_) => ConstraintKind::Orthogonal,
            Constraint::PointSnap(_) => ConstraintKind::PointSnap,
        }
    }

    /// 调整候选点；`None` 表示该约束没有合适的结果
    pub fn apply(&self, current: Point2, reference: Point2, scene: &SnapScene) -> Option<Adjustment> {
        match self {
            Constraint::Orthogonal(c) => Some(Adjustment::unchanged(c.apply(current, reference))),
            Constraint::PointSnap(c) => c.apply(current, scene),
        }
    }
}

/// 约束链
#[derive(Debug, Clone)]
pub struct ConstraintManager {
    constraints: Vec<Constraint>,
    snap_threshold: f64,
}

impl ConstraintManager {
    pub fn new(snap_threshold: f64) -> Self {
        Self {
            constraints: Vec::new(),
            snap_threshold,
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_active(&self, kind: ConstraintKind) -> bool {
        self.constraints.iter().any(|c| c.kind() == kind)
    }

    /// 切换约束：已启用则移除，否则追加新实例。返回切换后的状态
    pub fn toggle_constraint(&mut self, kind: ConstraintKind) -> bool {
        if let Some(index) = self.constraints.iter().position(|c| c.kind() == kind) {
            self.constraints.remove(index);
            tracing::debug!(constraint = kind.name(), "constraint disabled");
            return false;
        }
        let constraint = match kind {
            ConstraintKind::Orthogonal => Constraint::Orthogonal(OrthogonalConstraint),
            ConstraintKind::PointSnap => Constraint::PointSnap(PointSnapConstraint::new(self.snap_threshold)),
        };
        self.constraints.push(constraint);
        tracing::debug!(constraint = kind.name(), "constraint enabled");
        true
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
    }

    /// 按顺序依次应用约束，参考点不变
    ///
    /// 某个约束返回 `None` 时跳过它，上一步的点继续传递。
    /// 后续约束改变了坐标时，之前的捕捉命中不再有效。
    pub fn apply_constraints(&self, current: Point2, reference: Point2, scene: &SnapScene) -> Adjustment {
        self.constraints
            .iter()
            .fold(Adjustment::unchanged(current), |acc, constraint| {
                match constraint.apply(acc.point, reference, scene) {
                    Some(next) if next.snapped_to.is_some() => next,
                    Some(next) if next.point == acc.point => acc,
                    Some(next) => next,
                    None => acc,
                }
            })
    }
}

impl Default for ConstraintManager {
    fn default() -> Self {
        Self::new(PointSnapConstraint::DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthogonal_picks_larger_axis() {
        let ortho = OrthogonalConstraint;
        let origin = Point2::origin();
        assert_eq!(ortho.apply(Point2::new(5.0, 1.0), origin), Point2::new(5.0, 0.0));
        assert_eq!(ortho.apply(Point2::new(1.0, -5.0), origin), Point2::new(0.0, -5.0));
        // 相等时走竖直分支
        assert_eq!(ortho.apply(Point2::new(2.0, 2.0), origin), Point2::new(0.0, 2.0));
    }

    #[test]
    fn test_point_snap_threshold() {
        let mut manager = EntityManager::new();
        let near = manager.add_point(Point2::new(0.01, 0.0));
        manager.add_point(Point2::new(0.5, 0.5));
        let snap = PointSnapConstraint::default();
        let scene = SnapScene::new(&manager);

        let hit = snap.apply(Point2::origin(), &scene).unwrap();
        assert_eq!(hit.point, Point2::new(0.01, 0.0));
        assert_eq!(hit.snapped_to, Some(near));

        assert!(snap.apply(Point2::new(0.25, 0.0), &scene).is_none());

        // 阈值边界上仍然命中
        let edge = PointSnapConstraint::new(0.5);
        let boundary = edge.apply(Point2::new(0.01, -0.5), &scene).unwrap();
        assert_eq!(boundary.snapped_to, Some(near));
    }

    #[test]
    fn test_point_snap_picks_nearest_and_honours_exclude() {
        let mut manager = EntityManager::new();
        let a = manager.add_point(Point2::new(0.015, 0.0));
        let b = manager.add_point(Point2::new(-0.005, 0.0));
        let snap = PointSnapConstraint::default();

        let hit = snap.apply(Point2::origin(), &SnapScene::new(&manager)).unwrap();
        assert_eq!(hit.snapped_to, Some(b));

        let exclude = [b];
        let hit = snap
            .apply(Point2::origin(), &SnapScene::new(&manager).excluding(&exclude))
            .unwrap();
        assert_eq!(hit.snapped_to, Some(a));
    }

    #[test]
    fn test_empty_chain_is_identity() {
        let manager = EntityManager::new();
        let constraints = ConstraintManager::default();
        let p = Point2::new(3.25, -7.5);
        let result = constraints.apply_constraints(p, Point2::origin(), &SnapScene::new(&manager));
        assert_eq!(result, Adjustment::unchanged(p));
    }

    #[test]
    fn test_toggle_constraint() {
        let mut constraints = ConstraintManager::default();
        assert!(constraints.toggle_constraint(ConstraintKind::Orthogonal));
        assert!(constraints.is_active(ConstraintKind::Orthogonal));
        assert!(!constraints.toggle_constraint(ConstraintKind::Orthogonal));
        assert!(constraints.constraints().is_empty());
    }

    #[test]
    fn test_chain_skips_missing_snap() {
        let mut manager = EntityManager::new();
        manager.add_point(Point2::new(10.0, 10.0));
        let mut constraints = ConstraintManager::default();
        constraints.toggle_constraint(ConstraintKind::PointSnap);
        constraints.toggle_constraint(ConstraintKind::Orthogonal);

        // 没有可捕捉的点，正交约束照常生效
        let result = constraints.apply_constraints(
            Point2::new(5.0, 1.0),
            Point2::origin(),
            &SnapScene::new(&manager),
        );
        assert_eq!(result.point, Point2::new(5.0, 0.0));
        assert_eq!(result.snapped_to, None);
    }

    #[test]
    fn test_chain_snap_then_orthogonal() {
        let mut manager = EntityManager::new();
        let target = manager.add_point(Point2::new(1.0, 0.0));
        let mut constraints = ConstraintManager::default();
        constraints.toggle_constraint(ConstraintKind::PointSnap);
        constraints.toggle_constraint(ConstraintKind::Orthogonal);

        // 捕捉到 (1, 0)，正交约束不改变它，捕捉结果保留
        let result = constraints.apply_constraints(
            Point2::new(1.01, 0.01),
            Point2::origin(),
            &SnapScene::new(&manager),
        );
        assert_eq!(result.point, Point2::new(1.0, 0.0));
        assert_eq!(result.snapped_to, Some(target));
    }
}
