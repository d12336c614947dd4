//! 实体管理器
//!
//! 持有两组实体：
//! - 已提交实体：插入顺序即绘制和点击测试的优先级（最后加入的在最上层）
//! - 临时实体：只用于施工预览，不参与点击测试
//!
//! 两组共用同一个 ID 计数器，引用点实体时不区分所在的组。

use crate::entity::{Entity, EntityId};
use crate::error::{CoreError, CoreResult};
use crate::geometry::{Geometry, HitTolerance, Point, PointResolver};
use crate::math::{BoundingBox2, Point2, Vector2};
use tracing::debug;

#[derive(Debug)]
pub struct EntityManager {
    entities: Vec<Entity>,
    temporary: Vec<Entity>,
    next_id: u64,
    tolerance: HitTolerance,
    highlighted: Option<EntityId>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::with_tolerance(HitTolerance::default())
    }

    pub fn with_tolerance(tolerance: HitTolerance) -> Self {
        Self {
            entities: Vec::new(),
            temporary: Vec::new(),
            next_id: 1,
            tolerance,
            highlighted: None,
        }
    }

    pub fn tolerance(&self) -> HitTolerance {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: HitTolerance) {
        self.tolerance = tolerance;
    }

    fn allocate(&mut self, mut entity: Entity) -> Entity {
        entity.id = EntityId(self.next_id);
        self.next_id += 1;
        entity
    }

    // ========== 已提交实体 ==========

    /// 加入已提交实体，返回分配的 ID
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let entity = self.allocate(entity);
        let id = entity.id;
        debug!(%id, kind = entity.geometry.type_name(), "entity added");
        self.entities.push(entity);
        id
    }

    /// 动态边界上的加入：`None` 是调用方的编程错误
    pub fn try_add_entity(&mut self, entity: Option<Entity>) -> CoreResult<EntityId> {
        entity.map(|e| self.add_entity(e)).ok_or(CoreError::NullEntity)
    }

    /// 移除已提交实体，不存在时什么也不做
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        if self.highlighted == Some(id) {
            self.highlighted = None;
        }
        debug!(%id, "entity removed");
        Some(self.entities.remove(index))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // ========== 临时实体 ==========

    pub fn add_temporary_entity(&mut self, entity: Entity) -> EntityId {
        let entity = self.allocate(entity);
        let id = entity.id;
        self.temporary.push(entity);
        id
    }

    pub fn remove_temporary_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.temporary.iter().position(|e| e.id == id)?;
        Some(self.temporary.remove(index))
    }

    pub fn clear_temporary_entities(&mut self) {
        self.temporary.clear();
    }

    pub fn temporary_entities(&self) -> &[Entity] {
        &self.temporary
    }

    /// 将临时实体转为已提交实体（追加到最上层，ID 不变）
    pub fn commit_temporary(&mut self, id: EntityId) -> CoreResult<()> {
        let entity = self
            .remove_temporary_entity(id)
            .ok_or(CoreError::EntityNotFound(id))?;
        debug!(%id, kind = entity.geometry.type_name(), "temporary entity committed");
        self.entities.push(entity);
        Ok(())
    }

    /// 移除实体，无论在哪一组
    pub fn discard(&mut self, id: EntityId) -> Option<Entity> {
        self.remove_entity(id).or_else(|| self.remove_temporary_entity(id))
    }

    pub fn is_temporary(&self, id: EntityId) -> bool {
        self.temporary.iter().any(|e| e.id == id)
    }

    // ========== 查询 ==========

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities
            .iter()
            .chain(self.temporary.iter())
            .find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .chain(self.temporary.iter_mut())
            .find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// 已提交的点实体
    pub fn points(&self) -> impl Iterator<Item = (EntityId, Point2)> + '_ {
        self.entities.iter().filter_map(|e| match &e.geometry {
            Geometry::Point(p) => Some((e.id, p.position)),
            _ => None,
        })
    }

    pub fn point_position(&self, id: EntityId) -> Option<Point2> {
        match &self.get(id)?.geometry {
            Geometry::Point(p) => Some(p.position),
            _ => None,
        }
    }

    /// 点击测试：从最上层开始，返回第一个命中的已提交实体
    pub fn hit_test(&self, point: Point2) -> Option<EntityId> {
        self.entities
            .iter()
            .rev()
            .find(|e| e.geometry.hit(&point, self.tolerance, self))
            .map(|e| e.id)
    }

    /// 所有已提交实体的包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        self.entities
            .iter()
            .map(|e| e.geometry.bounding_box(self))
            .fold(BoundingBox2::empty(), |acc, b| acc.union(&b))
    }

    // ========== 修改 ==========

    /// 移动点实体，并刷新所有引用它的圆弧/样条
    pub fn set_point_position(&mut self, id: EntityId, position: Point2) -> CoreResult<()> {
        match self.get_mut(id).map(|e| &mut e.geometry) {
            Some(Geometry::Point(p)) => p.position = position,
            _ => return Err(CoreError::EntityNotFound(id)),
        }
        self.refresh_dependents(&[id]);
        Ok(())
    }

    /// 平移实体：自身坐标和引用的点一起平移
    pub fn translate_entity(&mut self, id: EntityId, delta: Vector2) -> CoreResult<()> {
        let entity = self.get_mut(id).ok_or(CoreError::EntityNotFound(id))?;
        entity.geometry.translate_owned(delta);

        let mut moved = entity.geometry.point_refs();
        moved.sort();
        moved.dedup();
        for point_id in &moved {
            if let Some(Geometry::Point(p)) = self.get_mut(*point_id).map(|e| &mut e.geometry) {
                p.position += delta;
            }
        }

        moved.push(id);
        self.refresh_dependents(&moved);
        Ok(())
    }

    /// 替换实体的几何数据并刷新派生缓存
    pub fn update_geometry(&mut self, id: EntityId, geometry: Geometry) -> CoreResult<()> {
        let entity = self.get_mut(id).ok_or(CoreError::EntityNotFound(id))?;
        entity.geometry = geometry;
        self.refresh(id);
        Ok(())
    }

    /// 用引用点的当前位置重算实体的派生数据
    pub fn refresh(&mut self, id: EntityId) {
        let Some(refs) = self.get(id).map(|e| e.geometry.point_refs()) else {
            return;
        };
        if refs.is_empty() {
            return;
        }
        let Some(positions) = self.resolve_all(&refs) else {
            return;
        };
        if let Some(entity) = self.get_mut(id) {
            entity.geometry.rederive(&positions);
        }
    }

    fn refresh_dependents(&mut self, changed: &[EntityId]) {
        let dependents: Vec<EntityId> = self
            .entities
            .iter()
            .chain(self.temporary.iter())
            .filter(|e| changed.iter().any(|c| e.geometry.references(*c)))
            .map(|e| e.id)
            .collect();
        for id in dependents {
            self.refresh(id);
        }
    }

    // ========== 高亮 ==========

    /// 设置高亮实体（捕捉命中或选中），同一时刻只有一个
    pub fn set_highlight(&mut self, id: Option<EntityId>) {
        self.highlighted = id;
    }

    pub fn highlighted(&self) -> Option<EntityId> {
        self.highlighted
    }

    /// 清空全部实体
    pub fn clear(&mut self) {
        self.entities.clear();
        self.temporary.clear();
        self.highlighted = None;
    }

    /// 便捷方法：加入一个已提交的点
    pub fn add_point(&mut self, position: Point2) -> EntityId {
        self.add_entity(Entity::new(Geometry::Point(Point::from_point2(position))))
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PointResolver for EntityManager {
    fn resolve(&self, id: EntityId) -> Option<Point2> {
        self.point_position(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Arc, Circle, Line, Rectangle, Spline};
    use crate::math::EPSILON;

    #[test]
    fn test_try_add_null_entity() {
        let mut manager = EntityManager::new();
        assert_eq!(manager.try_add_entity(None), Err(CoreError::NullEntity));
        assert!(manager.is_empty());

        let id = manager
            .try_add_entity(Some(Entity::new(Geometry::Point(Point::new(0.0, 0.0)))))
            .unwrap();
        assert_eq!(manager.len(), 1);
        assert!(!id.is_null());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut manager = EntityManager::new();
        manager.add_point(Point2::new(1.0, 1.0));
        assert!(manager.remove_entity(EntityId(42)).is_none());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut manager = EntityManager::new();
        let a = manager.add_point(Point2::new(-1.0, 0.0));
        let b = manager.add_point(Point2::new(1.0, 0.0));
        let below = manager.add_entity(Entity::new(Geometry::Line(Line::new(a, b))));
        let above = manager.add_entity(Entity::new(Geometry::Rectangle(Rectangle::new(
            Point2::new(-0.5, 0.0),
            Point2::new(0.5, 1.0),
        ))));

        // 两者都经过 (0, 0)
        assert_eq!(manager.hit_test(Point2::new(0.0, 0.005)), Some(above));
        manager.remove_entity(above);
        assert_eq!(manager.hit_test(Point2::new(0.0, 0.005)), Some(below));
        assert_eq!(manager.hit_test(Point2::new(0.0, 0.5)), None);
    }

    #[test]
    fn test_temporary_entities_not_hit() {
        let mut manager = EntityManager::new();
        manager.add_temporary_entity(Entity::new(Geometry::Circle(Circle::new(Point2::origin(), 1.0))));
        assert_eq!(manager.hit_test(Point2::new(1.0, 0.0)), None);
        assert_eq!(manager.temporary_entities().len(), 1);
        manager.clear_temporary_entities();
        assert!(manager.temporary_entities().is_empty());
    }

    #[test]
    fn test_commit_temporary_keeps_id() {
        let mut manager = EntityManager::new();
        let id = manager.add_temporary_entity(Entity::new(Geometry::Point(Point::new(2.0, 2.0))));
        assert!(manager.is_temporary(id));
        manager.commit_temporary(id).unwrap();
        assert!(!manager.is_temporary(id));
        assert_eq!(manager.entities().last().map(|e| e.id), Some(id));
        assert_eq!(manager.commit_temporary(id), Err(CoreError::EntityNotFound(id)));
    }

    #[test]
    fn test_moving_point_refreshes_arc() {
        let mut manager = EntityManager::new();
        let positions = [Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), Point2::new(-1.0, 0.0)];
        let ids = positions.map(|p| manager.add_point(p));
        let arc = manager.add_entity(Entity::new(Geometry::Arc(Arc::new(ids, positions))));

        // 终点移到与另外两点共线的位置
        manager.set_point_position(ids[2], Point2::new(-1.0, 2.0)).unwrap();
        let Some(Geometry::Arc(a)) = manager.get(arc).map(|e| &e.geometry) else {
            panic!("arc missing");
        };
        assert!(a.fit.is_straight());
    }

    #[test]
    fn test_translate_spline_moves_control_points() {
        let mut manager = EntityManager::new();
        let positions = [Point2::new(0.0, 0.0), Point2::new(1.0, 1.0), Point2::new(2.0, 0.0)];
        let ids: Vec<EntityId> = positions.iter().map(|p| manager.add_point(*p)).collect();
        let spline = manager.add_entity(Entity::new(Geometry::Spline(Spline::new(ids.clone(), &positions))));

        manager.translate_entity(spline, Vector2::new(10.0, 0.0)).unwrap();
        assert!((manager.point_position(ids[0]).unwrap() - Point2::new(10.0, 0.0)).norm() < EPSILON);

        let Some(Geometry::Spline(s)) = manager.get(spline).map(|e| &e.geometry) else {
            panic!("spline missing");
        };
        assert!((s.curve[0] - Point2::new(10.0, 0.0)).norm() < EPSILON);
        assert!((s.curve.last().unwrap() - Point2::new(12.0, 0.0)).norm() < EPSILON);
    }

    #[test]
    fn test_update_geometry_rederives_curve() {
        let mut manager = EntityManager::new();
        let a = manager.add_point(Point2::new(0.0, 0.0));
        let b = manager.add_point(Point2::new(1.0, 1.0));
        let c = manager.add_point(Point2::new(2.0, 0.0));
        let spline = manager.add_temporary_entity(Entity::new(Geometry::Spline(Spline::new(
            vec![a, b],
            &[Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)],
        ))));

        manager
            .update_geometry(spline, Geometry::Spline(Spline::new(vec![a, b, c], &[])))
            .unwrap();
        let Some(Geometry::Spline(s)) = manager.get(spline).map(|e| &e.geometry) else {
            panic!("spline missing");
        };
        assert_eq!(s.control_points, vec![a, b, c]);
        assert!((s.curve.last().unwrap() - Point2::new(2.0, 0.0)).norm() < EPSILON);

        let missing = EntityId(999);
        assert_eq!(
            manager.update_geometry(missing, Geometry::Circle(Circle::new(Point2::origin(), 1.0))),
            Err(CoreError::EntityNotFound(missing))
        );
    }

    #[test]
    fn test_set_point_on_non_point_fails() {
        let mut manager = EntityManager::new();
        let circle = manager.add_entity(Entity::new(Geometry::Circle(Circle::new(Point2::origin(), 1.0))));
        assert_eq!(
            manager.set_point_position(circle, Point2::origin()),
            Err(CoreError::EntityNotFound(circle))
        );
    }

    #[test]
    fn test_bounding_box() {
        let mut manager = EntityManager::new();
        assert!(manager.bounding_box().is_empty());
        manager.add_point(Point2::new(-2.0, 1.0));
        manager.add_entity(Entity::new(Geometry::Circle(Circle::new(Point2::new(3.0, 0.0), 1.0))));
        let bbox = manager.bounding_box();
        assert!((bbox.min.x + 2.0).abs() < EPSILON);
        assert!((bbox.max.x - 4.0).abs() < EPSILON);
        assert!((bbox.max.y - 1.0).abs() < EPSILON);
    }
}
