//! 实体标识和实体
//!
//! 实体 ID 由 `EntityManager` 分配，同一个管理器内单调递增、永不复用。

use crate::geometry::Geometry;
use crate::math::BoundingBox2;
use crate::properties::{Color, Properties};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 实体唯一标识符（稳定整数句柄）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// 空ID（无效）
    pub const NULL: EntityId = EntityId(0);

    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 绘图实体
///
/// 新建时 `id` 为 `EntityId::NULL`，加入 `EntityManager` 时才分配。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub geometry: Geometry,
    pub properties: Properties,
}

impl Entity {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: EntityId::NULL,
            geometry,
            properties: Properties::default(),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.properties.color = color;
        self
    }

    pub fn color(&self) -> Color {
        self.properties.color
    }

    /// 实体自身的包围盒（不解析引用的点）
    pub fn own_bounding_box(&self) -> BoundingBox2 {
        self.geometry.own_bounding_box()
    }
}
