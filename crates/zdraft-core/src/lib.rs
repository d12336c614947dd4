//! ZDraft 核心几何引擎
//!
//! 提供二维图元、相机变换、绘图约束和实体管理。
//!
//! # 架构设计
//!
//! 采用句柄 + 竞技场模式：
//! - `EntityId`: 由 `EntityManager` 分配的唯一句柄
//! - `Geometry`: 几何数据；线、多段线、圆弧、样条通过 ID 引用点实体
//! - `Properties`: 视觉属性（颜色）
//!
//! 点实体移动后，引用它的图元会自动刷新派生数据（圆弧拟合、样条细分）。
//!
//! # 示例
//!
//! ```rust
//! use zdraft_core::prelude::*;
//!
//! let mut entities = EntityManager::new();
//! let a = entities.add_point(Point2::origin());
//! let b = entities.add_point(Point2::new(1.0, 1.0));
//! let line = entities.add_entity(Entity::new(Geometry::Line(Line::new(a, b))));
//!
//! assert_eq!(entities.hit_test(Point2::new(0.5, 0.5)), Some(line));
//! ```

pub mod algorithms;
pub mod camera;
pub mod config;
pub mod constraint;
pub mod entity;
pub mod entity_manager;
pub mod error;
pub mod geometry;
pub mod math;
pub mod properties;
pub mod render;
pub mod scale;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::algorithms::{ArcFit, CircularArc};
    pub use crate::camera::{Camera, Viewport};
    pub use crate::config::DraftConfig;
    pub use crate::constraint::{
        Adjustment, Constraint, ConstraintKind, ConstraintManager, SnapScene,
    };
    pub use crate::entity::{Entity, EntityId};
    pub use crate::entity_manager::EntityManager;
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::geometry::{
        Arc, Circle, Ellipse, Geometry, HitTolerance, Line, Point, PointResolver, Polygon,
        Polyline, Rectangle, Spline, Text,
    };
    pub use crate::math::{BoundingBox2, Point2, Vector2};
    pub use crate::properties::{Color, Properties};
    pub use crate::render::{build_frame, DrawPrimitive, Frame};
    pub use crate::scale::ScaleManager;
}
