//! 核心错误定义
//!
//! 只覆盖调用方的编程错误（不变量被破坏）。退化几何不是错误，
//! 由 `Option` 或 `ArcFit::Straight` 表达。

use crate::entity::EntityId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Cannot add a null entity")]
    NullEntity,

    #[error("Color needs exactly 4 components, got {components}")]
    InvalidColor { components: usize },

    #[error("Zoom must be finite and strictly positive, got {0}")]
    InvalidZoom(f64),

    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Polygon needs 3 to 1024 sides, got {0}")]
    InvalidPolygonSides(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
