//! 交互层错误

use thiserror::Error;
use zdraft_core::error::CoreError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

pub type ToolResult<T> = Result<T, ToolError>;
