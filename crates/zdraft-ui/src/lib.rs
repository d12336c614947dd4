//! ZDraft 交互层
//!
//! 把指针/键盘事件变成实体：每个工具是一个状态机，在 [`DraftingSession`]
//! 上直接注册施工中的预览实体和最终实体。

pub mod error;
pub mod events;
pub mod session;
pub mod shortcuts;
pub mod tool;
pub mod tool_manager;
pub mod tools;

pub use error::{ToolError, ToolResult};
pub use events::{Key, PointerEvent};
pub use session::DraftingSession;
pub use shortcuts::{ShortcutAction, ShortcutTable};
pub use tool::{Tool, ToolKind};
pub use tool_manager::ToolManager;
pub use tools::create_tool;
