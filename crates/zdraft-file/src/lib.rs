//! ZDraft 文件格式处理
//!
//! 支持 `.dxf` 导入（原始组码解析，不依赖第三方 DXF 库）。

pub mod dxf_import;
pub mod dxf_raw;
pub mod error;

pub use dxf_import::{import_path, import_str, ImportReport};
pub use dxf_raw::{DxfPair, DxfRawParser};
pub use error::FileError;
