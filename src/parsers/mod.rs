//! # 解析器模块
//!
//! 页面快照的解析、DOM 查询与序列化。
//!
//! # 模块组织
//!
//! - `html` - HTML文档解析、DOM操作、序列化

pub mod html;

// Re-export commonly used items for convenience
pub use html::{html_to_dom, serialize_document, OutputOptions};
