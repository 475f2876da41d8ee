//! # Feedfilter Library
//!
//! 在持续变化的信息流页面树中识别单个帖子的边界（不依赖易变的样式类名），
//! 按用户关键词判断每个帖子是否命中，并据此切换显示/隐藏，随新帖子流入增量执行。
//!
//! ## 模块组织
//!
//! - `core` - 引擎状态
//! - `parsers` - HTML解析、DOM查询与序列化
//! - `pipeline` - 帖子定位、关键词分类、状态缓存、过滤控制器
//! - `runtime` - 变更调度、设置同步和事件循环
//! - `storage` - 设置存储
//! - `config` / `env` - 配置文件与环境变量
//! - `error` - 错误类型

pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod parsers;
pub mod pipeline;
pub mod runtime;
pub mod storage;

// Re-export commonly used items for convenience
pub use crate::core::EngineState;
pub use error::{FilterError, FilterResult};
pub use pipeline::{FilterController, KeywordSet, Locator};
pub use runtime::{Command, FilterRuntime, PageEvent, Response};
