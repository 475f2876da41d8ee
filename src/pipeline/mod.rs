//! 过滤流水线
//!
//! 定位（`locator`）-> 分类（`classifier`）-> 状态缓存（`state`）-> 控制器（`controller`）

pub mod classifier;
pub mod controller;
pub mod locator;
pub mod state;

pub use classifier::{format_keywords, matches, parse_keywords, validate_keywords, KeywordSet};
pub use controller::{CountReporter, FilterController, NoopReporter, PassStats};
pub use locator::{Location, Locator, PostSet, Strategy, STRATEGY_ORDER};
pub use state::{PostState, PostStateCache};
