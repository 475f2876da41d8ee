//! 运行时
//!
//! - `scheduler`: 变更/导航/启动补扫的定时策略
//! - `channel`: 命令通道消息与计数报告
//! - `sync`: 设置同步（命令 -> 控制器）
//! - `event_loop`: 把以上各部分接到同一个任务上的事件循环

pub mod channel;
pub mod event_loop;
pub mod scheduler;
pub mod sync;

pub use channel::{parse_command, ChannelReporter, Command, CommandEnvelope, Outbound, Response};
pub use event_loop::{FilterRuntime, PageEvent};
pub use scheduler::{PassScheduler, PassTrigger};
pub use sync::{apply_command, replace_keywords, set_enabled, startup};
