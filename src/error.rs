//! 统一错误处理
//!
//! 核心过滤流程（定位、分类、遍历）本身不会失败；只有设置存储、配置文件、
//! 快照解析以及命令行入口这些外部边界会返回 `FilterError`。

use thiserror::Error;

use crate::env::EnvError;

/// 过滤器错误类型
#[derive(Error, Debug)]
pub enum FilterError {
    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 设置存储错误
    #[error("设置存储错误: {0}")]
    StoreError(String),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    ParseError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 命令通道没有接收方
    #[error("命令通道不可用")]
    ChannelClosed,

    /// 关键词列表为空
    #[error("关键词列表不能为空")]
    EmptyKeywords,

    /// 环境变量错误
    #[error("{0}")]
    EnvError(#[from] EnvError),
}

impl FilterError {
    /// 创建带上下文的错误
    pub fn with_context<T: std::fmt::Display>(self, context: T) -> Self {
        match self {
            FilterError::ConfigError(msg) => {
                FilterError::ConfigError(format!("{} (上下文: {})", msg, context))
            }
            FilterError::StoreError(msg) => {
                FilterError::StoreError(format!("{} (上下文: {})", msg, context))
            }
            FilterError::ParseError(msg) => {
                FilterError::ParseError(format!("{} (上下文: {})", msg, context))
            }
            FilterError::SerializationError(msg) => {
                FilterError::SerializationError(format!("{} (上下文: {})", msg, context))
            }
            other => other,
        }
    }

    /// 是否属于用户输入问题（命令行据此选择退出码）
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FilterError::EmptyKeywords | FilterError::ConfigError(_) | FilterError::EnvError(_)
        )
    }
}

impl From<serde_json::Error> for FilterError {
    fn from(error: serde_json::Error) -> Self {
        FilterError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for FilterError {
    fn from(error: toml::de::Error) -> Self {
        FilterError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

/// 错误结果类型别名
pub type FilterResult<T> = Result<T, FilterError>;
