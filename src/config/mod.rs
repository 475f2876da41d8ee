//! 过滤器配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

use crate::env::EnvConfig;

// 重新导出主要类型
pub use manager::{AttrMatch, AttrMatcher, ConfigManager, FilterConfig, LocatorConfig, TimingConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 默认关键词：常见招聘相关短语和话题标签
    pub const DEFAULT_KEYWORDS: &[&str] = &[
        "hiring",
        "we're hiring",
        "we are hiring",
        "job opening",
        "job opportunity",
        "open position",
        "open role",
        "looking for",
        "join our team",
        "join my team",
        "now hiring",
        "career opportunity",
        "apply now",
        "job alert",
        "#hiring",
        "#jobopening",
        "#opentowork",
        "talent acquisition",
        "recruiting",
        "remote position",
        "hybrid position",
        "full-time",
        "part-time",
    ];

    // 写入帖子节点的标记
    pub const HIDDEN_CLASS: &str = "feedfilter-hidden";
    pub const PROCESSED_ATTR: &str = "data-feedfilter-processed";
    pub const ENABLED_ATTR: &str = "data-feedfilter-enabled";

    // 结构定位相关
    pub const MIN_POST_TEXT_LENGTH: usize = 150;
    pub const MAX_POST_TEXT_LENGTH: usize = 4000;
    pub const MAX_SCAN_TEXT_LENGTH: usize = 3000;
    pub const REACTION_WALK_DEPTH: usize = 12;
    pub const IMAGE_WALK_DEPTH: usize = 10;
    pub const MAX_PROFILE_LINKS: usize = 5;

    // 调度相关
    pub const THROTTLE_DELAY: Duration = Duration::from_millis(2000);
    pub const FAST_DELAY: Duration = Duration::from_millis(500);
    pub const NAVIGATION_DELAY: Duration = Duration::from_millis(1000);
    pub const STARTUP_DELAYS: &[Duration] =
        &[Duration::from_millis(1000), Duration::from_millis(3000)];

    // 设置存储默认路径
    pub const DEFAULT_SETTINGS_PATH: &str = "~/.config/feedfilter/settings.json";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "feedfilter.toml",
        ".feedfilter.toml",
        "~/.config/feedfilter/config.toml",
        "/etc/feedfilter/config.toml",
    ];
}

/// 默认关键词列表
pub fn default_keywords() -> Vec<String> {
    constants::DEFAULT_KEYWORDS
        .iter()
        .map(|k| k.to_string())
        .collect()
}

/// 加载配置，失败时退回默认配置
pub fn load_filter_config(env: &EnvConfig) -> FilterConfig {
    match ConfigManager::new(env) {
        Ok(manager) => manager.into_config(),
        Err(e) => {
            tracing::warn!("配置加载失败，使用默认配置: {}", e);
            FilterConfig::default()
        }
    }
}
