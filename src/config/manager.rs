//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::env::EnvConfig;
use crate::error::{FilterError, FilterResult};

/// 属性匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrMatch {
    /// `[attr^="value"]`
    Prefix,
    /// `[attr*="value"]`
    Contains,
}

/// 帖子标识属性匹配规则
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttrMatcher {
    pub attr: String,
    pub value: String,
    pub kind: AttrMatch,
}

impl AttrMatcher {
    pub fn prefix(attr: &str, value: &str) -> Self {
        Self {
            attr: attr.to_string(),
            value: value.to_string(),
            kind: AttrMatch::Prefix,
        }
    }

    pub fn contains(attr: &str, value: &str) -> Self {
        Self {
            attr: attr.to_string(),
            value: value.to_string(),
            kind: AttrMatch::Contains,
        }
    }

    /// 判断属性值是否命中
    pub fn matches(&self, attr_value: &str) -> bool {
        match self.kind {
            AttrMatch::Prefix => attr_value.starts_with(&self.value),
            AttrMatch::Contains => attr_value.contains(&self.value),
        }
    }
}

/// 结构定位配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocatorConfig {
    // 结构标记
    pub region_tag: String,
    pub scan_tag: String,
    pub reaction_marker: String,
    pub profile_link_marker: String,
    pub profile_image_marker: String,
    pub compose_marker: String,
    pub sort_marker: String,

    // 阈值
    pub min_text_len: usize,
    pub max_text_len: usize,
    pub max_scan_text_len: usize,
    pub reaction_walk_depth: usize,
    pub image_walk_depth: usize,
    pub max_profile_links: usize,

    // 语义标识
    pub post_id_attrs: Vec<AttrMatcher>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            region_tag: "main".to_string(),
            scan_tag: "div".to_string(),
            reaction_marker: "React".to_string(),
            profile_link_marker: "/in/".to_string(),
            profile_image_marker: "licdn.com/dms/image".to_string(),
            compose_marker: "Start a post".to_string(),
            sort_marker: "Sort by:".to_string(),
            min_text_len: constants::MIN_POST_TEXT_LENGTH,
            max_text_len: constants::MAX_POST_TEXT_LENGTH,
            max_scan_text_len: constants::MAX_SCAN_TEXT_LENGTH,
            reaction_walk_depth: constants::REACTION_WALK_DEPTH,
            image_walk_depth: constants::IMAGE_WALK_DEPTH,
            max_profile_links: constants::MAX_PROFILE_LINKS,
            post_id_attrs: vec![
                AttrMatcher::prefix("data-id", "urn:li:activity"),
                AttrMatcher::prefix("data-urn", "urn:li:activity"),
                AttrMatcher::contains("data-id", "activity"),
            ],
        }
    }
}

/// 调度时间配置（毫秒）
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    pub throttle_ms: u64,
    pub fast_ms: u64,
    pub navigation_ms: u64,
    pub startup_ms: Vec<u64>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            throttle_ms: constants::THROTTLE_DELAY.as_millis() as u64,
            fast_ms: constants::FAST_DELAY.as_millis() as u64,
            navigation_ms: constants::NAVIGATION_DELAY.as_millis() as u64,
            startup_ms: constants::STARTUP_DELAYS
                .iter()
                .map(|d| d.as_millis() as u64)
                .collect(),
        }
    }
}

impl TimingConfig {
    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn fast(&self) -> Duration {
        Duration::from_millis(self.fast_ms)
    }

    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn startup(&self) -> Vec<Duration> {
        self.startup_ms.iter().map(|ms| Duration::from_millis(*ms)).collect()
    }
}

/// 过滤器配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub settings_path: String,
    pub locator: LocatorConfig,
    pub timing: TimingConfig,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            settings_path: constants::DEFAULT_SETTINGS_PATH.to_string(),
            locator: LocatorConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl FilterConfig {
    /// 验证配置
    pub fn validate(&self) -> FilterResult<()> {
        let locator = &self.locator;

        if locator.min_text_len >= locator.max_text_len {
            return Err(FilterError::ConfigError(
                "min_text_len 必须小于 max_text_len".to_string(),
            ));
        }

        if locator.min_text_len >= locator.max_scan_text_len {
            return Err(FilterError::ConfigError(
                "min_text_len 必须小于 max_scan_text_len".to_string(),
            ));
        }

        if locator.reaction_walk_depth == 0 || locator.image_walk_depth == 0 {
            return Err(FilterError::ConfigError("向上遍历层数不能为0".to_string()));
        }

        if locator.reaction_marker.is_empty() || locator.region_tag.is_empty() {
            return Err(FilterError::ConfigError("结构标记不能为空".to_string()));
        }

        if self.timing.throttle_ms == 0 {
            return Err(FilterError::ConfigError("节流间隔不能为0".to_string()));
        }

        Ok(())
    }

    /// 应用环境变量覆盖（使用类型安全环境变量系统）
    pub fn apply_env_overrides(&mut self, env: &EnvConfig) {
        if let Some(path) = &env.settings_path {
            self.settings_path = path.clone();
            tracing::info!("环境变量覆盖设置路径: {}", self.settings_path);
        }

        if let Some(throttle) = env.throttle {
            self.timing.throttle_ms = throttle.as_millis() as u64;
        }
    }

    /// 展开后的设置存储路径
    pub fn settings_path(&self) -> String {
        shellexpand::tilde(&self.settings_path).into_owned()
    }
}

/// 配置管理器
pub struct ConfigManager {
    config: FilterConfig,
}

impl ConfigManager {
    /// 创建配置管理器：文件 -> 环境变量 -> 校验
    pub fn new(env: &EnvConfig) -> FilterResult<Self> {
        let mut config = Self::load_config()?;
        config.apply_env_overrides(env);
        config.validate()?;
        Ok(Self { config })
    }

    /// 从指定文件创建配置管理器
    pub fn from_file(path: &str, env: &EnvConfig) -> FilterResult<Self> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides(env);
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn into_config(self) -> FilterConfig {
        self.config
    }

    /// 从搜索路径加载配置
    fn load_config() -> FilterResult<FilterConfig> {
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            if Path::new(expanded_path.as_ref()).exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(&expanded_path);
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Ok(FilterConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &str) -> FilterResult<FilterConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FilterError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .map_err(|e| FilterError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            Ok(toml::from_str(&content)?)
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &str) -> FilterResult<()> {
        let config = FilterConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| FilterError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| FilterError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
