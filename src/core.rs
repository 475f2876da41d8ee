//! 引擎状态
//!
//! 进程内唯一的一份 `{enabled, keywords, hidden_count}`。它作为显式上下文在
//! 过滤控制器、变更调度和设置同步之间传递，而不是全局可变变量。

use crate::pipeline::classifier::KeywordSet;
use crate::storage::StoredSettings;

/// 引擎状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub enabled: bool,
    pub keywords: KeywordSet,
    pub hidden_count: usize,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            enabled: true,
            keywords: KeywordSet::defaults(),
            hidden_count: 0,
        }
    }
}

impl EngineState {
    pub fn new(enabled: bool, keywords: KeywordSet) -> Self {
        Self {
            enabled,
            keywords,
            hidden_count: 0,
        }
    }

    /// 从持久化设置构建：只有显式存为 false 才视为禁用，缺失关键词时使用内置列表
    pub fn from_settings(settings: &StoredSettings) -> Self {
        let enabled = settings.enabled != Some(false);
        let keywords = settings
            .keywords
            .clone()
            .map(KeywordSet::new)
            .unwrap_or_default();

        Self::new(enabled, keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_store_is_empty() {
        let state = EngineState::from_settings(&StoredSettings::default());
        assert!(state.enabled);
        assert_eq!(state.keywords, KeywordSet::defaults());
        assert_eq!(state.hidden_count, 0);
    }

    #[test]
    fn test_only_explicit_false_disables() {
        let settings = StoredSettings {
            enabled: Some(false),
            keywords: Some(vec!["rust".to_string()]),
        };
        let state = EngineState::from_settings(&settings);
        assert!(!state.enabled);
        assert_eq!(state.keywords.as_slice(), &["rust".to_string()]);
    }
}
