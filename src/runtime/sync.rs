//! 设置同步
//!
//! 接收外部命令并驱动过滤控制器：切换启用状态、替换关键词、查询计数和状态。

use crate::core::EngineState;
use crate::pipeline::{FilterController, KeywordSet};
use crate::storage::SettingsStore;

use super::channel::{Command, Response};

/// 启动时读取设置并执行首次遍历
///
/// 存储读取失败不会中断启动，只记录警告并使用默认设置。
pub fn startup(store: &dyn SettingsStore, controller: &mut FilterController) -> EngineState {
    let settings = match store.load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("读取设置失败，使用默认设置: {}", e);
            Default::default()
        }
    };

    let mut state = EngineState::from_settings(&settings);
    tracing::info!(
        enabled = state.enabled,
        keywords = state.keywords.len(),
        "过滤器初始化"
    );

    controller.run_pass(&mut state);
    state
}

/// 处理一条命令
pub fn apply_command(
    command: Command,
    controller: &mut FilterController,
    state: &mut EngineState,
) -> Response {
    match command {
        Command::Toggle { enabled } => {
            set_enabled(enabled, controller, state);
            Response::ok()
        }
        Command::UpdateKeywords { keywords } => {
            replace_keywords(KeywordSet::new(keywords), controller, state);
            Response::ok()
        }
        Command::GetCount => Response::Count {
            count: state.hidden_count,
        },
        Command::GetStatus => Response::Status {
            enabled: state.enabled,
            count: state.hidden_count,
        },
    }
}

/// 切换启用状态：启用后立即遍历，禁用后清除所有隐藏
pub fn set_enabled(enabled: bool, controller: &mut FilterController, state: &mut EngineState) {
    state.enabled = enabled;
    tracing::info!(enabled, "过滤器启用状态变更");

    if enabled {
        controller.run_pass(state);
    } else {
        controller.reset(state);
    }
}

/// 替换关键词：旧的分类结果全部作废，启用时重新遍历
pub fn replace_keywords(
    keywords: KeywordSet,
    controller: &mut FilterController,
    state: &mut EngineState,
) {
    if keywords.is_empty() {
        tracing::warn!("关键词为空，所有帖子都将被隐藏");
    }
    tracing::info!(count = keywords.len(), "关键词已更新");

    state.keywords = keywords;
    controller.reset(state);

    if state.enabled {
        controller.run_pass(state);
    }
}
