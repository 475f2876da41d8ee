//! 过滤控制器
//!
//! 一次过滤遍历：定位帖子 -> 读取缓存或重新分类 -> 切换隐藏标记 -> 汇总隐藏数并向外报告。
//! 遍历是同步、一次跑完的；所有对页面树的写操作都集中在这里。

use markup5ever_rcdom::Handle;

use crate::core::EngineState;
use crate::error::FilterResult;
use crate::pipeline::classifier;
use crate::pipeline::locator::{Locator, Strategy};
use crate::pipeline::state::PostStateCache;

/// 隐藏计数的向外报告通道
///
/// 报告是尽力而为的：实现可以返回错误，但控制器只记录日志，从不重试。
pub trait CountReporter {
    fn report_count(&self, count: usize) -> FilterResult<()>;
}

/// 不向任何地方报告
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl CountReporter for NoopReporter {
    fn report_count(&self, _count: usize) -> FilterResult<()> {
        Ok(())
    }
}

/// 最近一次遍历的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    pub strategy: Option<Strategy>,
    pub located: usize,
    pub hidden: usize,
    pub reclassified: usize,
    pub reused: usize,
    /// 本次遍历中被修改过的元素数
    pub mutated: usize,
}

/// 过滤控制器
pub struct FilterController {
    document: Handle,
    locator: Locator,
    cache: PostStateCache,
    reporter: Box<dyn CountReporter>,
    last_pass: PassStats,
}

impl FilterController {
    pub fn new(document: Handle, locator: Locator, reporter: Box<dyn CountReporter>) -> Self {
        Self {
            document,
            locator,
            cache: PostStateCache::default(),
            reporter,
            last_pass: PassStats::default(),
        }
    }

    pub fn document(&self) -> &Handle {
        &self.document
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn cache(&self) -> &PostStateCache {
        &self.cache
    }

    pub fn last_pass(&self) -> &PassStats {
        &self.last_pass
    }

    /// 执行一次完整的过滤遍历，返回隐藏的帖子数
    pub fn run_pass(&mut self, state: &mut EngineState) -> usize {
        let location = self.locator.locate_detailed(&self.document);
        let mut stats = PassStats {
            strategy: location.strategy,
            located: location.posts.len(),
            ..PassStats::default()
        };

        for post in &location.posts {
            if self.process_post(post, state, &mut stats) {
                stats.hidden += 1;
            }
        }

        state.hidden_count = stats.hidden;
        tracing::debug!(
            located = stats.located,
            hidden = stats.hidden,
            reclassified = stats.reclassified,
            reused = stats.reused,
            "过滤遍历完成"
        );
        self.last_pass = stats;

        if let Err(e) = self.reporter.report_count(state.hidden_count) {
            tracing::debug!("隐藏计数报告失败，已忽略: {}", e);
        }

        state.hidden_count
    }

    /// 处理单个帖子，返回它是否处于隐藏状态
    fn process_post(&self, post: &Handle, state: &EngineState, stats: &mut PassStats) -> bool {
        // 禁用时记在 enabled=false 名下，重新启用后必然重新分类
        if !state.enabled {
            if self.cache.record(post, false, false) {
                stats.mutated += 1;
            }
            return false;
        }

        if self.cache.should_skip(post, state.enabled) {
            stats.reused += 1;
            return self.cache.is_hidden(post);
        }

        let text = crate::parsers::html::text_content(post);
        let hidden = !classifier::matches(&text, &state.keywords);
        stats.reclassified += 1;

        if self.cache.record(post, hidden, state.enabled) {
            stats.mutated += 1;
        }

        hidden
    }

    /// 清除所有隐藏标记和已处理标记，隐藏数归零
    ///
    /// 除当前定位到的帖子外，还会清理树中任何仍带隐藏标记的元素，
    /// 覆盖因页面变化已不在定位结果中的旧帖子。
    pub fn reset(&mut self, state: &mut EngineState) {
        let mut cleared = 0;

        for post in self.locator.locate(&self.document) {
            if self.cache.reset(&post) {
                cleared += 1;
            }
        }

        for el in self.cache.hidden_elements(&self.document) {
            if self.cache.set_hidden(&el, false) {
                cleared += 1;
            }
        }

        state.hidden_count = 0;
        tracing::debug!(cleared, "过滤状态已重置");
    }
}
