//! 变更调度器
//!
//! 把页面变更通知转换成过滤遍历的定时计划。时间由调用方以 `Instant` 传入，
//! 本身不睡眠也不持有定时器，事件循环按 [`PassScheduler::next_deadline`] 等待，
//! 再用 [`PassScheduler::take_due`] 取出到期的遍历。
//!
//! - 变更触发：只保留一个待执行计划，新一批新增节点到来时取消旧计划并重新计时。
//!   距上一次变更触发的遍历不足节流间隔时延迟 `throttle`，否则走 `fast` 快速通道。
//! - 地址变化：每次地址变化单独安排一次遍历，与变更计划互不影响。
//! - 启动补扫：启动后固定延迟的几次遍历，用来兜住观察器挂上之前加载的内容。

use tokio::time::Instant;

use crate::config::TimingConfig;

/// 触发遍历的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassTrigger {
    Mutation,
    Navigation,
    Startup,
}

/// 遍历调度状态机
#[derive(Debug)]
pub struct PassScheduler {
    timing: TimingConfig,
    pending_mutation: Option<Instant>,
    pending_navigation: Vec<Instant>,
    pending_startup: Vec<Instant>,
    last_mutation_pass: Option<Instant>,
    last_address: Option<String>,
}

impl PassScheduler {
    pub fn new(timing: TimingConfig) -> Self {
        Self {
            timing,
            pending_mutation: None,
            pending_navigation: Vec::new(),
            pending_startup: Vec::new(),
            last_mutation_pass: None,
            last_address: None,
        }
    }

    /// 记录初始地址并安排启动补扫
    pub fn start(&mut self, address: &str, now: Instant) {
        self.last_address = Some(address.to_string());
        self.pending_startup = self
            .timing
            .startup()
            .into_iter()
            .map(|delay| now + delay)
            .collect();
    }

    /// 结构变更：返回新的计划时间；禁用或没有新增节点时忽略
    pub fn on_mutation(&mut self, enabled: bool, added_nodes: usize, now: Instant) -> Option<Instant> {
        if !enabled || added_nodes == 0 {
            return None;
        }

        let throttled = self
            .last_mutation_pass
            .map(|last| now.saturating_duration_since(last) < self.timing.throttle())
            .unwrap_or(false);
        let delay = if throttled {
            self.timing.throttle()
        } else {
            self.timing.fast()
        };

        let deadline = now + delay;
        if self.pending_mutation.replace(deadline).is_some() {
            tracing::trace!(?delay, "取消旧的变更计划并重新计时");
        }
        Some(deadline)
    }

    /// 整个文档发生变更：地址与上次不同时安排一次遍历
    pub fn on_document_mutation(&mut self, address: &str, now: Instant) -> Option<Instant> {
        if self.last_address.as_deref() == Some(address) {
            return None;
        }

        tracing::debug!(address, "检测到页面地址变化");
        self.last_address = Some(address.to_string());
        let deadline = now + self.timing.navigation();
        self.pending_navigation.push(deadline);
        Some(deadline)
    }

    /// 最早的待执行时间
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_mutation
            .iter()
            .chain(self.pending_navigation.iter())
            .chain(self.pending_startup.iter())
            .min()
            .copied()
    }

    pub fn has_pending_mutation(&self) -> bool {
        self.pending_mutation.is_some()
    }

    pub fn last_address(&self) -> Option<&str> {
        self.last_address.as_deref()
    }

    /// 取出所有已到期的遍历，按到期时间排序
    pub fn take_due(&mut self, now: Instant) -> Vec<PassTrigger> {
        let mut due: Vec<(Instant, PassTrigger)> = Vec::new();

        if let Some(deadline) = self.pending_mutation {
            if deadline <= now {
                self.pending_mutation = None;
                self.last_mutation_pass = Some(now);
                due.push((deadline, PassTrigger::Mutation));
            }
        }

        drain_due(&mut self.pending_navigation, now, PassTrigger::Navigation, &mut due);
        drain_due(&mut self.pending_startup, now, PassTrigger::Startup, &mut due);

        due.sort_by_key(|(deadline, _)| *deadline);
        due.into_iter().map(|(_, trigger)| trigger).collect()
    }
}

fn drain_due(
    pending: &mut Vec<Instant>,
    now: Instant,
    trigger: PassTrigger,
    due: &mut Vec<(Instant, PassTrigger)>,
) {
    pending.retain(|deadline| {
        if *deadline <= now {
            due.push((*deadline, trigger));
            false
        } else {
            true
        }
    });
}
