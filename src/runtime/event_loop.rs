//! 单任务事件循环
//!
//! 页面事件、入站命令和调度器的最早到期时间在同一个任务里用 `select!` 复用。
//! 所有遍历都在这个任务中顺序执行，因此不会出现重叠的遍历。

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::config::TimingConfig;
use crate::core::EngineState;
use crate::pipeline::FilterController;

use super::channel::{Command, CommandEnvelope, Response};
use super::scheduler::{PassScheduler, PassTrigger};
use super::sync;

/// 宿主发来的页面事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// 主内容区发生结构变更
    Mutation { added_nodes: usize },
    /// 整个文档发生结构变更，附带当前地址
    DocumentMutation { address: String },
}

/// 过滤运行时
pub struct FilterRuntime {
    controller: FilterController,
    state: EngineState,
    scheduler: PassScheduler,
    passes: usize,
}

impl FilterRuntime {
    pub fn new(controller: FilterController, state: EngineState, timing: TimingConfig) -> Self {
        Self {
            controller,
            state,
            scheduler: PassScheduler::new(timing),
            passes: 0,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn controller(&self) -> &FilterController {
        &self.controller
    }

    pub fn scheduler(&self) -> &PassScheduler {
        &self.scheduler
    }

    /// 已执行的定时遍历次数
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// 记录初始地址并安排启动补扫
    pub fn start(&mut self, address: &str, now: Instant) {
        self.scheduler.start(address, now);
    }

    /// 处理页面事件
    pub fn handle_event(&mut self, event: PageEvent, now: Instant) {
        match event {
            PageEvent::Mutation { added_nodes } => {
                self.scheduler
                    .on_mutation(self.state.enabled, added_nodes, now);
            }
            PageEvent::DocumentMutation { address } => {
                self.scheduler.on_document_mutation(&address, now);
            }
        }
    }

    /// 处理命令
    pub fn handle_command(&mut self, command: Command) -> Response {
        sync::apply_command(command, &mut self.controller, &mut self.state)
    }

    /// 执行所有到期的遍历，返回执行次数
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;

        for trigger in self.scheduler.take_due(now) {
            // 启动补扫只在启用时执行
            if trigger == PassTrigger::Startup && !self.state.enabled {
                continue;
            }
            tracing::debug!(?trigger, "执行定时遍历");
            self.controller.run_pass(&mut self.state);
            fired += 1;
        }

        self.passes += fired;
        fired
    }

    /// 运行事件循环，直到两个入站通道都关闭；返回最终的引擎状态
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<PageEvent>,
        mut commands: mpsc::UnboundedReceiver<CommandEnvelope>,
    ) -> EngineState {
        let mut events_open = true;
        let mut commands_open = true;

        while events_open || commands_open {
            let deadline = self.scheduler.next_deadline();

            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => self.handle_event(event, Instant::now()),
                    None => events_open = false,
                },
                envelope = commands.recv(), if commands_open => match envelope {
                    Some(CommandEnvelope { command, reply }) => {
                        let response = self.handle_command(command);
                        // 发送方可能已经不再等待应答
                        let _ = reply.send(response);
                    }
                    None => commands_open = false,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire_due(Instant::now());
                }
            }
        }

        tracing::info!(passes = self.passes, "事件循环结束");
        self.state
    }
}
