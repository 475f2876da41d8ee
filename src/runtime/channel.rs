//! 命令通道消息
//!
//! 与宿主之间的 JSON 消息，按 `type` 字段区分种类。

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::error::{FilterError, FilterResult};
use crate::pipeline::CountReporter;

/// 入站命令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    Toggle { enabled: bool },
    UpdateKeywords { keywords: Vec<String> },
    GetCount,
    GetStatus,
}

/// 命令应答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Status { enabled: bool, count: usize },
    Count { count: usize },
    Ack { success: bool },
}

impl Response {
    pub fn ok() -> Self {
        Response::Ack { success: true }
    }
}

/// 主动发出的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outbound {
    UpdateCount { count: usize },
}

/// 携带应答通道的命令
#[derive(Debug)]
pub struct CommandEnvelope {
    pub command: Command,
    pub reply: oneshot::Sender<Response>,
}

impl CommandEnvelope {
    pub fn new(command: Command) -> (Self, oneshot::Receiver<Response>) {
        let (reply, rx) = oneshot::channel();
        (Self { command, reply }, rx)
    }
}

/// 通过 mpsc 通道向外报告隐藏计数
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ChannelReporter {
    pub fn new(sender: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { sender }
    }
}

impl CountReporter for ChannelReporter {
    fn report_count(&self, count: usize) -> FilterResult<()> {
        self.sender
            .send(Outbound::UpdateCount { count })
            .map_err(|_| FilterError::ChannelClosed)
    }
}

/// 解析一条 JSON 命令
pub fn parse_command(json: &str) -> FilterResult<Command> {
    Ok(serde_json::from_str(json)?)
}
