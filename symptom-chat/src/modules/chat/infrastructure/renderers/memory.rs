use std::sync::Mutex;

use crate::modules::chat::domain::{Message, MessageRole};
use crate::modules::chat::ports::RenderPort;

/// 一次渲染调用的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedLine {
    Message { role: MessageRole, content: String },
    Notice(String),
    Error(String),
}

/// 内存渲染器
///
/// 记录所有渲染调用，用于无界面测试
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    lines: Mutex<Vec<RenderedLine>>,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, line: RenderedLine) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }

    /// 所有渲染记录
    pub fn lines(&self) -> Vec<RenderedLine> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// 只取错误信息
    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                RenderedLine::Error(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    /// 只取提示信息
    pub fn notices(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                RenderedLine::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }
}

impl RenderPort for MemoryRenderer {
    fn render_message(&self, message: &Message) {
        self.record(RenderedLine::Message {
            role: message.role(),
            content: message.content().to_string(),
        });
    }

    fn render_notice(&self, notice: &str) {
        self.record(RenderedLine::Notice(notice.to_string()));
    }

    fn render_error(&self, error: &str) {
        self.record(RenderedLine::Error(error.to_string()));
    }
}
