use std::io::{self, Write};
use std::sync::Mutex;
use tracing::debug;

use crate::modules::chat::domain::{Message, MessageRole};
use crate::modules::chat::ports::RenderPort;

/// 终端渲染器
///
/// 每条消息输出一行 `标签: 内容`，提示以 `*` 开头，错误以 `!` 开头
pub struct TerminalRenderer<W: Write + Send> {
    writer: Mutex<W>,
    user_label: String,
    bot_label: String,
}

impl TerminalRenderer<io::Stdout> {
    /// 输出到标准输出
    pub fn stdout(user_label: impl Into<String>, bot_label: impl Into<String>) -> Self {
        Self::new(io::stdout(), user_label, bot_label)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(writer: W, user_label: impl Into<String>, bot_label: impl Into<String>) -> Self {
        Self {
            writer: Mutex::new(writer),
            user_label: user_label.into(),
            bot_label: bot_label.into(),
        }
    }

    fn label(&self, role: MessageRole) -> &str {
        match role {
            MessageRole::User => &self.user_label,
            MessageRole::Bot => &self.bot_label,
        }
    }

    fn write_line(&self, line: &str) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            debug!("Failed to write to terminal: {}", e);
        }
    }

    /// 取回底层 writer
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> RenderPort for TerminalRenderer<W> {
    fn render_message(&self, message: &Message) {
        self.write_line(&format!("{}: {}", self.label(message.role()), message.content()));
    }

    fn render_notice(&self, notice: &str) {
        self.write_line(&format!("* {}", notice));
    }

    fn render_error(&self, error: &str) {
        self.write_line(&format!("! {}", error));
    }
}
