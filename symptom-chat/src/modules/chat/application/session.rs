use std::sync::Arc;
use tracing::{debug, info, warn};

use super::ApplicationError;
use crate::modules::chat::domain::{ConsentDetector, ConsentFlag, Message, SessionId, Transcript};
use crate::modules::chat::ports::{
    HistoryEntry, RenderPort, ReplyRequest, StartRequest, SymptomServiceError, SymptomServicePort,
};

/// 服务不可达时显示的默认提示
pub const DEFAULT_UNAVAILABLE_NOTICE: &str =
    "Unable to reach the symptom service. Please try again later.";

/// 聊天会话
///
/// 持有会话记录和同意标记，所有状态变更都通过 `&mut self` 完成，
/// 因此同一会话同一时间最多只有一个进行中的请求
pub struct ChatSession {
    id: SessionId,
    transcript: Transcript,
    consent: ConsentFlag,
    /// 服务端在 start 时返回的会话 ID
    remote_session_id: Option<String>,
    service: Arc<dyn SymptomServicePort>,
    renderer: Arc<dyn RenderPort>,
    detector: ConsentDetector,
    unavailable_notice: String,
}

impl ChatSession {
    pub fn new(service: Arc<dyn SymptomServicePort>, renderer: Arc<dyn RenderPort>) -> Self {
        Self {
            id: SessionId::new(),
            transcript: Transcript::new(),
            consent: ConsentFlag::new(),
            remote_session_id: None,
            service,
            renderer,
            detector: ConsentDetector::default(),
            unavailable_notice: DEFAULT_UNAVAILABLE_NOTICE.to_string(),
        }
    }

    pub fn with_detector(mut self, detector: ConsentDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_unavailable_notice(mut self, notice: impl Into<String>) -> Self {
        self.unavailable_notice = notice.into();
        self
    }

    // Getters
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn consent(&self) -> bool {
        self.consent.is_granted()
    }

    pub fn remote_session_id(&self) -> Option<&str> {
        self.remote_session_id.as_deref()
    }

    /// 当前会话记录的线上格式
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.transcript
            .iter()
            .map(|msg| HistoryEntry {
                role: msg.role(),
                content: msg.content().to_string(),
            })
            .collect()
    }

    /// 开始对话，显示服务端的开场消息
    pub async fn start(&mut self) -> Result<&Message, ApplicationError> {
        self.start_with(StartRequest::default()).await
    }

    /// 带症状提示开始对话
    pub async fn start_with_hint(
        &mut self,
        hint: impl Into<String>,
    ) -> Result<&Message, ApplicationError> {
        self.start_with(StartRequest::with_hint(hint)).await
    }

    async fn start_with(&mut self, request: StartRequest) -> Result<&Message, ApplicationError> {
        debug!(
            session_id = %self.id,
            service = self.service.service_id(),
            "Starting conversation"
        );

        let result = self.service.start(request).await;
        match result {
            Ok(reply) => {
                if let Some(remote_id) = reply.session_id {
                    debug!(
                        session_id = %self.id,
                        remote_id = %remote_id,
                        "Service assigned session"
                    );
                    self.remote_session_id = Some(remote_id);
                }
                Ok(self.append_and_render(Message::new_bot(reply.reply)))
            }
            Err(e) => Err(self.report_failure("start", e)),
        }
    }

    /// 提交用户消息
    ///
    /// 顺序：显示并追加用户消息 → 更新同意标记 → 发送完整历史 → 显示并追加回复。
    /// 本次请求携带的同意状态已包含本条消息的检测结果
    pub async fn submit(&mut self, text: impl Into<String>) -> Result<&Message, ApplicationError> {
        let text = text.into();
        let affirmative = !self.consent.is_granted() && self.detector.is_affirmative(&text);

        self.append_and_render(Message::new_user(text));

        if affirmative && self.consent.grant() {
            info!(session_id = %self.id, "Consent granted");
        }

        let request = ReplyRequest {
            history: self.history(),
            consent: self.consent.is_granted(),
            session_id: self.remote_session_id.clone(),
        };

        debug!(
            session_id = %self.id,
            history_len = request.history.len(),
            consent = request.consent,
            "Sending reply request"
        );

        let result = self.service.reply(request).await;
        match result {
            Ok(reply) => Ok(self.append_and_render(Message::new_bot(reply.reply))),
            Err(e) => Err(self.report_failure("reply", e)),
        }
    }

    fn append_and_render(&mut self, message: Message) -> &Message {
        self.renderer.render_message(&message);
        self.transcript.push(message)
    }

    /// 记录失败并显示统一提示，会话记录保持不变
    fn report_failure(
        &self,
        operation: &'static str,
        error: SymptomServiceError,
    ) -> ApplicationError {
        warn!(
            session_id = %self.id,
            operation,
            kind = error.kind(),
            "Symptom service call failed: {}",
            error
        );
        self.renderer.render_error(&self.unavailable_notice);
        ApplicationError::Service(error)
    }
}
