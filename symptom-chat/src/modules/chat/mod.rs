// Chat Module - 聊天模块
//
// 实现六边形架构（Hexagonal Architecture）：
// - domain: 领域层，包含消息、会话记录、同意标记和同意检测
// - ports: 端口层，定义症状服务和显示界面的抽象接口
// - infrastructure: 基础设施层，HTTP/离线服务适配器和渲染器
// - application: 应用层，ChatSession 协调状态与网络请求

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use application::{ApplicationError, ChatSession, DEFAULT_UNAVAILABLE_NOTICE};

pub use domain::{
    ConsentDetector, ConsentFlag, ConsentMatchMode, Message, MessageRole, SessionId, Transcript,
    DEFAULT_CONSENT_TOKEN,
};

pub use infrastructure::{
    HttpServiceConfig, HttpSymptomService, MemoryRenderer, OfflineSymptomService, RenderedLine,
    TerminalRenderer,
};

pub use ports::{
    BookingIntent, BookingLink, HealthStatus, HistoryEntry, Provider, ProviderQuery, RenderPort,
    ReplyRequest, ServiceReply, StartRequest, SymptomServiceError, SymptomServicePort,
};

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

/// Chat 模块容器
///
/// 管理模块内的依赖注入，并持有多个相互独立的会话。
/// 每个会话放在各自的 Mutex 中，跨任务访问时状态变更仍然串行
pub struct ChatModule {
    service: Arc<dyn SymptomServicePort>,
    renderer: Arc<dyn RenderPort>,
    detector: ConsentDetector,
    unavailable_notice: String,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<ChatSession>>>>,
}

impl ChatModule {
    /// 创建新的 ChatModule 实例
    ///
    /// # Arguments
    /// * `service` - 症状服务适配器
    /// * `renderer` - 新会话使用的显示端口
    pub fn new(service: Arc<dyn SymptomServicePort>, renderer: Arc<dyn RenderPort>) -> Self {
        Self {
            service,
            renderer,
            detector: ConsentDetector::default(),
            unavailable_notice: DEFAULT_UNAVAILABLE_NOTICE.to_string(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_consent_detector(mut self, detector: ConsentDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_unavailable_notice(mut self, notice: impl Into<String>) -> Self {
        self.unavailable_notice = notice.into();
        self
    }

    // Session lifecycle

    /// 创建会话
    pub async fn create_session(&self) -> SessionId {
        let session = ChatSession::new(self.service.clone(), self.renderer.clone())
            .with_detector(self.detector.clone())
            .with_unavailable_notice(self.unavailable_notice.clone());
        let id = session.id();

        let mut sessions = self.sessions.write().await;
        sessions.insert(id, Arc::new(Mutex::new(session)));
        info!(session_id = %id, "Session created");

        id
    }

    /// 关闭会话，返回其会话记录长度
    pub async fn close_session(&self, id: SessionId) -> Result<usize, ApplicationError> {
        let session = {
            let mut sessions = self.sessions.write().await;
            sessions
                .remove(&id)
                .ok_or_else(|| ApplicationError::SessionNotFound(id.to_string()))?
        };

        let len = session.lock().await.transcript().len();
        info!(session_id = %id, messages = len, "Session closed");
        Ok(len)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn session(&self, id: SessionId) -> Result<Arc<Mutex<ChatSession>>, ApplicationError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .cloned()
            .ok_or_else(|| ApplicationError::SessionNotFound(id.to_string()))
    }

    // Conversation

    /// 开始对话
    pub async fn start(
        &self,
        id: SessionId,
        symptom_hint: Option<String>,
    ) -> Result<Message, ApplicationError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;

        let message = match symptom_hint {
            Some(hint) => session.start_with_hint(hint).await?,
            None => session.start().await?,
        };
        Ok(message.clone())
    }

    /// 提交用户消息
    pub async fn submit(
        &self,
        id: SessionId,
        text: impl Into<String>,
    ) -> Result<Message, ApplicationError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;

        let message = session.submit(text).await?;
        Ok(message.clone())
    }

    // Queries

    pub async fn transcript(&self, id: SessionId) -> Result<Vec<Message>, ApplicationError> {
        let session = self.session(id).await?;
        let session = session.lock().await;
        Ok(session.transcript().messages().to_vec())
    }

    pub async fn consent(&self, id: SessionId) -> Result<bool, ApplicationError> {
        let session = self.session(id).await?;
        let session = session.lock().await;
        Ok(session.consent())
    }

    // Service operations（不影响会话状态）

    /// 查询医疗机构
    pub async fn search_providers(
        &self,
        query: ProviderQuery,
    ) -> Result<Vec<Provider>, ApplicationError> {
        if query.specialty.trim().is_empty() {
            return Err(ApplicationError::ValidationError(
                "Specialty cannot be empty".to_string(),
            ));
        }
        Ok(self.service.search_providers(query).await?)
    }

    /// 提交预约意向
    pub async fn book_intent(
        &self,
        intent: BookingIntent,
    ) -> Result<BookingLink, ApplicationError> {
        if intent.provider_id.trim().is_empty() || intent.reason_key.trim().is_empty() {
            return Err(ApplicationError::ValidationError(
                "Provider id and reason key are required".to_string(),
            ));
        }
        Ok(self.service.book_intent(intent).await?)
    }

    pub async fn health_check(&self) -> Result<HealthStatus, ApplicationError> {
        Ok(self.service.health_check().await?)
    }
}
