use async_trait::async_trait;
use tracing::debug;

use crate::modules::chat::ports::{
    BookingIntent, BookingLink, HealthStatus, Provider, ProviderQuery, ReplyRequest,
    ServiceReply, StartRequest, SymptomServiceError, SymptomServicePort,
};

/// 离线模式的服务端会话 ID
pub const OFFLINE_SESSION_ID: &str = "offline";

/// 开场免责声明
pub const DISCLAIMER: &str = "Hinweis: Dies ersetzt keine ärztliche Behandlung. Bei Gefahr 112 anrufen.\nSind Sie einverstanden? (Ja/Nein)";

/// 未同意时的提醒
pub const CONSENT_REMINDER: &str = "Bitte bestätigen Sie mit 'Ja'.";

/// 已同意后的固定追问
pub const FOLLOW_UP_QUESTION: &str = "Verstanden. Können Sie Ihre Schmerzstärke (0–10) angeben?";

/// 离线症状服务
///
/// 不访问网络，按服务端未配置 LLM 时的规则作答，
/// 医疗机构查询基于内存中的列表
#[derive(Debug, Clone, Default)]
pub struct OfflineSymptomService {
    providers: Vec<Provider>,
}

impl OfflineSymptomService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_providers(providers: Vec<Provider>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl SymptomServicePort for OfflineSymptomService {
    fn service_id(&self) -> &str {
        "offline"
    }

    async fn start(&self, request: StartRequest) -> Result<ServiceReply, SymptomServiceError> {
        if let Some(hint) = &request.symptom_hint {
            debug!("Offline start with hint: {}", hint);
        }
        Ok(ServiceReply {
            reply: DISCLAIMER.to_string(),
            session_id: Some(OFFLINE_SESSION_ID.to_string()),
        })
    }

    async fn reply(&self, request: ReplyRequest) -> Result<ServiceReply, SymptomServiceError> {
        let reply = if request.consent {
            FOLLOW_UP_QUESTION
        } else {
            CONSENT_REMINDER
        };
        Ok(ServiceReply::new(reply))
    }

    async fn search_providers(
        &self,
        query: ProviderQuery,
    ) -> Result<Vec<Provider>, SymptomServiceError> {
        let city = query.city.as_deref().map(str::to_lowercase);

        Ok(self
            .providers
            .iter()
            .filter(|p| p.visible && p.specialty == query.specialty)
            .filter(|p| match &city {
                Some(city) => p.city.to_lowercase() == *city,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn book_intent(&self, intent: BookingIntent) -> Result<BookingLink, SymptomServiceError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.id == intent.provider_id)
            .ok_or_else(|| SymptomServiceError::Service {
                status: 404,
                body: "Provider nicht gefunden".to_string(),
            })?;

        Ok(BookingLink {
            booking_url: provider.booking_link(&intent.reason_key),
        })
    }

    async fn health_check(&self) -> Result<HealthStatus, SymptomServiceError> {
        Ok(HealthStatus {
            is_healthy: true,
            latency_ms: Some(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::domain::MessageRole;
    use crate::modules::chat::ports::HistoryEntry;

    fn provider(id: &str, specialty: &str, city: &str, visible: bool) -> Provider {
        Provider {
            id: id.to_string(),
            name: format!("Praxis {}", id),
            specialty: specialty.to_string(),
            city: city.to_string(),
            booking_url: format!("https://www.doctolib.de/{}/", id),
            booking_vendor: Some("doctolib".to_string()),
            reason_map: [("checkup".to_string(), "42".to_string())]
                .into_iter()
                .collect(),
            visible,
        }
    }

    fn reply_request(consent: bool) -> ReplyRequest {
        ReplyRequest {
            history: vec![HistoryEntry {
                role: MessageRole::User,
                content: "Hallo".to_string(),
            }],
            consent,
            session_id: Some(OFFLINE_SESSION_ID.to_string()),
        }
    }

    #[tokio::test]
    async fn test_start_returns_disclaimer() {
        let service = OfflineSymptomService::new();
        let reply = service.start(StartRequest::default()).await.unwrap();

        assert_eq!(reply.reply, DISCLAIMER);
        assert_eq!(reply.session_id.as_deref(), Some(OFFLINE_SESSION_ID));
    }

    #[tokio::test]
    async fn test_reply_is_gated_on_consent() {
        let service = OfflineSymptomService::new();

        let reply = service.reply(reply_request(false)).await.unwrap();
        assert_eq!(reply.reply, CONSENT_REMINDER);

        let reply = service.reply(reply_request(true)).await.unwrap();
        assert_eq!(reply.reply, FOLLOW_UP_QUESTION);
    }

    #[tokio::test]
    async fn test_search_filters_visible_and_city() {
        let service = OfflineSymptomService::with_providers(vec![
            provider("a", "orthopedics", "Berlin", true),
            provider("b", "orthopedics", "Hamburg", true),
            provider("c", "orthopedics", "Berlin", false),
            provider("d", "dermatology", "Berlin", true),
        ]);

        let all = service
            .search_providers(ProviderQuery::new("orthopedics"))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let berlin = service
            .search_providers(ProviderQuery::new("orthopedics").with_city("berlin"))
            .await
            .unwrap();
        assert_eq!(berlin.len(), 1);
        assert_eq!(berlin[0].id, "a");
    }

    #[tokio::test]
    async fn test_book_intent() {
        let service =
            OfflineSymptomService::with_providers(vec![provider("a", "orthopedics", "Berlin", true)]);

        let link = service
            .book_intent(BookingIntent {
                provider_id: "a".to_string(),
                reason_key: "checkup".to_string(),
                note: None,
            })
            .await
            .unwrap();
        assert_eq!(link.booking_url, "https://www.doctolib.de/a?reason=42");

        let missing = service
            .book_intent(BookingIntent {
                provider_id: "zzz".to_string(),
                reason_key: "checkup".to_string(),
                note: None,
            })
            .await;
        assert!(matches!(
            missing,
            Err(SymptomServiceError::Service { status: 404, .. })
        ));
    }
}
