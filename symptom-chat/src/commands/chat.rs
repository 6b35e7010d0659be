// Chat Commands
//
// 终端输入的解析与执行：普通文本作为用户消息提交，
// 以 `/` 开头的行是本地命令，`//` 开头的行按字面提交

use tracing::debug;

use crate::modules::chat::{
    ApplicationError, BookingIntent, ChatModule, ProviderQuery, RenderPort, SessionId,
};

const HELP_TEXT: &str = "Commands: /providers <specialty> [city], /book <provider_id> <reason_key> [note], /health, /transcript, /help, /quit";

/// 终端命令
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalCommand {
    /// 提交用户消息
    Say(String),
    Providers { specialty: String, city: Option<String> },
    Book {
        provider_id: String,
        reason_key: String,
        note: Option<String>,
    },
    Health,
    Transcript,
    Help,
    Quit,
}

/// 命令执行后的流程控制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandFlow {
    Continue,
    Quit,
}

impl TerminalCommand {
    /// 解析一行输入
    pub fn parse(line: &str) -> Result<Self, ApplicationError> {
        if let Some(literal) = line.strip_prefix("//") {
            return Ok(TerminalCommand::Say(format!("/{}", literal)));
        }
        let Some(command) = line.strip_prefix('/') else {
            return Ok(TerminalCommand::Say(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match name {
            "quit" | "exit" => Ok(TerminalCommand::Quit),
            "help" => Ok(TerminalCommand::Help),
            "health" => Ok(TerminalCommand::Health),
            "transcript" => Ok(TerminalCommand::Transcript),
            "providers" => match args.as_slice() {
                [specialty] => Ok(TerminalCommand::Providers {
                    specialty: specialty.to_string(),
                    city: None,
                }),
                [specialty, city @ ..] => Ok(TerminalCommand::Providers {
                    specialty: specialty.to_string(),
                    city: Some(city.join(" ")),
                }),
                [] => Err(ApplicationError::ValidationError(
                    "Usage: /providers <specialty> [city]".to_string(),
                )),
            },
            "book" => match args.as_slice() {
                [provider_id, reason_key, note @ ..] => Ok(TerminalCommand::Book {
                    provider_id: provider_id.to_string(),
                    reason_key: reason_key.to_string(),
                    note: (!note.is_empty()).then(|| note.join(" ")),
                }),
                _ => Err(ApplicationError::ValidationError(
                    "Usage: /book <provider_id> <reason_key> [note]".to_string(),
                )),
            },
            other => Err(ApplicationError::ValidationError(format!(
                "Unknown command: /{}",
                other
            ))),
        }
    }
}

/// 执行命令
///
/// 会话消息的失败已由会话自身显示，其余命令的失败在这里显示
pub async fn execute(
    module: &ChatModule,
    renderer: &dyn RenderPort,
    session_id: SessionId,
    command: TerminalCommand,
) -> Result<CommandFlow, ApplicationError> {
    debug!(session_id = %session_id, ?command, "Executing command");

    match command {
        TerminalCommand::Say(text) => {
            module.submit(session_id, text).await?;
        }
        TerminalCommand::Providers { specialty, city } => {
            let mut query = ProviderQuery::new(specialty);
            if let Some(city) = city {
                query = query.with_city(city);
            }
            let providers = report(renderer, module.search_providers(query).await)?;

            renderer.render_notice(&format!("{} provider(s) found", providers.len()));
            for provider in &providers {
                renderer.render_notice(&format!(
                    "{} | {} | {} | {}",
                    provider.id, provider.name, provider.city, provider.booking_url
                ));
            }
        }
        TerminalCommand::Book {
            provider_id,
            reason_key,
            note,
        } => {
            let intent = BookingIntent {
                provider_id,
                reason_key,
                note,
            };
            let link = report(renderer, module.book_intent(intent).await)?;
            renderer.render_notice(&format!("Booking link: {}", link.booking_url));
        }
        TerminalCommand::Health => {
            let status = report(renderer, module.health_check().await)?;
            let latency = status
                .latency_ms
                .map(|ms| format!(" ({} ms)", ms))
                .unwrap_or_default();
            let state = if status.is_healthy { "healthy" } else { "unhealthy" };
            renderer.render_notice(&format!("Service is {}{}", state, latency));
        }
        TerminalCommand::Transcript => {
            let messages = module.transcript(session_id).await?;
            let consent = module.consent(session_id).await?;
            let since = messages
                .first()
                .map(|m| format!(" since {}", m.created_at().format("%H:%M:%S")))
                .unwrap_or_default();
            renderer.render_notice(&format!(
                "{} message(s){}, consent: {}",
                messages.len(),
                since,
                if consent { "yes" } else { "no" }
            ));
        }
        TerminalCommand::Help => renderer.render_notice(HELP_TEXT),
        TerminalCommand::Quit => return Ok(CommandFlow::Quit),
    }

    Ok(CommandFlow::Continue)
}

/// 显示错误后原样返回结果
fn report<T>(
    renderer: &dyn RenderPort,
    result: Result<T, ApplicationError>,
) -> Result<T, ApplicationError> {
    if let Err(e) = &result {
        renderer.render_error(&e.to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::{MemoryRenderer, OfflineSymptomService, Provider};
    use std::sync::Arc;

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(
            TerminalCommand::parse("Ja, seit gestern").unwrap(),
            TerminalCommand::Say("Ja, seit gestern".to_string())
        );
        assert_eq!(
            TerminalCommand::parse("").unwrap(),
            TerminalCommand::Say(String::new())
        );
    }

    #[test]
    fn test_parse_escaped_slash() {
        assert_eq!(
            TerminalCommand::parse("//quit").unwrap(),
            TerminalCommand::Say("/quit".to_string())
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(TerminalCommand::parse("/quit").unwrap(), TerminalCommand::Quit);
        assert_eq!(
            TerminalCommand::parse("/providers orthopedics Bad Homburg").unwrap(),
            TerminalCommand::Providers {
                specialty: "orthopedics".to_string(),
                city: Some("Bad Homburg".to_string()),
            }
        );
        assert_eq!(
            TerminalCommand::parse("/book p1 back_pain seit drei Tagen").unwrap(),
            TerminalCommand::Book {
                provider_id: "p1".to_string(),
                reason_key: "back_pain".to_string(),
                note: Some("seit drei Tagen".to_string()),
            }
        );
        assert_eq!(
            TerminalCommand::parse("/book p1 back_pain").unwrap(),
            TerminalCommand::Book {
                provider_id: "p1".to_string(),
                reason_key: "back_pain".to_string(),
                note: None,
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(TerminalCommand::parse("/providers").is_err());
        assert!(TerminalCommand::parse("/book p1").is_err());
        assert!(TerminalCommand::parse("/unknown").is_err());
    }

    #[tokio::test]
    async fn test_execute_conversation_and_quit() {
        let renderer = Arc::new(MemoryRenderer::new());
        let module = ChatModule::new(Arc::new(OfflineSymptomService::new()), renderer.clone());
        let id = module.create_session().await;

        let flow = execute(&module, &*renderer, id, TerminalCommand::Say("Ja".into()))
            .await
            .unwrap();
        assert_eq!(flow, CommandFlow::Continue);
        assert!(module.consent(id).await.unwrap());

        let flow = execute(&module, &*renderer, id, TerminalCommand::Quit)
            .await
            .unwrap();
        assert_eq!(flow, CommandFlow::Quit);
    }

    #[tokio::test]
    async fn test_execute_providers_and_booking() {
        let renderer = Arc::new(MemoryRenderer::new());
        let service = OfflineSymptomService::with_providers(vec![Provider {
            id: "p1".to_string(),
            name: "Praxis Nord".to_string(),
            specialty: "orthopedics".to_string(),
            city: "Berlin".to_string(),
            booking_url: "https://example.org/p1".to_string(),
            visible: true,
            ..Provider::default()
        }]);
        let module = ChatModule::new(Arc::new(service), renderer.clone());
        let id = module.create_session().await;

        execute(
            &module,
            &*renderer,
            id,
            TerminalCommand::parse("/providers orthopedics").unwrap(),
        )
        .await
        .unwrap();
        execute(
            &module,
            &*renderer,
            id,
            TerminalCommand::parse("/book p1 checkup").unwrap(),
        )
        .await
        .unwrap();

        let notices = renderer.notices();
        assert_eq!(notices[0], "1 provider(s) found");
        assert_eq!(notices.last().unwrap(), "Booking link: https://example.org/p1");
    }

    #[tokio::test]
    async fn test_execute_renders_failures() {
        let renderer = Arc::new(MemoryRenderer::new());
        let module = ChatModule::new(Arc::new(OfflineSymptomService::new()), renderer.clone());
        let id = module.create_session().await;

        let result = execute(
            &module,
            &*renderer,
            id,
            TerminalCommand::parse("/book missing checkup").unwrap(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(renderer.errors().len(), 1);
        // 预约失败不影响会话记录
        assert!(module.transcript(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_summary() {
        let renderer = Arc::new(MemoryRenderer::new());
        let module = ChatModule::new(Arc::new(OfflineSymptomService::new()), renderer.clone());
        let id = module.create_session().await;

        execute(&module, &*renderer, id, TerminalCommand::Transcript)
            .await
            .unwrap();
        assert_eq!(renderer.notices().last().unwrap(), "0 message(s), consent: no");

        module.start(id, None).await.unwrap();
        module.submit(id, "Ja").await.unwrap();
        execute(&module, &*renderer, id, TerminalCommand::Transcript)
            .await
            .unwrap();

        let summary = renderer.notices().last().unwrap().clone();
        assert!(summary.starts_with("3 message(s) since "));
        assert!(summary.ends_with(", consent: yes"));
    }
}
