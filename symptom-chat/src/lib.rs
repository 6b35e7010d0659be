pub mod cli;
pub mod commands;
pub mod modules;
pub mod shared;

use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use cli::CliOptions;
use commands::{CommandFlow, TerminalCommand};
use modules::chat::{
    ConsentDetector, HttpServiceConfig, HttpSymptomService, OfflineSymptomService, Provider,
    RenderPort, SymptomServicePort, TerminalRenderer,
};
use modules::config::WidgetConfig;
use modules::{ChatModule, ConfigModule};
use shared::{AppError, AppResult};

/// 初始化日志
///
/// 日志写到 stderr，避免和 stdout 上的对话内容混在一起
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中会重复初始化，已有全局 subscriber 时忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run(options: CliOptions) -> AppResult<()> {
    init_tracing(options.verbose);

    info!("Symptom chat starting...");

    // 加载配置
    let config_module = match &options.config {
        Some(path) => ConfigModule::new_with_file(path.clone()),
        None => ConfigModule::new_in_memory(),
    };
    let config = config_module.load(&options.overrides()).await?;
    if options.write_config {
        config_module.save(&config).await?;
        info!("Configuration written to {:?}", options.config);
    }

    let renderer: Arc<dyn RenderPort> = Arc::new(TerminalRenderer::stdout(
        config.display.user_label.clone(),
        config.display.bot_label.clone(),
    ));
    let service = build_service(&options, &config).await?;
    let module = build_chat_module(&config, service, renderer.clone());

    let session_id = module.create_session().await;
    if let Err(e) = module.start(session_id, options.hint.clone()).await {
        // 错误已经显示给用户，会话继续可用
        warn!("Conversation start failed: {}", e);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match TerminalCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                renderer.render_error(&e.to_string());
                continue;
            }
        };

        match commands::execute(&module, renderer.as_ref(), session_id, command).await {
            Ok(CommandFlow::Quit) => break,
            Ok(CommandFlow::Continue) => {}
            Err(e) => debug!("Command failed: {}", e),
        }
    }

    module.close_session(session_id).await?;
    info!("Symptom chat finished");
    Ok(())
}

/// 根据配置组装 ChatModule
pub fn build_chat_module(
    config: &WidgetConfig,
    service: Arc<dyn SymptomServicePort>,
    renderer: Arc<dyn RenderPort>,
) -> ChatModule {
    ChatModule::new(service, renderer)
        .with_consent_detector(ConsentDetector::new(
            config.consent.token.clone(),
            config.consent.match_mode,
        ))
        .with_unavailable_notice(config.display.unavailable_notice.clone())
}

/// 创建症状服务适配器
async fn build_service(
    options: &CliOptions,
    config: &WidgetConfig,
) -> AppResult<Arc<dyn SymptomServicePort>> {
    if options.offline {
        let providers = match &options.providers {
            Some(path) => load_providers(path).await?,
            None => Vec::new(),
        };
        info!(providers = providers.len(), "Using offline symptom service");
        return Ok(Arc::new(OfflineSymptomService::with_providers(providers)));
    }

    let service = HttpSymptomService::new(HttpServiceConfig {
        base_url: config.service.base_url.clone(),
        timeout_secs: config.service.timeout_secs,
    })
    .map_err(modules::chat::ApplicationError::from)?;
    info!(base_url = %service.base_url(), "Using HTTP symptom service");

    Ok(Arc::new(service))
}

/// 读取医疗机构列表，文件不存在时返回空列表
pub async fn load_providers(path: &Path) -> AppResult<Vec<Provider>> {
    if !path.exists() {
        warn!("Provider list {:?} not found, continuing without providers", path);
        return Ok(Vec::new());
    }

    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content).map_err(|e| AppError::ProviderListError(e.to_string()))
}
