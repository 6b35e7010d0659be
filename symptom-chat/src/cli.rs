use clap::Parser;
use std::path::PathBuf;

use crate::modules::config::ConfigOverrides;

/// 命令行参数
#[derive(Parser, Debug, Clone)]
#[command(name = "symptom-chat", version, about = "Chat with a remote symptom-checking service")]
pub struct CliOptions {
    /// Base URL of the symptom service
    #[arg(long, env = "SYMPTOM_CHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short, long, env = "SYMPTOM_CHAT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Affirmative token that grants consent
    #[arg(long)]
    pub consent_token: Option<String>,

    /// Symptom hint sent with the start request
    #[arg(long)]
    pub hint: Option<String>,

    /// Answer locally instead of calling the service
    #[arg(long)]
    pub offline: bool,

    /// Provider list (JSON array) used in offline mode
    #[arg(long, requires = "offline")]
    pub providers: Option<PathBuf>,

    /// Write the effective configuration to the --config path before starting
    #[arg(long, requires = "config")]
    pub write_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliOptions {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            consent_token: self.consent_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        let options = CliOptions::try_parse_from([
            "symptom-chat",
            "--base-url",
            "https://triage.example.org",
            "--timeout-secs",
            "5",
            "--hint",
            "Kopfschmerzen",
        ])
        .unwrap();

        let overrides = options.overrides();
        assert_eq!(
            overrides.base_url.as_deref(),
            Some("https://triage.example.org")
        );
        assert_eq!(overrides.timeout_secs, Some(5));
        assert_eq!(options.hint.as_deref(), Some("Kopfschmerzen"));
        assert!(!options.offline);
    }

    #[test]
    fn test_base_url_from_env_and_flag_priority() {
        std::env::set_var("SYMPTOM_CHAT_BASE_URL", "https://env.example.org");

        let from_env = CliOptions::try_parse_from(["symptom-chat"]).unwrap();
        let from_flag = CliOptions::try_parse_from([
            "symptom-chat",
            "--base-url",
            "https://flag.example.org",
        ])
        .unwrap();

        std::env::remove_var("SYMPTOM_CHAT_BASE_URL");

        assert_eq!(
            from_env.overrides().base_url.as_deref(),
            Some("https://env.example.org")
        );
        assert_eq!(
            from_flag.overrides().base_url.as_deref(),
            Some("https://flag.example.org")
        );
    }

    #[test]
    fn test_providers_requires_offline() {
        let result = CliOptions::try_parse_from(["symptom-chat", "--providers", "p.json"]);
        assert!(result.is_err());
    }
}
