pub mod chat;
pub mod config_cmd;
pub mod plan;
pub mod react;
pub mod tools;

use std::sync::Arc;

use thinkloop_config::AppConfig;
use thinkloop_core::provider::Provider;
use thinkloop_providers::OpenAiCompatProvider;

/// Load the configuration and build the completion gateway from it.
pub(crate) fn load_gateway() -> Result<(AppConfig, Arc<dyn Provider>), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = match OpenAiCompatProvider::from_config(&config.llm) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!();
            eprintln!("  ERROR: {e}");
            eprintln!();
            eprintln!("  Set these environment variables (or put them in a .env file):");
            eprintln!("    LLM_API_KEY   = 'sk-...'");
            eprintln!("    LLM_BASE_URL  = 'https://api.openai.com/v1'");
            eprintln!("    LLM_MODEL_ID  = 'gpt-4o-mini'");
            eprintln!();
            eprintln!("  Or add them to the [llm] section of:");
            eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
            eprintln!();
            return Err(e.into());
        }
    };

    tracing::debug!(model = provider.model(), "Completion gateway ready");
    Ok((config, Arc::new(provider)))
}
