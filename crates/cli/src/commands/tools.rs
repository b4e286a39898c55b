//! `thinkloop tools` — list the default tool registry.

use thinkloop_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = thinkloop_tools::default_registry(&config.search);

    println!("{}", registry.describe_all());
    if config.search.api_key.is_none() {
        eprintln!();
        eprintln!("  Note: SERPAPI_API_KEY is not set; Search will report that as its observation.");
    }
    Ok(())
}
