//! `thinkloop config` — show the effective configuration.

use thinkloop_config::AppConfig;

pub fn show(defaults_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    if defaults_only {
        println!("{}", AppConfig::default_toml());
        return Ok(());
    }

    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!(
        "# {}",
        AppConfig::config_dir().join("config.toml").display()
    );
    println!("{}", toml::to_string_pretty(&config.redacted())?);

    if let Err(e) = config.llm.require_complete() {
        eprintln!("  Warning: {e}");
    }
    Ok(())
}
