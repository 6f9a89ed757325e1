use bioxai::app::commands;
use bioxai::core::ConfigProvider;
use bioxai::utils::logger;
use bioxai::{AppSettings, CliConfig};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // Merge the config file with command line flags
    let settings = match AppSettings::load(cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    };

    // Logging
    let log_settings = settings.log_settings();
    match logger::init_cli_logger(&log_settings) {
        Ok(Some(path)) => tracing::info!("📝 Writing logs to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("⚠️ File logging disabled: {}", e);
            let console_only = logger::LogSettings {
                file_logging: false,
                ..log_settings
            };
            let _ = logger::init_cli_logger(&console_only);
        }
    }

    tracing::debug!("CLI settings: {:?}", settings);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = commands::run(&settings, &mut out).await {
        tracing::error!("❌ Command failed: {} (Severity: {:?})", e, e.severity());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}
