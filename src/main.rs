use std::process::ExitCode;

use clap::Parser;
use cppcheck_lint::cli::{self, Cli, Commands};
use cppcheck_lint::config::{AppConfig, LintConfig, LogFormat, DEFAULT_SETTINGS_FILE};
use cppcheck_lint::services::output::{ConsoleOutput, UserOutput};
use cppcheck_lint::LintContext;
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut app = AppConfig::from_env()?;
    if let Some(workspace) = cli.workspace {
        if cli.settings.is_none() && std::env::var_os("CPPCHECK_SETTINGS").is_none() {
            app.settings_path = workspace.join(DEFAULT_SETTINGS_FILE);
        }
        app.workspace_root = workspace;
    }
    if let Some(settings) = cli.settings {
        app.settings_path = settings;
    }
    if app.workspace_root.is_relative() {
        app.workspace_root = std::env::current_dir()?.join(&app.workspace_root);
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "cppcheck_lint=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match app.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    let mut config = LintConfig::load(&app.settings_path)?;
    tracing::info!(
        workspace = %app.workspace_root.display(),
        settings = %app.settings_path.display(),
        enabled = config.enable,
        "Loaded settings"
    );

    let console = ConsoleOutput;
    if !matches!(cli.cmd, Commands::Validate) {
        for issue in config.validate() {
            console.show_error(&format!("Cppcheck: {}", issue.message));
        }
    }
    if config.enable && !config.locate_analyzer() {
        console.show_info("Cppcheck: Could not find cppcheck executable");
    }

    let mut ctx = LintContext::console(config, app.workspace_root);
    let code = cli::run(cli.cmd, &mut ctx).await?;
    Ok(code)
}
