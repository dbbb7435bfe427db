use anyhow::Result;
use clap::Parser;

use backend_infrastructure::{AppConfig, CONFIG_ENV_VAR};

#[derive(Parser, Debug)]
#[command(name = "caseforge-backend")]
#[command(about = "Caseforge case-opening backend", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(config) = args.config {
        std::env::set_var(CONFIG_ENV_VAR, config);
    }

    let config = AppConfig::load().await?;
    let _guard = backend_bootstrap::init_tracing(config.log_dir.as_deref());

    backend_bootstrap::run_standalone(config).await
}
