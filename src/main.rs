use audiograb::{Config, JobManager, run_with_shutdown};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional; real environment variables win
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "audiograb=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "audiograb exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> audiograb::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting audiograb...");

    let mut config = match std::env::var("AUDIOGRAB_CONFIG") {
        Ok(path) => {
            tracing::info!(path = %path, "Loading configuration file");
            Config::from_json_file(Path::new(&path))?
        }
        Err(_) => Config::default(),
    };
    config.apply_env_overrides(|key| std::env::var(key).ok())?;

    tracing::info!(
        bind_address = %config.server.api.bind_address,
        temp_dir = %config.temp_dir().display(),
        proxy = config.retrieval.proxy_url.is_some(),
        "Configuration loaded"
    );

    let manager = JobManager::new(config).await?;
    run_with_shutdown(manager).await
}
