use anyhow::Context;
use correio::{config::Config, serve};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config_path = Config::path();
    let config = Config::load(&config_path)?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(config.server.log_level.to_lowercase()))
                .context("log_level is not a valid filter")?,
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    config.storage.ensure_dirs()?;
    tracing::info!(
        config = %config_path.display(),
        data_dir = %config.storage.data_dir.display(),
        "starting correio"
    );

    let app = correio::app(&config);
    serve::run(app, &config.server).await
}
