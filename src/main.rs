use migration::{Migrator, MigratorTrait};
use reviewer_backend::{
    config::Config,
    store::{MemoryStore, PgStore},
    State,
};
use std::process::ExitCode;
use tokio::net::TcpListener;
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(fmt::layer().with_line_number(true).with_filter(env_filter))
        .init();

    reviewer_backend::panic::set_hook();

    if let Err(error) = run().await {
        error!("{:#}", error);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let listener = TcpListener::bind(config.listen_addr).await?;

    match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await?;

            if config.run_migrations {
                info!("running migrations");
                Migrator::up(store.db(), None).await?;
            }

            reviewer_backend::run(listener, State::with_store(store), config.request_timeout).await
        }
        None => {
            warn!("DATABASE_URL is not set, using the in-memory store");

            let store = MemoryStore::new();

            reviewer_backend::run(listener, State::with_store(store), config.request_timeout).await
        }
    }
}
