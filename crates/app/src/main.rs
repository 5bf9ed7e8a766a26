use std::sync::Arc;

use engine::{Engine, MemoryStore};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bigd={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    if let Some(server) = settings.server {
        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            let engine = match build_engine(&server.database).await {
                Ok(engine) => engine,
                Err(err) => {
                    tracing::error!("failed to initialize the store: {err}");
                    return;
                }
            };

            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, server.port);
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(engine, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    } else {
        tracing::warn!("no [server] section in settings, nothing to run");
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn build_engine(
    config: &Database,
) -> Result<Engine, Box<dyn std::error::Error + Send + Sync>> {
    let engine = match config {
        Database::Memory => {
            Engine::builder()
                .store(Arc::new(MemoryStore::new()))
                .build()
                .await?
        }
        Database::Sqlite(path) => {
            let url = format!("sqlite:{}?mode=rwc", path);
            let database = sea_orm::Database::connect(url).await?;
            Migrator::up(&database, None).await?;
            Engine::builder().database(database).build().await?
        }
    };
    Ok(engine)
}
