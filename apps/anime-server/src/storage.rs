use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use animes::domain::repo::AnimesRepository;
use animes::infra::storage::{entity, InMemoryAnimesRepository, SeaOrmAnimesRepository};
use anyhow::{Context, Result};
use runtime::{StorageConfig, StorageKind};
use sea_orm::{ConnectOptions, Database};

/// Open the repository selected by `storage.kind`.
pub async fn open_repository(
    cfg: &StorageConfig,
    base_dir: &Path,
) -> Result<Arc<dyn AnimesRepository>> {
    match cfg.kind {
        StorageKind::Memory => {
            tracing::info!("Using in-memory anime storage");
            Ok(Arc::new(InMemoryAnimesRepository::new()))
        }
        StorageKind::Sqlite => {
            let dsn = cfg.resolved_url(base_dir, true)?;

            let mut opts = ConnectOptions::new(dsn.clone());
            opts.acquire_timeout(Duration::from_secs(5))
                .sqlx_logging(false);
            if let Some(max) = cfg.max_conns {
                opts.max_connections(max);
            }
            if dsn == "sqlite::memory:" {
                // Every pooled connection would otherwise see its own empty database.
                opts.max_connections(1);
            }

            tracing::info!("Connecting to database: {}", dsn);
            let conn = Database::connect(opts)
                .await
                .with_context(|| format!("cannot open database {dsn}"))?;
            entity::create_table(&conn)
                .await
                .context("cannot create anime table")?;

            Ok(Arc::new(SeaOrmAnimesRepository::new(conn)))
        }
    }
}
