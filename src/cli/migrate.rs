use anyhow::Result;

use crate::config::Config;

#[tracing::instrument(skip(config))]
pub async fn migrate(config: Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    crate::db::migrate(&pool).await?;
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn reset(config: Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if crate::db::drop_database(&config.database.url)? {
        tracing::warn!("Dropped existing database: {}", config.database.url);
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}
