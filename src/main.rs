use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wilayah_core::core::config::Config;
use wilayah_core::core::database;
use wilayah_core::features::regions::RegionService;

fn main() -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!("Configuration loaded successfully");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.app.worker_threads)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> anyhow::Result<()> {
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    database::ensure_schema(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Schema setup failed: {}", e))?;

    let region_service = RegionService::with_pool(pool.clone());
    tracing::info!(
        "Region service initialized ({} store)",
        region_service.store_name()
    );

    let counts = region_service.count_regions().await?;
    tracing::info!(
        "Region hierarchy: provinces={}, regencies={}, districts={}, villages={}",
        counts.provinces,
        counts.regencies,
        counts.districts,
        counts.villages
    );

    pool.close().await;
    Ok(())
}
