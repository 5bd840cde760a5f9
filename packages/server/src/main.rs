use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use caption_server::ads::{AdRewardService, run_playback_sweeper};
use caption_server::caption::{CaptionService, HttpCaptionModel};
use caption_server::config::AppConfig;
use caption_server::state::AppState;
use caption_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    if config.admin.uses_default_password() {
        warn!("Admin password is the default placeholder; set ADMIN_PASSWORD before deploying");
    }

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to open database")?;
    seed::ensure_indexes(&db).await?;
    if config.ads.seed_default_platform {
        seed::seed_default_platform(&db).await?;
    }

    let model = HttpCaptionModel::new(&config.caption).context("Failed to build caption client")?;
    let ads = AdRewardService::new(&config.ads);
    tokio::spawn(run_playback_sweeper(
        ads.registry().clone(),
        config.ads.clone(),
    ));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        db,
        config: Arc::new(config),
        captions: CaptionService::new(Arc::new(model)),
        ads,
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("InstaCaption listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
