use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::ads::AdRewardService;
use crate::caption::CaptionService;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub captions: CaptionService,
    pub ads: AdRewardService,
}
