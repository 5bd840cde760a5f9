use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_range;
use crate::ads::catalog;
use crate::entity::ad_platform;
use crate::error::AppError;
use crate::utils::secret::mask;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreatePlatformRequest {
    /// Must be a catalog platform name.
    #[schema(example = "Unity Ads")]
    pub platform_name: String,
    #[schema(example = "pk_live_abcd1234")]
    pub api_key: String,
    /// 1 is highest.
    #[schema(example = 3)]
    pub priority: i32,
    #[schema(example = 1)]
    pub ads_per_use: i32,
    #[schema(example = 3)]
    pub min_coins: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

pub fn validate_create_platform(payload: &CreatePlatformRequest) -> Result<(), AppError> {
    if catalog::lookup(&payload.platform_name).is_none() {
        let names: Vec<&str> = catalog::CATALOG.iter().map(|e| e.name).collect();
        return Err(AppError::Validation(format!(
            "Platform must be one of: {}",
            names.join(", ")
        )));
    }
    validate_settings(payload.priority, payload.ads_per_use, payload.min_coins)
}

/// One row of the bulk platform editor.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct PlatformEdit {
    pub id: i32,
    pub priority: i32,
    pub is_active: bool,
    pub ads_per_use: i32,
    pub min_coins: i32,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct BulkUpdatePlatformsRequest {
    pub platforms: Vec<PlatformEdit>,
}

/// Maximum rows accepted by one bulk edit.
pub const MAX_BULK_EDIT: usize = 100;

pub fn validate_bulk_update(payload: &BulkUpdatePlatformsRequest) -> Result<(), AppError> {
    if payload.platforms.is_empty() {
        return Err(AppError::Validation("Platforms must not be empty".into()));
    }
    if payload.platforms.len() > MAX_BULK_EDIT {
        return Err(AppError::Validation(format!(
            "Too many platforms: max {MAX_BULK_EDIT}"
        )));
    }
    let mut seen = std::collections::HashSet::new();
    for edit in &payload.platforms {
        if !seen.insert(edit.id) {
            return Err(AppError::Validation(format!(
                "Duplicate platform ID: {}",
                edit.id
            )));
        }
        validate_settings(edit.priority, edit.ads_per_use, edit.min_coins)?;
    }
    Ok(())
}

fn validate_settings(priority: i32, ads_per_use: i32, min_coins: i32) -> Result<(), AppError> {
    validate_range(priority, 1..=5, "Priority")?;
    validate_range(ads_per_use, 0..=5, "Ads per use")?;
    validate_range(min_coins, 1..=10, "Coins per ad")
}

/// An ad platform configuration. The API key is masked.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PlatformResponse {
    pub id: i32,
    #[schema(example = "Unity Ads")]
    pub platform_name: String,
    #[schema(example = "************1234")]
    pub api_key: String,
    pub priority: i32,
    pub is_active: bool,
    pub ads_per_use: i32,
    pub min_coins: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ad_platform::Model> for PlatformResponse {
    fn from(m: ad_platform::Model) -> Self {
        Self {
            id: m.id,
            platform_name: m.platform_name,
            api_key: mask(&m.api_key),
            priority: m.priority,
            is_active: m.is_active,
            ads_per_use: m.ads_per_use,
            min_coins: m.min_coins,
            created_at: m.created_at,
        }
    }
}
