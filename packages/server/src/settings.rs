//! Business settings kept in a flat JSON file, replaced wholesale on save.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{0}")]
    Invalid(String),
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Monetization strategy shown on the admin settings panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BusinessSettings {
    /// Ads a free-tier user watches per gate.
    #[schema(example = 1)]
    pub free_tier_ads: u8,
    /// Premium subscription price in dollars.
    #[schema(example = 4.99)]
    pub premium_price: f64,
    #[schema(example = "✅ No ads\n✅ Priority processing")]
    pub premium_benefits: String,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            free_tier_ads: 1,
            premium_price: 4.99,
            premium_benefits: "✅ No ads\n✅ Priority processing\n✅ Advanced styles".into(),
        }
    }
}

impl BusinessSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.free_tier_ads > 5 {
            return Err(SettingsError::Invalid(
                "Free tier ads must be between 0 and 5".into(),
            ));
        }
        if !(0.99..=99.99).contains(&self.premium_price) {
            return Err(SettingsError::Invalid(
                "Premium price must be between 0.99 and 99.99".into(),
            ));
        }
        Ok(())
    }
}

/// Read the settings file, or the defaults if it does not exist yet.
pub async fn load(path: &Path) -> Result<BusinessSettings, SettingsError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BusinessSettings::default()),
        Err(e) => Err(e.into()),
    }
}

/// Replace the settings file with exactly `settings`.
pub async fn save(path: &Path, settings: &BusinessSettings) -> Result<(), SettingsError> {
    settings.validate()?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }

    let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
    fs::write(&tmp, serde_json::to_vec_pretty(settings)?).await?;
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}
