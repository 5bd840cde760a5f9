use serde::Serialize;

/// Per-ad revenue assumed for platforms missing from [`CATALOG`].
pub const DEFAULT_MIN_REWARD: f64 = 0.02;

/// An ad network the dashboard knows how to configure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct CatalogEntry {
    #[schema(example = "Unity Ads")]
    pub name: &'static str,
    #[schema(example = "rewarded")]
    pub ad_format: &'static str,
    /// Projected revenue per ad view, in dollars.
    #[schema(example = 0.04)]
    pub min_reward: f64,
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "start.io",
        ad_format: "banner",
        min_reward: 0.02,
    },
    CatalogEntry {
        name: "Google AdMob",
        ad_format: "interstitial",
        min_reward: 0.03,
    },
    CatalogEntry {
        name: "Unity Ads",
        ad_format: "rewarded",
        min_reward: 0.04,
    },
    CatalogEntry {
        name: "AppLovin",
        ad_format: "offerwall",
        min_reward: 0.035,
    },
];

pub fn lookup(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.name == name)
}

/// Projected revenue for `ad_count` views on the named platform.
pub fn projected_revenue(name: &str, ad_count: i64) -> f64 {
    let per_ad = lookup(name).map_or(DEFAULT_MIN_REWARD, |entry| entry.min_reward);
    ad_count as f64 * per_ad
}
