use serde::{Deserialize, Serialize};

/// Request body for admin login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AdminLoginRequest {
    /// The shared admin password.
    #[schema(example = "admin123")]
    pub password: String,
}

/// Successful admin login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct AdminLoginResponse {
    /// Bearer token for the admin routes.
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Expiry as a Unix timestamp.
    pub expires_at: i64,
}

/// Users registered on one day.
#[derive(Serialize, utoipa::ToSchema, Debug, PartialEq, Eq)]
pub struct DailyUsers {
    #[schema(example = "2024-05-01")]
    pub date: String,
    #[schema(example = 12)]
    pub new_users: u64,
}

/// Ad views and projected revenue for one platform.
#[derive(Serialize, utoipa::ToSchema, Debug, PartialEq)]
pub struct PlatformRevenue {
    #[schema(example = "Unity Ads")]
    pub platform_name: String,
    #[schema(example = 40)]
    pub ad_count: i64,
    /// Dollars, from the platform catalog rate.
    #[schema(example = 1.6)]
    pub revenue: f64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AnalyticsResponse {
    pub total_users: u64,
    /// Users active within the last 24 hours.
    pub active_today: u64,
    pub total_ads_watched: i64,
    pub total_captions: u64,
    pub user_growth: Vec<DailyUsers>,
    pub ad_revenue: Vec<PlatformRevenue>,
}
