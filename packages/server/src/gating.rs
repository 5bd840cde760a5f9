//! Every third caption is locked behind ads.

use serde::Serialize;

use crate::config::CreditMode;
use crate::entity::{ad_platform, user};

/// A gate opens on every caption whose 0-based index is a multiple of this.
pub const GATE_EVERY: i32 = 3;

/// Ads required when no platform is active.
pub const DEFAULT_ADS_REQUIRED: i32 = 1;

/// Whether the caption after `caption_count` earlier ones is gated.
/// The very first caption never is.
pub fn is_gated(caption_count: i32) -> bool {
    caption_count > 0 && caption_count % GATE_EVERY == 0
}

/// Gate state for a user's next caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct GateStatus {
    /// Whether the next caption falls on a gate.
    pub gated: bool,
    /// Ads the current platform requires per gate.
    #[schema(example = 1)]
    pub ads_required: i32,
    /// Ads credited toward the gate.
    #[schema(example = 0)]
    pub ads_watched: i32,
    /// Whether the next caption may be generated now.
    pub unlocked: bool,
    /// No platform is active; `ads_required` is the fallback value.
    pub no_active_platform: bool,
}

pub fn evaluate(
    user: &user::Model,
    platform: Option<&ad_platform::Model>,
    mode: CreditMode,
) -> GateStatus {
    let gated = is_gated(user.caption_count);
    let ads_required = platform.map_or(DEFAULT_ADS_REQUIRED, |p| p.ads_per_use);
    let ads_watched = match mode {
        CreditMode::PerCycle => user.ad_credit,
        CreditMode::Cumulative => user.ad_watched,
    };

    GateStatus {
        gated,
        ads_required,
        ads_watched,
        unlocked: !gated || ads_watched >= ads_required,
        no_active_platform: platform.is_none(),
    }
}
