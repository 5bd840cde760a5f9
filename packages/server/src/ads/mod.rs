//! Simulated rewarded ads.
//!
//! A playback moves `Idle -> Playing(deadline) -> Finished`; the reward is
//! credited when a finished playback is completed, atomically with its
//! [`ad_event`](crate::entity::ad_event) row.

pub mod catalog;
mod playback;
mod service;

pub use playback::{Playback, PlaybackRegistry, PlaybackState};
pub use service::{AdRewardService, Reward, active_platforms, current_platform, run_playback_sweeper};
