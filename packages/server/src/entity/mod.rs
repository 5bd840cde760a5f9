pub mod ad_event;
pub mod ad_platform;
pub mod caption;
pub mod user;
