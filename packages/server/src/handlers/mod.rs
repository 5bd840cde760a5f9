pub mod ad;
pub mod admin;
pub mod caption;
pub mod device;
pub mod navigation;
