pub mod jwt;
pub mod secret;
