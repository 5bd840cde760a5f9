//! Caption generation: one model call, then pure formatting.

mod hashtag;
mod model;
mod service;
mod style;

pub use hashtag::{FIXED_TAGS, MAX_DERIVED_TAGS, hashtags};
pub use model::{CaptionModel, HttpCaptionModel};
pub use service::{CaptionService, GeneratedCaption, decode_image, image_hash};
pub use style::CaptionStyle;

#[derive(Debug, thiserror::Error)]
pub enum CaptionError {
    #[error("{0}")]
    UnsupportedImage(String),
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("model returned no caption")]
    Empty,
}
