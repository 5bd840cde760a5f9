use std::sync::Arc;

use image::{DynamicImage, ImageFormat};
use sha2::{Digest, Sha256};

use super::{CaptionError, CaptionModel, CaptionStyle, hashtags};

/// Result of one caption generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCaption {
    pub caption: String,
    pub hashtags: String,
    /// Top model candidate the caption was rendered from.
    pub description: String,
}

#[derive(Clone)]
pub struct CaptionService {
    model: Arc<dyn CaptionModel>,
}

impl CaptionService {
    pub fn new(model: Arc<dyn CaptionModel>) -> Self {
        Self { model }
    }

    /// Ask the model once and render its top candidate in `style`.
    pub async fn generate(
        &self,
        image: &DynamicImage,
        style: CaptionStyle,
    ) -> Result<GeneratedCaption, CaptionError> {
        let description = self
            .model
            .describe(image)
            .await?
            .into_iter()
            .next()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(CaptionError::Empty)?;

        Ok(GeneratedCaption {
            caption: style.render(&description),
            hashtags: hashtags(&description),
            description,
        })
    }
}

/// Decode an uploaded photo. Only JPEG and PNG are accepted.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, CaptionError> {
    let format = image::guess_format(bytes)
        .map_err(|_| CaptionError::UnsupportedImage("Unrecognized image format".into()))?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(CaptionError::UnsupportedImage(
            "Only JPG and PNG images are supported".into(),
        ));
    }
    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| CaptionError::UnsupportedImage(format!("Could not decode image: {e}")))
}

/// Content hash recorded alongside each caption.
pub fn image_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
