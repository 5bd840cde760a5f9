use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use image::{DynamicImage, ImageOutputFormat};
use reqwest::{Client, header};
use serde::Deserialize;
use tracing::instrument;

use super::CaptionError;
use crate::config::CaptionConfig;

/// A pre-trained image-to-text model.
#[async_trait]
pub trait CaptionModel: Send + Sync {
    /// Describe the image. Candidates are ranked best first.
    async fn describe(&self, image: &DynamicImage) -> Result<Vec<String>, CaptionError>;
}

/// Client for a hosted inference endpoint that accepts raw image bytes and
/// answers `[{"generated_text": "..."}]`.
pub struct HttpCaptionModel {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

#[derive(Deserialize)]
struct Candidate {
    generated_text: String,
}

impl HttpCaptionModel {
    pub fn new(config: &CaptionConfig) -> Result<Self, CaptionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl CaptionModel for HttpCaptionModel {
    #[instrument(skip(self, image), fields(endpoint = %self.endpoint))]
    async fn describe(&self, image: &DynamicImage) -> Result<Vec<String>, CaptionError> {
        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageOutputFormat::Png)?;

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "image/png")
            .body(png.into_inner());
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let candidates: Vec<Candidate> = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(candidates.into_iter().map(|c| c.generated_text).collect())
    }
}
