//! Client for the external image-segmentation inference service.
//!
//! The model itself is an opaque pretrained artifact hosted elsewhere; this
//! side only ships the image over and hands the overlay back to the UI.

use base64::Engine;
use serde::{Deserialize, Serialize};

use super::{map_reqwest_error, ServiceError};

/// What the inference service returns: an overlay image ready for an
/// `<img>` tag plus the affected-area percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationResult {
    pub image_data_uri: String,
    pub affected_percentage: f64,
}

#[derive(Serialize)]
struct SegmentRequest<'a> {
    image: String,
    model: Option<&'a str>,
}

pub struct SegmentationClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl SegmentationClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Run one segmentation request. Single attempt; errors surface to the
    /// caller unchanged.
    pub async fn segment(
        &self,
        image_bytes: &[u8],
        model: Option<&str>,
    ) -> Result<SegmentationResult, ServiceError> {
        let url = format!("{}/segment", self.base_url);
        let body = SegmentRequest {
            image: base64::engine::general_purpose::STANDARD.encode(image_bytes),
            model,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, &self.base_url, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<SegmentationResult>()
            .await
            .map_err(|e| ServiceError::ResponseParsing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_trims_trailing_slash() {
        let client = SegmentationClient::new("http://localhost:8500/", 60);
        assert_eq!(client.base_url, "http://localhost:8500");
        assert_eq!(client.timeout_secs, 60);
    }

    #[test]
    fn result_deserializes_from_service_shape() {
        let json = r#"{"image_data_uri": "data:image/png;base64,AAAA", "affected_percentage": 7.42}"#;
        let result: SegmentationResult = serde_json::from_str(json).unwrap();
        assert!(result.image_data_uri.starts_with("data:image/png"));
        assert!((result.affected_percentage - 7.42).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unreachable_service_maps_to_connection_error() {
        // Port 1 is never listening; the connect error must map cleanly.
        let client = SegmentationClient::new("http://127.0.0.1:1", 2);
        let err = client.segment(b"fake image", None).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Connection(_) | ServiceError::Http(_) | ServiceError::Timeout(_)
        ));
    }
}
