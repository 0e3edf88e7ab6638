use crate::error::AppError;
use crate::services::LabelDetector;
use async_trait::async_trait;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::{Image, S3Object};
use aws_sdk_rekognition::Client;

pub struct RekognitionLabelDetector {
    client: Client,
}

impl RekognitionLabelDetector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LabelDetector for RekognitionLabelDetector {
    async fn detect_labels(
        &self,
        bucket: &str,
        key: &str,
        max_labels: i32,
    ) -> Result<Vec<String>, AppError> {
        let image = Image::builder()
            .s3_object(S3Object::builder().bucket(bucket).name(key).build())
            .build();

        let output = self
            .client
            .detect_labels()
            .image(image)
            .max_labels(max_labels)
            .send()
            .await
            .map_err(|e| AppError::Labeling(DisplayErrorContext(&e).to_string()))?;

        Ok(output
            .labels()
            .iter()
            .filter_map(|label| label.name().map(String::from))
            .collect())
    }
}
