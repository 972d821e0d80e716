//! Enrollment endpoints, authenticated with the API key instead of a session.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::{ApiClient, API_KEY_HEADER};
use crate::errors::ClientError;
use crate::models::{CreateVisitorRequest, UploadResponse};

impl ApiClient {
    /// POST /upload/upload-image as multipart with a single `file` field.
    pub async fn upload_image(&self, path: &Path) -> Result<UploadResponse, ClientError> {
        let api_key = self.api_key()?;
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("photo.jpg")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(path))?;
        let request = self
            .http
            .post(self.url("/upload/upload-image"))
            .header(API_KEY_HEADER, api_key)
            .multipart(Form::new().part("file", part));
        self.send(request).await
    }

    /// POST /api/visitors/create
    pub async fn create_visitor(&self, name: &str, profile_image_url: &str) -> Result<(), ClientError> {
        let api_key = self.api_key()?;
        let request = self
            .http
            .post(self.url("/api/visitors/create"))
            .header(API_KEY_HEADER, api_key)
            .json(&CreateVisitorRequest {
                name,
                profile_image_url,
            });
        let _: Value = self.send(request).await?;
        Ok(())
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_extensions() {
        assert_eq!(mime_for(Path::new("a/b.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("face.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("noext")), "image/jpeg");
    }

    #[tokio::test]
    async fn test_unreadable_photo_is_io_error() {
        let client = ApiClient::new("http://127.0.0.1:9", Some("key".to_string())).unwrap();
        let err = client
            .upload_image(Path::new("/definitely/not/here.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
