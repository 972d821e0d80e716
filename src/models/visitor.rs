//! Known-visitor enrollment payloads.

use serde::{Deserialize, Serialize};

/// A local image queued for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: String,
    pub path: std::path::PathBuf,
}

/// Response body for `POST /upload/upload-image`.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub url: String,
}

/// Request body for `POST /api/visitors/create`.
#[derive(Debug, Serialize)]
pub struct CreateVisitorRequest<'a> {
    pub name: &'a str,
    pub profile_image_url: &'a str,
}
