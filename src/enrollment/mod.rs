//! Visitor enrollment: teach the lock a known face.
//!
//! Photos are uploaded one by one, then a visitor record is created with the
//! name and the first uploaded image as profile picture.

use std::path::PathBuf;

use crate::errors::ClientError;
use crate::models::Photo;
use crate::AppContext;

/// Result of a successful enrollment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrolled {
    pub name: String,
    pub photo_urls: Vec<String>,
}

impl Enrolled {
    pub fn message(&self) -> String {
        format!(
            "Successfully memorized {} with {} photo(s).",
            self.name,
            self.photo_urls.len()
        )
    }
}

/// The enrollment form. Submitting takes it mutably, so one form cannot be
/// submitted twice at once.
pub struct Enrollment {
    ctx: AppContext,
    name: String,
    photos: Vec<Photo>,
}

impl Enrollment {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            name: String::new(),
            photos: Vec::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Queue a local image. The file must exist.
    pub fn add_photo(&mut self, path: impl Into<PathBuf>) -> Result<Photo, ClientError> {
        let path = path.into();
        if !path.is_file() {
            return Err(ClientError::Validation(format!(
                "Photo not found: {}",
                path.display()
            )));
        }
        let photo = Photo {
            id: uuid::Uuid::new_v4().to_string(),
            path,
        };
        self.photos.push(photo.clone());
        Ok(photo)
    }

    pub fn remove_photo(&mut self, id: &str) -> bool {
        let before = self.photos.len();
        self.photos.retain(|photo| photo.id != id);
        self.photos.len() != before
    }

    /// Upload every photo and create the visitor. Clears the form on success.
    pub async fn submit(&mut self) -> Result<Enrolled, ClientError> {
        let name = self.name.trim().to_string();
        if self.photos.is_empty() || name.is_empty() {
            return Err(ClientError::Validation(
                "Please add at least one photo and enter a name".to_string(),
            ));
        }

        let mut photo_urls = Vec::with_capacity(self.photos.len());
        for photo in &self.photos {
            let uploaded = self.ctx.api.upload_image(&photo.path).await?;
            tracing::debug!("Uploaded {} as {}", photo.path.display(), uploaded.url);
            photo_urls.push(uploaded.url);
        }

        let profile_image_url = photo_urls
            .first()
            .ok_or_else(|| ClientError::Api("Upload returned no image URL".to_string()))?;
        self.ctx.api.create_visitor(&name, profile_image_url).await?;
        tracing::info!("Enrolled visitor {} with {} photo(s)", name, photo_urls.len());

        self.name.clear();
        self.photos.clear();
        Ok(Enrolled { name, photo_urls })
    }
}
