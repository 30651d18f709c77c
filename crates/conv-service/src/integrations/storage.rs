//! Local disk storage for uploaded images
//!
//! Files land in `<upload_dir>/<kind>/<uuid>.<ext>` and are served back under
//! `/uploads/<kind>/<file>`.

use std::path::PathBuf;
use std::str::FromStr;

use conv_common::StorageConfig;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::services::{ServiceError, ServiceResult};

/// Public URL prefix the upload directory is mounted on
pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadKind {
    ConventionLogo,
    EditionImage,
    Avatar,
}

impl UploadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConventionLogo => "convention-logo",
            Self::EditionImage => "edition-image",
            Self::Avatar => "avatar",
        }
    }
}

impl FromStr for UploadKind {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "convention-logo" => Ok(Self::ConventionLogo),
            "edition-image" => Ok(Self::EditionImage),
            "avatar" => Ok(Self::Avatar),
            other => Err(ServiceError::validation(format!("Unknown upload kind '{other}'"))),
        }
    }
}

/// Accepted image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Png,
    Jpeg,
    Webp,
    Gif,
}

impl ImageType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            "image/gif" => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub kind: UploadKind,
    pub file_name: String,
    pub public_path: String,
    pub size: usize,
}

#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.upload_dir, config.max_file_size_bytes())
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check type and size before anything touches the disk
    pub fn check(&self, content_type: &str, size: usize) -> ServiceResult<ImageType> {
        let image = ImageType::from_mime(content_type).ok_or_else(|| {
            ServiceError::validation(format!("Unsupported file type '{content_type}'"))
        })?;
        if size == 0 {
            return Err(ServiceError::validation("File is empty"));
        }
        if size > self.max_bytes {
            return Err(ServiceError::validation(format!(
                "File exceeds the {} byte limit",
                self.max_bytes
            )));
        }
        Ok(image)
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn store(
        &self,
        kind: UploadKind,
        content_type: &str,
        bytes: &[u8],
    ) -> ServiceResult<StoredFile> {
        let image = self.check(content_type, bytes.len())?;

        let dir = self.root.join(kind.as_str());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::internal(format!("Cannot create upload dir: {e}")))?;

        let file_name = format!("{}.{}", Uuid::new_v4(), image.extension());
        tokio::fs::write(dir.join(&file_name), bytes)
            .await
            .map_err(|e| ServiceError::internal(format!("Cannot write upload: {e}")))?;

        info!(kind = kind.as_str(), file = %file_name, "Upload stored");

        Ok(StoredFile {
            kind,
            public_path: format!("{PUBLIC_PREFIX}/{}/{file_name}", kind.as_str()),
            file_name,
            size: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("avatar".parse::<UploadKind>().unwrap(), UploadKind::Avatar);
        assert_eq!(
            "convention-logo".parse::<UploadKind>().unwrap().as_str(),
            "convention-logo",
        );
        assert!("../etc".parse::<UploadKind>().is_err());
    }

    #[test]
    fn test_check() {
        let storage = UploadStorage::new("/tmp/unused", 10);
        assert_eq!(storage.check("image/PNG", 5).unwrap(), ImageType::Png);
        assert!(storage.check("application/pdf", 5).is_err());
        assert!(storage.check("image/png", 0).is_err());
        assert!(storage.check("image/png", 11).is_err());
    }

    #[tokio::test]
    async fn test_store_writes_under_kind_dir() {
        let root = std::env::temp_dir().join(format!("conv-uploads-{}", Uuid::new_v4()));
        let storage = UploadStorage::new(&root, 1024);

        let stored = storage
            .store(UploadKind::EditionImage, "image/webp", b"RIFF....WEBP")
            .await
            .unwrap();

        assert!(stored.public_path.starts_with("/uploads/edition-image/"));
        assert!(stored.file_name.ends_with(".webp"));
        let on_disk = tokio::fs::read(root.join("edition-image").join(&stored.file_name))
            .await
            .unwrap();
        assert_eq!(on_disk.len(), stored.size);

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
