//! Image upload service

use conv_core::Snowflake;
use tracing::{info, instrument};

use crate::dto::UploadResponse;
use crate::integrations::UploadKind;

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct UploadService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UploadService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store an image under `kind` and return its public path
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(
        &self,
        user_id: Snowflake,
        kind: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> ServiceResult<UploadResponse> {
        let kind: UploadKind = kind.parse()?;
        let stored = self.ctx.storage().store(kind, content_type, bytes).await?;

        info!(user_id = %user_id, path = %stored.public_path, "Image uploaded");

        Ok(UploadResponse {
            kind: stored.kind.as_str(),
            path: stored.public_path,
            size: stored.size,
        })
    }
}
