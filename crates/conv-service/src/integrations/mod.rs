//! Outbound integrations: ticketing provider, push relay and upload storage
//!
//! Each integration sits behind a trait object held by the `ServiceContext`
//! so that services never talk to reqwest or the filesystem directly.

pub mod helloasso;
pub mod push;
pub mod storage;

pub use helloasso::{
    HelloAssoClient, ProviderItem, ProviderOrder, ProviderSnapshot, ProviderTier,
    TicketingProviderClient,
};
pub use push::{
    push_gateway_from_config, DisabledPushGateway, PushGateway, PushOutcome, PushPayload,
    RelayPushGateway,
};
pub use storage::{ImageType, StoredFile, UploadKind, UploadStorage};
