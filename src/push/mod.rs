pub mod client;
pub mod error;
pub mod payload;

pub use client::PushClient;
pub use client::PushSender;
pub use payload::NavigationData;
pub use payload::NotificationPayload;
pub use payload::SavedSearchRef;
