pub mod content_service;
pub mod profile_service;
pub mod session_service;

pub use content_service::{ContentItem, ContentKind, ContentService};
pub use profile_service::ProfileService;
pub use session_service::SessionService;
