//! Companion directory: filtered reads and authenticated writes against the store
//!
//! Operations:
//! - create / list / get companions
//! - record and query session history
//! - creation quota check against the caller's entitlement tier

mod error;
mod identity;
mod quota;
mod service;

pub use error::{DirectoryError, DirectoryResult};
pub use identity::{Caller, Entitlement};
pub use quota::{QuotaPolicy, QuotaTier};
pub use service::{CompanionFilter, DirectoryService, DEFAULT_PAGE_SIZE};
