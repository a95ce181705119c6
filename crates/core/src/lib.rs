//! cliento-core: Shared domain types for the practice-management API
//!
//! Entities and their write payloads, explicit payload validation, and the
//! response bodies used by the HTTP server.

pub mod capability;
pub mod error;
pub mod models;
pub mod outcome;
pub mod validate;

pub use capability::{ApiResource, ApiRoot};
pub use error::FieldErrors;
pub use models::*;
pub use outcome::{ErrorBody, MessageBody};
pub use validate::{Validate, parse_payload};
