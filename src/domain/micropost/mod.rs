//! Micropost domain
//!
//! Posts authored by users. A user owns its posts; deleting the user deletes them.

mod entity;
mod repository;
mod validation;

pub use entity::{Micropost, MicropostId, NewMicropost};
pub use repository::MicropostRepository;
pub use validation::{validate_content, MicropostValidationError, MAX_CONTENT_LENGTH};
