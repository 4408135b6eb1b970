pub mod document;
pub mod movie;
pub mod user;

pub use crate::types::identifiers::{MovieId, UserId};
pub use document::{Document, DocumentError, DEFAULT_USER_NAME};
pub use movie::{Movie, MovieError, MoviePatch};
pub use user::{User, UserSummary};
