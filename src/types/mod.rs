pub mod identifiers;

pub use identifiers::{IdentifierError, MovieId, UserId, UserRef};
