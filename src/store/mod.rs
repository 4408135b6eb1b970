pub mod error;
pub mod persistence;
pub mod store;

pub use error::{Result, StoreError};
pub use persistence::JsonFile;
pub use store::MovieStore;
