//! SQLite storage implementation for the credential store.

mod model;
mod repository;

pub use model::{NewUserDB, UserDB};
pub use repository::UserRepository;
