//! Users module - credential store models, password hashing, services, and traits.

mod password;
mod users_model;
mod users_service;
mod users_traits;

pub use password::{hash_password, verify_password};
pub use users_model::{NewUser, NewUserRecord, PasswordChange, User, UserCredentials};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
