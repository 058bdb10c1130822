use crate::errors::Result;
use crate::users::users_model::{NewUser, NewUserRecord, PasswordChange, User, UserCredentials};
use async_trait::async_trait;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_user(&self, user_id: &str) -> Result<User>;
    /// Credentials of the user with this id.
    fn get_credentials(&self, user_id: &str) -> Result<UserCredentials>;
    /// Looks a user up by username, or by email when the identifier contains `@`.
    fn find_credentials(&self, identifier: &str) -> Result<Option<UserCredentials>>;
    /// Inserts the user, failing with `DuplicateUsername`/`DuplicateEmail`
    /// when either is already taken.
    async fn insert_user(&self, new_user: NewUserRecord) -> Result<User>;
    async fn update_password_hash(&self, user_id: String, password_hash: String) -> Result<()>;
    async fn delete_user(&self, user_id: String) -> Result<usize>;
}

/// Trait for user service operations
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User>;
    fn authenticate(&self, identifier: &str, password: &str) -> Result<User>;
    fn get_user(&self, user_id: &str) -> Result<User>;
    async fn change_password(&self, user_id: &str, change: PasswordChange) -> Result<()>;
    async fn delete_account(&self, user_id: &str, password: &str) -> Result<()>;
}
