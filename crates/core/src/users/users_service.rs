use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use super::password::{hash_password, verify_dummy, verify_password};
use super::users_model::{NewUser, NewUserRecord, PasswordChange, User, UserCredentials};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::constants::{
    EMAIL_MAX_LENGTH, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH,
};
use crate::errors::{Error, Result, ValidationError};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex pattern");
}

pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        UserService { repository }
    }

    fn validate_registration(new_user: &NewUser) -> Result<(String, String)> {
        let username = new_user.username.trim();
        let length = username.chars().count();
        if length == 0 {
            return Err(ValidationError::MissingField("username".to_string()).into());
        }
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
            return Err(ValidationError::invalid(
                "username",
                format!(
                    "must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
                ),
            )
            .into());
        }
        // Identifiers containing '@' are looked up as email addresses
        if username.contains('@') || username.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid(
                "username",
                "must not contain '@' or whitespace",
            )
            .into());
        }

        let email = normalize_email(&new_user.email);
        if email.is_empty() {
            return Err(ValidationError::MissingField("email".to_string()).into());
        }
        if email.len() > EMAIL_MAX_LENGTH || !EMAIL_REGEX.is_match(&email) {
            return Err(ValidationError::invalid("email", "is not a valid email address").into());
        }

        validate_new_password(&new_user.password, &new_user.confirm_password, "password")?;
        Ok((username.to_string(), email))
    }

    fn verified_credentials(&self, user_id: &str, password: &str) -> Result<UserCredentials> {
        let credentials = self.repository.get_credentials(user_id)?;
        if !verify_password(password, &credentials.password_hash)? {
            return Err(Error::InvalidCredentials);
        }
        Ok(credentials)
    }
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn validate_new_password(password: &str, confirm: &str, field: &str) -> Result<()> {
    if password.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()).into());
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::invalid(
            field,
            format!("must be at least {PASSWORD_MIN_LENGTH} characters long"),
        )
        .into());
    }
    if password != confirm {
        return Err(ValidationError::invalid("confirmPassword", "passwords must match").into());
    }
    Ok(())
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        let (username, email) = Self::validate_registration(&new_user)?;
        let password_hash = hash_password(&new_user.password)?;
        let user = self
            .repository
            .insert_user(NewUserRecord {
                username,
                email,
                password_hash,
            })
            .await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }

    fn authenticate(&self, identifier: &str, password: &str) -> Result<User> {
        let identifier = identifier.trim();
        let lookup = if identifier.contains('@') {
            normalize_email(identifier)
        } else {
            identifier.to_string()
        };

        let Some(credentials) = self.repository.find_credentials(&lookup)? else {
            verify_dummy(password);
            debug!("Login rejected: unknown identifier");
            return Err(Error::InvalidCredentials);
        };

        if verify_password(password, &credentials.password_hash)? {
            Ok(credentials.user)
        } else {
            debug!("Login rejected for user {}", credentials.user.id);
            Err(Error::InvalidCredentials)
        }
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_user(user_id)
    }

    async fn change_password(&self, user_id: &str, change: PasswordChange) -> Result<()> {
        validate_new_password(&change.new_password, &change.confirm_password, "newPassword")?;
        let credentials = self.verified_credentials(user_id, &change.current_password)?;
        let password_hash = hash_password(&change.new_password)?;
        self.repository
            .update_password_hash(credentials.user.id.clone(), password_hash)
            .await?;
        info!("Password changed for user {}", credentials.user.id);
        Ok(())
    }

    async fn delete_account(&self, user_id: &str, password: &str) -> Result<()> {
        let credentials = self.verified_credentials(user_id, password)?;
        self.repository
            .delete_user(credentials.user.id.clone())
            .await?;
        info!("Deleted user {}", credentials.user.id);
        Ok(())
    }
}
