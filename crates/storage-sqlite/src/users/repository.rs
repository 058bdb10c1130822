use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;
use uuid::Uuid;

use onekaday_core::errors::Error;
use onekaday_core::users::{NewUserRecord, User, UserCredentials, UserRepositoryTrait};
use onekaday_core::Result;

use super::model::{NewUserDB, UserDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::users;
use crate::utils::now_utc;

pub struct UserRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

/// Maps a unique-index violation on `users` to the matching duplicate error.
fn map_insert_error(err: DieselError, username: &str, email: &str) -> Error {
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &err {
        let message = info.message();
        if message.contains("users.username") {
            return Error::DuplicateUsername(username.to_string());
        }
        if message.contains("users.email") {
            return Error::DuplicateEmail(email.to_string());
        }
    }
    StorageError::from(err).into()
}

impl UserRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        UserRepository { pool, writer }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_user(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?
            .map(User::from)
            .ok_or_else(|| Error::NotFound("User".to_string()))
    }

    fn get_credentials(&self, user_id: &str) -> Result<UserCredentials> {
        let mut conn = get_connection(&self.pool)?;
        users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?
            .map(UserCredentials::from)
            .ok_or_else(|| Error::NotFound("User".to_string()))
    }

    fn find_credentials(&self, identifier: &str) -> Result<Option<UserCredentials>> {
        let mut conn = get_connection(&self.pool)?;
        let query = users::table.select(UserDB::as_select()).into_boxed();
        let query = if identifier.contains('@') {
            query.filter(users::email.eq(identifier.trim().to_lowercase()))
        } else {
            query.filter(users::username.eq(identifier.trim()))
        };
        Ok(query
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?
            .map(UserCredentials::from))
    }

    async fn insert_user(&self, new_user: NewUserRecord) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let username_taken = diesel::select(diesel::dsl::exists(
                    users::table.filter(users::username.eq(&new_user.username)),
                ))
                .get_result::<bool>(conn)
                .into_core()?;
                if username_taken {
                    return Err(Error::DuplicateUsername(new_user.username));
                }

                let email_taken = diesel::select(diesel::dsl::exists(
                    users::table.filter(users::email.eq(&new_user.email)),
                ))
                .get_result::<bool>(conn)
                .into_core()?;
                if email_taken {
                    return Err(Error::DuplicateEmail(new_user.email));
                }

                let record = NewUserDB {
                    id: Uuid::new_v4().to_string(),
                    username: new_user.username,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    created_at: now_utc(),
                };
                let inserted = diesel::insert_into(users::table)
                    .values(&record)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(|e| map_insert_error(e, &record.username, &record.email))?;
                debug!("Registered user {}", inserted.id);
                Ok(User::from(inserted))
            })
            .await
    }

    async fn update_password_hash(&self, user_id: String, password_hash: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let updated = diesel::update(users::table.find(&user_id))
                    .set(users::password_hash.eq(password_hash))
                    .execute(conn)
                    .into_core()?;
                if updated == 0 {
                    return Err(Error::NotFound("User".to_string()));
                }
                Ok(())
            })
            .await
    }

    async fn delete_user(&self, user_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(users::table.find(user_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use onekaday_core::users::{hash_password, NewUser, UserService, UserServiceTrait};
    use tempfile::tempdir;

    async fn create_test_repository() -> (UserRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (UserRepository::new(pool, writer), temp_dir)
    }

    fn record(username: &str, email: &str) -> NewUserRecord {
        NewUserRecord {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_username_or_email() {
        let (repo, _dir) = create_test_repository().await;
        let user = repo
            .insert_user(record("alice", "alice@example.com"))
            .await
            .unwrap();

        let by_name = repo.find_credentials("alice").unwrap().unwrap();
        assert_eq!(by_name.user.id, user.id);
        assert_eq!(by_name.password_hash, "$argon2id$stub");

        let by_email = repo.find_credentials("Alice@Example.com").unwrap().unwrap();
        assert_eq!(by_email.user.id, user.id);

        assert!(repo.find_credentials("bob").unwrap().is_none());
        assert_eq!(repo.get_user(&user.id).unwrap().username, "alice");
    }

    #[tokio::test]
    async fn duplicate_username_and_email_are_rejected() {
        let (repo, _dir) = create_test_repository().await;
        repo.insert_user(record("alice", "alice@example.com"))
            .await
            .unwrap();

        let dup_name = repo
            .insert_user(record("alice", "other@example.com"))
            .await;
        assert!(matches!(dup_name, Err(Error::DuplicateUsername(_))));

        let dup_email = repo
            .insert_user(record("alicia", "alice@example.com"))
            .await;
        assert!(matches!(dup_email, Err(Error::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn password_hash_update_and_delete() {
        let (repo, _dir) = create_test_repository().await;
        let user = repo
            .insert_user(record("carol", "carol@example.com"))
            .await
            .unwrap();

        repo.update_password_hash(user.id.clone(), "$argon2id$new".into())
            .await
            .unwrap();
        let creds = repo.find_credentials("carol").unwrap().unwrap();
        assert_eq!(creds.password_hash, "$argon2id$new");

        assert_eq!(repo.delete_user(user.id.clone()).await.unwrap(), 1);
        assert!(matches!(repo.get_user(&user.id), Err(Error::NotFound(_))));
        assert!(matches!(
            repo.update_password_hash(user.id, "x".into()).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn account_changes_never_reach_the_account_owning_that_email() {
        let (repo, _dir) = create_test_repository().await;
        let repo = Arc::new(repo);
        let service = UserService::new(repo.clone());

        // Row written directly, as registration no longer accepts '@' in usernames
        let legacy = repo
            .insert_user(NewUserRecord {
                username: "bob@x.io".to_string(),
                email: "alice@a.com".to_string(),
                password_hash: hash_password("shared1").unwrap(),
            })
            .await
            .unwrap();
        let bob = service
            .register(NewUser {
                username: "bob".to_string(),
                email: "bob@x.io".to_string(),
                password: "shared1".to_string(),
                confirm_password: "shared1".to_string(),
            })
            .await
            .unwrap();

        let creds = repo.get_credentials(&legacy.id).unwrap();
        assert_eq!(creds.user.username, "bob@x.io");

        service.delete_account(&legacy.id, "shared1").await.unwrap();
        assert!(matches!(repo.get_user(&legacy.id), Err(Error::NotFound(_))));
        assert_eq!(repo.get_user(&bob.id).unwrap().username, "bob");
        assert_eq!(service.authenticate("bob", "shared1").unwrap().id, bob.id);
    }

    #[tokio::test]
    async fn usernames_with_at_sign_are_refused() {
        let (repo, _dir) = create_test_repository().await;
        let service = UserService::new(Arc::new(repo));
        let result = service
            .register(NewUser {
                username: "bob@x.io".to_string(),
                email: "bob@example.com".to_string(),
                password: "shared1".to_string(),
                confirm_password: "shared1".to_string(),
            })
            .await;
        match result {
            Err(Error::Validation(err)) => assert_eq!(err.field(), Some("username")),
            other => panic!("expected username validation error, got {other:?}"),
        }
    }
}
