use crate::{
    db::DbPool,
    entities::user::{self, Entity as Users},
    errors::ServiceError,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use tracing::{info, instrument};

const MIN_PASSWORD_LEN: usize = 6;

/// Back-office credential checks. Passwords are stored as argon2 hashes;
/// unknown users and wrong passwords are indistinguishable to callers.
#[derive(Clone)]
pub struct AuthService {
    db: Arc<DbPool>,
}

impl AuthService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let user = Users::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("invalid credentials".into()))?;

        let parsed = PasswordHash::new(&user.password_hash)
            .map_err(|e| ServiceError::HashError(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| ServiceError::Unauthorized("invalid credentials".into()))?;

        info!(user_id = user.id, "login succeeded");
        Ok(user)
    }

    #[instrument(skip(self, password))]
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<user::Model, ServiceError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::ValidationError("username is required".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::ValidationError(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let taken = Users::find()
            .filter(user::Column::Username.eq(username))
            .one(self.db.as_ref())
            .await?
            .is_some();
        if taken {
            return Err(ServiceError::Conflict(format!(
                "username {username} already exists"
            )));
        }

        let user = user::ActiveModel {
            username: Set(username.to_owned()),
            password_hash: Set(hash_password(password)?),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await?;

        info!(user_id = user.id, "user created");
        Ok(user)
    }
}

pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}
