use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use models::user::{normalize_email, validate_cellphone, validate_email};

use super::domain::{EmailCheckOutput, NewUser, Role, SignUpInput, UpdateUserInput, UserAccount};
use super::repository::UserRepository;
use crate::auth::password::{hash_password, verify_password, PASSWORD_ALGORITHM};
use crate::auth::token_store::RefreshTokenStore;
use crate::errors::ServiceError;

pub const PASSWORD_MIN_LEN: usize = 4;
pub const PASSWORD_MAX_LEN: usize = 64;

/// Account lifecycle operations.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<dyn RefreshTokenStore>,
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(ServiceError::Validation(format!(
            "password must be {PASSWORD_MIN_LEN}-{PASSWORD_MAX_LEN} characters"
        )));
    }
    Ok(())
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, tokens: Arc<dyn RefreshTokenStore>) -> Self {
        Self { repo, tokens }
    }

    /// Register a regular account.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::token_store::InMemoryRefreshTokenStore;
    /// use service::user::{UserService, domain::{Role, SignUpInput}, repository::mock::InMemoryUserRepository};
    /// let svc = UserService::new(Arc::new(InMemoryUserRepository::default()), Arc::new(InMemoryRefreshTokenStore::new()));
    /// let input = SignUpInput { email: "ohejung@naver.com".into(), password: "1234".into(), cellphone: Some("01088887777".into()) };
    /// let user = tokio_test::block_on(svc.sign_up(input)).unwrap();
    /// assert_eq!(user.role, Role::User);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn sign_up(&self, input: SignUpInput) -> Result<UserAccount, ServiceError> {
        validate_email(&input.email)?;
        validate_password(&input.password)?;
        let cellphone = input.cellphone.filter(|c| !c.trim().is_empty());
        if let Some(c) = &cellphone {
            validate_cellphone(c)?;
        }
        let email = normalize_email(&input.email);
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict("email already registered".into()));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self
            .repo
            .create(NewUser {
                email,
                cellphone,
                role: Role::User,
                password_hash,
                password_algorithm: PASSWORD_ALGORITHM.to_string(),
            })
            .await?;
        info!(user_id = %user.id, "user_registered");
        Ok(user)
    }

    /// Whether an account (active or withdrawn) already uses this email.
    pub async fn is_email_taken(&self, email: &str) -> Result<EmailCheckOutput, ServiceError> {
        validate_email(email)?;
        let found = self.repo.find_by_email(&normalize_email(email)).await?;
        Ok(EmailCheckOutput { duplicated: found.is_some() })
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserAccount, ServiceError> {
        self.repo.find_by_id(user_id).await?.ok_or_else(|| ServiceError::not_found("user"))
    }

    #[instrument(skip(self, user, input), fields(user_id = %user.id))]
    pub async fn update_info(&self, user: &UserAccount, input: UpdateUserInput) -> Result<UserAccount, ServiceError> {
        let cellphone = input
            .cellphone
            .ok_or_else(|| ServiceError::Validation("userCellphone must not be null".into()))?;
        validate_cellphone(&cellphone)?;
        let updated = self.repo.update_cellphone(user.id, &cellphone).await?;
        info!("user_updated");
        Ok(updated)
    }

    /// Rehash and sign the account out everywhere.
    #[instrument(skip(self, user, new_password), fields(user_id = %user.id))]
    pub async fn change_password(&self, user: &UserAccount, new_password: &str) -> Result<(), ServiceError> {
        validate_password(new_password)?;
        let hash = hash_password(new_password)?;
        self.repo.upsert_password(user.id, hash, PASSWORD_ALGORITHM).await?;
        self.tokens.remove(&user.email).await?;
        info!("password_changed");
        Ok(())
    }

    #[instrument(skip(self, user, password), fields(user_id = %user.id))]
    pub async fn withdraw(&self, user: &UserAccount, password: &str) -> Result<(), ServiceError> {
        self.confirm_password(user, password).await?;
        self.repo.withdraw(user.id).await?;
        self.tokens.remove(&user.email).await?;
        info!("user_withdrawn");
        Ok(())
    }

    /// Promote to `ROLE_ADMIN` so the account can manage limited-sale products.
    #[instrument(skip(self, user, password), fields(user_id = %user.id))]
    pub async fn grant_limited_sale_admin(&self, user: &UserAccount, password: &str) -> Result<UserAccount, ServiceError> {
        self.confirm_password(user, password).await?;
        if user.role.is_admin() {
            return self.profile(user.id).await;
        }
        let updated = self.repo.update_role(user.id, Role::Admin).await?;
        info!(role = %updated.role, "role_granted");
        Ok(updated)
    }

    async fn confirm_password(&self, user: &UserAccount, password: &str) -> Result<(), ServiceError> {
        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("no credentials on record".into()))?;
        if !verify_password(password, &cred.password_hash)? {
            warn!(user_id = %user.id, "password confirmation failed");
            return Err(ServiceError::Unauthorized("password mismatch".into()));
        }
        Ok(())
    }
}
