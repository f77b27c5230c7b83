use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authority granted to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => models::user::ROLE_USER,
            Role::Admin => models::user::ROLE_ADMIN,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            models::user::ROLE_USER => Some(Role::User),
            models::user::ROLE_ADMIN => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Withdrawn,
}

/// Business view of a user row (never carries the password hash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(rename = "userId")]
    pub id: Uuid,
    #[serde(rename = "userEmail")]
    pub email: String,
    #[serde(rename = "userCellphone")]
    pub cellphone: Option<String>,
    #[serde(rename = "userRole")]
    pub role: Role,
    pub status: UserStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Stored password hash.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Row to insert on sign-up; the hash is computed by the service.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub cellphone: Option<String>,
    pub role: Role,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// `POST /user`. `useYn` and `userRole` sent by clients are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpInput {
    #[serde(rename = "userEmail")]
    pub email: String,
    #[serde(rename = "userPassword", default)]
    pub password: String,
    #[serde(rename = "userCellphone", default)]
    pub cellphone: Option<String>,
}

/// `GET /user/email`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailCheckInput {
    #[serde(rename = "userEmail")]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailCheckOutput {
    pub duplicated: bool,
}

/// `PATCH /user`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserInput {
    #[serde(rename = "userCellphone", default)]
    pub cellphone: Option<String>,
}

/// `PATCH /user/password`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordInput {
    #[serde(rename = "userPassword", default)]
    pub new_password: String,
}

/// Re-entered password for destructive or privileged account operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfirmation {
    #[serde(rename = "userPassword", default)]
    pub password: String,
}

impl TryFrom<models::user::Model> for UserAccount {
    type Error = crate::errors::ServiceError;

    fn try_from(m: models::user::Model) -> Result<Self, Self::Error> {
        let role = Role::parse(&m.role)
            .ok_or_else(|| crate::errors::ServiceError::Db(format!("unknown role {} for user {}", m.role, m.id)))?;
        let status = if m.is_active() { UserStatus::Active } else { UserStatus::Withdrawn };
        Ok(UserAccount {
            id: m.id,
            email: m.email,
            cellphone: m.cellphone,
            role,
            status,
            created_at: m.created_at.with_timezone(&Utc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_uses_prefixed_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ROLE_ADMIN\"");
        assert_eq!(Role::parse("ROLE_USER"), Some(Role::User));
        assert_eq!(Role::parse("admin"), None);
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn sign_up_ignores_client_role_and_use_flag() {
        let body = r#"{"userEmail":"ohejung@naver.com","userPassword":"1234","useYn":"Y","userCellphone":"01088887777","userRole":""}"#;
        let input: SignUpInput = serde_json::from_str(body).unwrap();
        assert_eq!(input.email, "ohejung@naver.com");
        assert_eq!(input.cellphone.as_deref(), Some("01088887777"));
    }

    #[test]
    fn update_input_treats_null_cellphone_as_none() {
        let input: UpdateUserInput = serde_json::from_str(r#"{"userCellphone":null}"#).unwrap();
        assert!(input.cellphone.is_none());
        let input: UpdateUserInput = serde_json::from_str("{}").unwrap();
        assert!(input.cellphone.is_none());
    }
}
