//! Auth module: JWT issuance/validation, refresh-token storage and login/logout.
//!
//! Access tokens travel in the `Authorization: Bearer <token>` header; refresh
//! tokens never leave the server and are kept in a [`token_store::RefreshTokenStore`]
//! under the user's email.

pub mod domain;
pub mod errors;
pub mod jwt;
pub mod password;
pub mod service;
pub mod token_store;

pub use service::AuthService;
