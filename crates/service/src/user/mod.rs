//! Accounts: sign-up, profile updates, password changes, withdrawal and the
//! limited-sale admin grant.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::UserService;
