//! SeaORM entities for the limited-sales back office plus the row-level
//! helpers (validation, create/update/delete) the service layer builds on.

pub mod db;
pub mod errors;
pub mod product;
pub mod user;
pub mod user_credentials;

#[cfg(test)]
mod tests;
