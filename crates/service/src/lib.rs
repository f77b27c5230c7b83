//! Service layer for the limited-sales back office.
//! - Business rules for accounts, authentication and products, independent of the web framework.
//! - Persistence behind repository traits (SeaORM in production, in-memory for tests).
//! - Typed errors that the HTTP layer maps onto status codes.

pub mod auth;
pub mod errors;
pub mod pagination;
pub mod product;
pub mod user;
#[cfg(test)]
pub mod test_support;
