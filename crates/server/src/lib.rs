//! HTTP surface of the limited-sales back office: axum router, JWT
//! middleware, handlers and the OpenAPI document.

pub mod auth;
pub mod errors;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
