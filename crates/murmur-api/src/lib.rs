pub mod account;
pub mod auth;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod routes;
pub mod suggestions;
pub mod validate;
