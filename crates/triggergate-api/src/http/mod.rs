//! HTTP surface: trigger handlers plus the host routes around them.

pub mod csrf;
pub mod handlers;
pub mod host;
pub mod identity;
pub mod request;
pub mod routes;
