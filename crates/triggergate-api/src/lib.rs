//! # TriggerGate API
//!
//! Remote trigger routes for jobs, guarded by a per-job token.
//!
//! ```text
//! {prefix}/build                 GET|POST  job, token, [delay], [cause]
//! {prefix}/buildWithParameters   GET|POST  job, token, [delay], [cause], <param>=<value>...
//! {prefix}/polling               GET|POST  job, token
//! ```
//!
//! Every trigger request runs resolve, authorize, bind, schedule and map, in
//! that order. A missing job and a job without a token are indistinguishable
//! to the caller (both 404); a wrong token is 403.
//!
//! The crate also carries the small host surface the routes live in: a CSRF
//! crumb layer (bypassed for the trigger prefix), identity scoping, a
//! liveness check and queue item inspection.

pub mod error;
pub mod gateway;
pub mod http;
pub mod server;
pub mod state;

pub use error::GatewayError;
pub use gateway::{BuildRoute, TokenGateway, TriggerCall};
pub use http::csrf::{CRUMB_HEADER, CrumbIssuer, CsrfBypassRule};
pub use http::routes::create_router;
pub use server::GatewayServer;
pub use state::{AppState, GatewaySettings};
