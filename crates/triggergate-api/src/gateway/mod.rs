//! The trigger pipeline: resolve, authorize, bind, schedule, map.

pub mod authorizer;
pub mod binder;
pub mod delay;
pub mod gate;
pub mod resolver;
pub mod response;
mod service;

pub use authorizer::{Authorization, Denial, TokenAuthorizer};
pub use binder::{ParameterBinder, RequestFields};
pub use delay::parse_delay;
pub use gate::SchedulingGate;
pub use resolver::{JobResolver, Operation};
pub use response::ResponseMapper;
pub use service::{BuildRoute, TokenGateway, TriggerCall};
