pub mod catalog;
pub mod chat;
pub mod escalation;
pub mod metrics;
pub mod user;

pub use catalog::*;
pub use chat::*;
pub use escalation::*;
pub use metrics::*;
pub use user::*;
