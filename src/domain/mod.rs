//! Domain layer - pure business types with no infrastructure dependencies.

pub mod catalog;
pub mod foundation;
pub mod membership;
pub mod payment;
pub mod user;
