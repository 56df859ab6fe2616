//! Application layer - Use cases and the ports they depend on
//!
//! Services here orchestrate domain rules and talk to the outside world
//! only through the outbound port traits.

pub mod ports;
pub mod services;
