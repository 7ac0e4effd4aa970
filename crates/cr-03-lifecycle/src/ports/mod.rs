//! Ports for the lifecycle controller.

pub mod inbound;
pub mod outbound;
