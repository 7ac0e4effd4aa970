//! Ports for the verification client.

pub mod inbound;
pub mod outbound;
