//! Cross-component scenarios.

mod delivery_flows;
mod import_flows;
mod lifecycle_flows;
mod session_flows;
mod store_flows;
mod verification_flows;
