//! Recipe engine for an extrusion line HMI.
//!
//! Controller records are packed into base64 transport tags
//! ([`proto::record_codec`]), moved to and from the controller over the HMI
//! tag runtime ([`client::controller`]) and kept as recipes in two CSV tables
//! ([`store`]). [`workflow`] drives the recipe screen.

pub mod client;
pub mod config;
pub mod error;
pub mod proto;
pub mod schema;
pub mod store;
pub mod workflow;
