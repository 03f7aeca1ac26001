//! Port definitions — traits that the outside world implements.
//!
//! Ports are the boundaries between the conversation core and its
//! collaborators: the registry data source, grammar-bundle provisioning, and
//! intent execution. They are defined here so adapters can depend on the
//! engine without circular dependencies.

pub mod bundles;
pub mod handler;
pub mod registry;

pub use bundles::BundleProvider;
pub use handler::{HandlerResponse, IntentHandler, IntentInvocation};
pub use registry::Registry;
