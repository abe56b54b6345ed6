// Library interface for the Datadog provider
// Resource mappers, the REST client and the convergence checks used by the CLI and tests

pub mod checks;
pub mod config;
pub mod converge;
pub mod datadog;
pub mod error;
pub mod naming;
pub mod provider;
pub mod resources;
pub mod state;
pub mod tags;

// Re-export commonly used types
pub use config::ProviderConfig;
pub use converge::{ProbeError, RetryPolicy};
pub use datadog::DatadogClient;
pub use error::{DatadogError, Result};
pub use provider::Provider;
pub use state::{ResourceState, StateFile, TrackedResource};
