//! Exists and CheckDestroy helpers.
//!
//! After an apply every managed resource in the state must be readable; after a
//! destroy every one of them must be gone. Destroy checks poll through
//! [`converge::retry`] because deletions take a moment to propagate.

use crate::converge::{self, ProbeError, RetryPolicy};
use crate::error::{DatadogError, Result};
use crate::provider::{Presence, Provider};
use crate::resources::ResourceMapper;
use crate::state::TrackedResource;

/// Resources a check can act on: supported type and a known id.
fn checkable<'a>(
    resources: &'a [TrackedResource],
) -> impl Iterator<Item = (&'a TrackedResource, &'static dyn ResourceMapper)> {
    resources.iter().filter_map(|r| {
        if r.id.is_empty() {
            log::debug!("Skipping {}: no id in state", r.address);
            return None;
        }
        match crate::resources::lookup(&r.resource_type) {
            Some(mapper) => Some((r, mapper)),
            None => {
                log::debug!("Skipping {}: unsupported type", r.address);
                None
            }
        }
    })
}

/// Every resource must exist right now. No retries.
pub async fn check_exists(provider: &Provider, resources: &[TrackedResource]) -> Result<()> {
    for (resource, mapper) in checkable(resources) {
        match provider.probe(mapper, &resource.id).await {
            Ok(Presence::Present(_)) => {
                log::debug!("{} ({}) exists", resource.address, resource.id);
            }
            Ok(Presence::Absent) => {
                return Err(DatadogError::NotFound(format!(
                    "{} ({}) does not exist",
                    resource.address, resource.id
                )));
            }
            Err(e) => {
                log::warn!("Error retrieving {} ({}): {}", resource.address, resource.id, e);
                return Err(e);
            }
        }
    }
    Ok(())
}

/// One destroy probe: gone or destroyed is success, present is retryable,
/// anything else is fatal.
pub async fn probe_destroyed(
    provider: &Provider,
    mapper: &dyn ResourceMapper,
    resource: &TrackedResource,
) -> std::result::Result<(), ProbeError> {
    match provider.probe(mapper, &resource.id).await {
        Ok(Presence::Absent) => Ok(()),
        Ok(Presence::Present(body)) if mapper.is_destroyed(&body) => Ok(()),
        Ok(Presence::Present(_)) => Err(ProbeError::retryable(format!(
            "{} ({}) still exists",
            resource.address, resource.id
        ))),
        Err(e) => Err(ProbeError::fatal(format!(
            "received an error retrieving {} ({}): {}",
            resource.address, resource.id, e
        ))),
    }
}

/// Every resource must be gone within `policy`.
pub async fn check_destroyed(
    provider: &Provider,
    resources: &[TrackedResource],
    policy: RetryPolicy,
) -> Result<()> {
    for (resource, mapper) in checkable(resources) {
        converge::retry(policy, || probe_destroyed(provider, mapper, resource)).await?;
        log::debug!("{} ({}) destroyed", resource.address, resource.id);
    }
    Ok(())
}
