use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::datadog::DatadogClient;
use crate::error::{DatadogError, Result};
use crate::resources::{self, MapperContext, ResourceMapper};
use crate::state::ResourceState;

/// Result of a single presence probe against the API.
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Present(serde_json::Value),
    Absent,
}

/// A configured client plus the provider-wide settings mappers need.
pub struct Provider {
    client: Arc<DatadogClient>,
    ctx: MapperContext,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("ctx", &self.ctx)
            .finish_non_exhaustive()
    }
}

impl Provider {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        config.check_credentials()?;
        let client = DatadogClient::from_config(config)?;

        Ok(Self {
            client: Arc::new(client),
            ctx: MapperContext {
                default_tags: config.default_tags.clone(),
            },
        })
    }

    pub fn with_client(client: Arc<DatadogClient>, ctx: MapperContext) -> Self {
        Self { client, ctx }
    }

    /// Build the provider and, when `validate` is set, check the credentials.
    pub async fn configure(config: &ProviderConfig) -> Result<Self> {
        let provider = Self::new(config)?;

        if config.validate {
            log::info!("Datadog client initialized, validating credentials");
            if !provider.client.validate().await? {
                return Err(DatadogError::AuthError(
                    "invalid or missing credentials provided to the Datadog provider; \
                     check that the API and APP keys are valid for this region"
                        .to_string(),
                ));
            }
        }

        Ok(provider)
    }

    pub fn client(&self) -> Arc<DatadogClient> {
        Arc::clone(&self.client)
    }

    pub fn mapper(&self, type_name: &str) -> Result<&'static dyn ResourceMapper> {
        resources::lookup(type_name).ok_or_else(|| {
            DatadogError::InvalidInput(format!(
                "unsupported resource type '{}' (supported: {})",
                type_name,
                resources::supported_types().join(", ")
            ))
        })
    }

    pub async fn create(&self, type_name: &str, state: &ResourceState) -> Result<ResourceState> {
        let mapper = self.mapper(type_name)?;
        let body = mapper.build_create(state, &self.ctx)?;

        let response = self
            .client
            .send(reqwest::Method::POST, mapper.collection_path(), &body)
            .await?;
        let created = mapper.read_response(response)?;

        log::info!("Created {} {}", type_name, created.id);
        Ok(created)
    }

    /// Refresh a resource; `None` means it no longer exists remotely.
    pub async fn read(&self, type_name: &str, id: &str) -> Result<Option<ResourceState>> {
        let mapper = self.mapper(type_name)?;

        match self.probe(mapper, id).await? {
            Presence::Present(body) => Ok(Some(mapper.read_response(body)?)),
            Presence::Absent => {
                log::info!("{} {} not found, removing from state", type_name, id);
                Ok(None)
            }
        }
    }

    /// Import an existing object by id.
    pub async fn import(&self, type_name: &str, id: &str) -> Result<ResourceState> {
        self.read(type_name, id)
            .await?
            .ok_or_else(|| DatadogError::NotFound(format!("{} {}", type_name, id)))
    }

    pub async fn update(&self, type_name: &str, state: &ResourceState) -> Result<ResourceState> {
        let mapper = self.mapper(type_name)?;
        require_id(type_name, &state.id)?;

        let body = mapper.build_update(state, &self.ctx)?;
        let response = self
            .client
            .send(mapper.update_method(), &mapper.item_path(&state.id), &body)
            .await?;
        let updated = mapper.read_response(response)?;

        log::info!("Updated {} {}", type_name, updated.id);
        Ok(updated)
    }

    /// Delete a resource; a 404 means it is already gone.
    pub async fn delete(&self, type_name: &str, id: &str) -> Result<()> {
        let mapper = self.mapper(type_name)?;
        require_id(type_name, id)?;

        match self.client.delete(&mapper.item_path(id)).await {
            Ok(()) => {
                log::info!("Deleted {} {}", type_name, id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                log::info!("{} {} already deleted", type_name, id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// GET the resource once. 404 and "gone" bodies are [`Presence::Absent`].
    pub async fn probe(&self, mapper: &dyn ResourceMapper, id: &str) -> Result<Presence> {
        match self.client.get(&mapper.item_path(id)).await {
            Ok(body) if mapper.is_gone(&body) => Ok(Presence::Absent),
            Ok(body) => Ok(Presence::Present(body)),
            Err(e) if e.is_not_found() => Ok(Presence::Absent),
            Err(e) => Err(e),
        }
    }
}

fn require_id(type_name: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(DatadogError::InvalidInput(format!(
            "{} has no id; create it first",
            type_name
        )));
    }
    Ok(())
}
