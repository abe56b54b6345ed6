use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{MapperContext, ResourceMapper, attributes_as, response_id, to_attributes};
use crate::datadog::models::{
    AzureIntegration, GcsIntegration, JsonApiEnvelope, LogsArchiveAttributes,
    LogsArchiveDestination, S3Integration,
};
use crate::error::{DatadogError, Result};
use crate::state::ResourceState;

pub const TYPE_NAME: &str = "datadog_logs_archive";
const DATA_TYPE: &str = "archives";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct S3Archive {
    pub bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub account_id: String,
    pub role_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GcsArchive {
    pub bucket: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub client_email: String,
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AzureArchive {
    pub container: String,
    pub storage_account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub client_id: String,
    pub tenant_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveAttributes {
    pub name: String,
    pub query: String,
    #[serde(default)]
    pub include_tags: bool,
    #[serde(default)]
    pub rehydration_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rehydration_max_scan_size_in_gb: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_archive: Option<S3Archive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcs_archive: Option<GcsArchive>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_archive: Option<AzureArchive>,
}

impl ArchiveAttributes {
    fn destination(&self) -> Result<LogsArchiveDestination> {
        match (&self.s3_archive, &self.gcs_archive, &self.azure_archive) {
            (Some(s3), None, None) => Ok(LogsArchiveDestination::S3 {
                bucket: s3.bucket.clone(),
                path: s3.path.clone(),
                integration: S3Integration {
                    account_id: s3.account_id.clone(),
                    role_name: s3.role_name.clone(),
                },
            }),
            (None, Some(gcs), None) => Ok(LogsArchiveDestination::Gcs {
                bucket: gcs.bucket.clone(),
                path: gcs.path.clone(),
                integration: GcsIntegration {
                    client_email: gcs.client_email.clone(),
                    project_id: gcs.project_id.clone(),
                },
            }),
            (None, None, Some(azure)) => Ok(LogsArchiveDestination::Azure {
                container: azure.container.clone(),
                storage_account: azure.storage_account.clone(),
                path: azure.path.clone(),
                region: None,
                integration: AzureIntegration {
                    client_id: azure.client_id.clone(),
                    tenant_id: azure.tenant_id.clone(),
                },
            }),
            _ => Err(DatadogError::InvalidInput(
                "datadog_logs_archive needs exactly one of s3_archive, gcs_archive, azure_archive"
                    .to_string(),
            )),
        }
    }
}

pub struct LogsArchiveMapper;

impl ResourceMapper for LogsArchiveMapper {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn collection_path(&self) -> &'static str {
        "/api/v2/logs/config/archives"
    }

    fn build_create(&self, state: &ResourceState, _ctx: &MapperContext) -> Result<Value> {
        let attrs: ArchiveAttributes = attributes_as(TYPE_NAME, state)?;

        let body = JsonApiEnvelope::new(
            DATA_TYPE,
            LogsArchiveAttributes {
                destination: Some(attrs.destination()?),
                name: attrs.name,
                query: attrs.query,
                include_tags: attrs.include_tags,
                rehydration_tags: attrs.rehydration_tags,
                rehydration_max_scan_size_in_gb: attrs.rehydration_max_scan_size_in_gb,
                state: None,
            },
        );

        Ok(serde_json::to_value(body)?)
    }

    fn read_response(&self, body: Value) -> Result<ResourceState> {
        let id = response_id(TYPE_NAME, body.pointer("/data/id"))?;
        let envelope: JsonApiEnvelope<LogsArchiveAttributes> = serde_json::from_value(body)?;
        let archive = envelope.data.attributes;

        let mut attrs = ArchiveAttributes {
            name: archive.name,
            query: archive.query,
            include_tags: archive.include_tags,
            rehydration_tags: archive.rehydration_tags,
            rehydration_max_scan_size_in_gb: archive.rehydration_max_scan_size_in_gb,
            s3_archive: None,
            gcs_archive: None,
            azure_archive: None,
        };

        match archive.destination {
            Some(LogsArchiveDestination::S3 { bucket, path, integration }) => {
                attrs.s3_archive = Some(S3Archive {
                    bucket,
                    path,
                    account_id: integration.account_id,
                    role_name: integration.role_name,
                });
            }
            Some(LogsArchiveDestination::Gcs { bucket, path, integration }) => {
                attrs.gcs_archive = Some(GcsArchive {
                    bucket,
                    path,
                    client_email: integration.client_email,
                    project_id: integration.project_id,
                });
            }
            Some(LogsArchiveDestination::Azure {
                container,
                storage_account,
                path,
                integration,
                ..
            }) => {
                attrs.azure_archive = Some(AzureArchive {
                    container,
                    storage_account,
                    path,
                    client_id: integration.client_id,
                    tenant_id: integration.tenant_id,
                });
            }
            None => {}
        }

        Ok(ResourceState {
            id,
            attributes: to_attributes(&attrs)?,
        })
    }
}
