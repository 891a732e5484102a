//! Master data stored by the laboratory API.

use std::sync::Arc;

use async_trait::async_trait;
use lims_core::models::{MasterRecord, MasterResource};
use lims_core::validation::validate_record_id;
use lims_core::{Applied, LimsError, LimsResult, Mutation, Record, Repository};
use reqwest::Method;
use serde_json::Value;

use crate::client::LabApiClient;
use crate::error::LabClientError;

/// Some endpoints wrap their payload as `{ "data": ... }`.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// [`Repository`] over one master resource, acting with the caller's token.
#[derive(Debug, Clone)]
pub struct HttpMasterRepository {
    client: Arc<LabApiClient>,
    token: String,
    resource: MasterResource,
    collection: &'static str,
}

impl HttpMasterRepository {
    /// # Errors
    ///
    /// Returns [`LabClientError::Config`] for resources the laboratory API does not serve.
    pub fn new(
        client: Arc<LabApiClient>,
        token: impl Into<String>,
        resource: MasterResource,
    ) -> Result<Self, LabClientError> {
        let collection = resource.upstream_path().ok_or_else(|| {
            LabClientError::Config(format!("{resource} has no upstream endpoint"))
        })?;
        Ok(Self {
            client,
            token: token.into(),
            resource,
            collection,
        })
    }

    pub fn resource(&self) -> MasterResource {
        self.resource
    }

    fn item_path(&self, id: &str) -> LimsResult<String> {
        validate_record_id(id)?;
        Ok(format!("{}/{}", self.collection, id))
    }

    /// The record echoed by a write, or `fallback` when the upstream replies without one.
    fn echoed(value: Value, fallback: MasterRecord) -> LimsResult<MasterRecord> {
        match unwrap_data(value) {
            Value::Object(map) => Ok(MasterRecord(map)),
            _ => Ok(fallback),
        }
    }
}

#[async_trait]
impl Repository<MasterRecord> for HttpMasterRepository {
    async fn list(&self) -> LimsResult<Vec<MasterRecord>> {
        let path = format!("{}/all", self.collection);
        let body = self.client.get_json(&self.token, &path, &[]).await?;
        match unwrap_data(body) {
            Value::Array(items) => items.into_iter().map(MasterRecord::from_value).collect(),
            Value::Null => Ok(Vec::new()),
            other => Err(LabClientError::InvalidResponse(format!(
                "{path} returned {} instead of a list",
                json_kind(&other)
            ))
            .into()),
        }
    }

    async fn get(&self, id: &str) -> LimsResult<MasterRecord> {
        let path = self.item_path(id)?;
        match unwrap_data(self.client.get_json(&self.token, &path, &[]).await?) {
            Value::Object(map) => Ok(MasterRecord(map)),
            Value::Null => Err(LimsError::NotFound {
                kind: MasterRecord::KIND,
                id: id.to_string(),
            }),
            other => MasterRecord::from_value(other),
        }
    }

    async fn apply(
        &self,
        mutation: Mutation<MasterRecord>,
        _actor: &str,
    ) -> LimsResult<Applied<MasterRecord>> {
        match mutation {
            Mutation::Create(record) => {
                record.validate_record()?;
                let body = record.clone().into_value();
                let echoed = self
                    .client
                    .send_json(Method::POST, &self.token, self.collection, &[], Some(&body))
                    .await?;
                Ok(Applied::Created(Self::echoed(echoed, record)?))
            }
            Mutation::Update {
                id,
                payload,
                reason,
            } => {
                payload.validate_record()?;
                let path = self.item_path(&id)?;
                let body = payload.clone().with("reason", reason.as_str());
                let echoed = self
                    .client
                    .send_json(Method::PUT, &self.token, &path, &[], Some(&body))
                    .await?;
                Ok(Applied::Updated(Self::echoed(echoed, payload)?))
            }
            Mutation::Delete { id, reason } => {
                let path = self.item_path(&id)?;
                self.client
                    .send_json(
                        Method::DELETE,
                        &self.token,
                        &path,
                        &[("reason", reason.as_str().to_string())],
                        None::<&Value>,
                    )
                    .await?;
                Ok(Applied::Deleted { id })
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
