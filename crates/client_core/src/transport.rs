//! HTTP access to the notes service.

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{EntityId, EntityKind},
    protocol::{CreateEntityRequest, Entity},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

/// Remote owner of the note and todo collections.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Entity>, ClientError>;
    async fn create(&self, kind: EntityKind, text: &str) -> Result<Entity, ClientError>;
    async fn delete(&self, kind: EntityKind, id: &EntityId) -> Result<(), ClientError>;
}

pub struct HttpEntityStore {
    http: Client,
    base_url: Url,
}

impl HttpEntityStore {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(server_url.trim()).map_err(|source| ClientError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::UnsupportedBaseUrl(server_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// `{base}/api/{collection}` or `{base}/api/{collection}/{id}`, with the id percent-encoded.
    pub fn endpoint(&self, kind: EntityKind, id: Option<&EntityId>) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::UnsupportedBaseUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("api").push(kind.collection());
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl EntityStore for HttpEntityStore {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Entity>, ClientError> {
        let operation = format!("list {}", kind.collection());
        let url = self.endpoint(kind, None)?;
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::http(&operation, e))?;
        success(&operation, response)?
            .json()
            .await
            .map_err(|e| ClientError::http(&operation, e))
    }

    async fn create(&self, kind: EntityKind, text: &str) -> Result<Entity, ClientError> {
        let operation = format!("create {}", kind.label());
        let url = self.endpoint(kind, None)?;
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .json(&CreateEntityRequest {
                text: text.to_string(),
            })
            .send()
            .await
            .map_err(|e| ClientError::http(&operation, e))?;
        success(&operation, response)?
            .json()
            .await
            .map_err(|e| ClientError::http(&operation, e))
    }

    async fn delete(&self, kind: EntityKind, id: &EntityId) -> Result<(), ClientError> {
        let operation = format!("delete {} {id}", kind.label());
        let url = self.endpoint(kind, Some(id))?;
        debug!(%url, "DELETE");
        let response = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| ClientError::http(&operation, e))?;
        success(&operation, response)?;
        Ok(())
    }
}

fn success(operation: &str, response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::UnexpectedStatus {
            operation: operation.to_string(),
            status,
        })
    }
}
