//! Drupal JSON:API target-system client.
//!
//! Implements [`TargetClient`] over the site's `/jsonapi` endpoints with
//! basic authentication. Machine names travel as the `drupal_internal__id`
//! attribute; the JSON:API resource UUID is the opaque handle used for
//! updates.
//!
//! Create-status mapping: HTTP 201 is a genuinely new resource (the
//! `SAVED_NEW` analog), 409 Conflict means the target deduplicated the call.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{TargetError, TargetResult};
use crate::models::{EntityHandle, EntityKind, EntitySpec, ExistingSnapshot};
use crate::reconcile::{CreateStatus, TargetClient};

const JSONAPI_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Client for one Drupal site.
#[derive(Clone)]
pub struct DrupalClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

// =============================================================================
// JSON:API response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct CollectionDocument {
    #[serde(default)]
    data: Vec<ResourceObject>,
}

#[derive(Debug, Deserialize)]
struct ResourceObject {
    id: String,
    #[serde(default)]
    attributes: serde_json::Value,
}

impl ResourceObject {
    fn into_handle(self) -> Option<EntityHandle> {
        let machine_name = self.attributes.get("drupal_internal__id")?.as_str()?.to_string();
        Some(EntityHandle { uuid: self.id, id: machine_name, attributes: self.attributes })
    }
}

// =============================================================================
// Client
// =============================================================================

impl DrupalClient {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http: reqwest::Client::new(), base_url, username: username.into(), password: password.into() }
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/jsonapi/{}", self.base_url, kind.jsonapi_path())
    }

    fn resource_url(&self, kind: EntityKind, uuid: &str) -> String {
        format!("{}/{}", self.collection_url(kind), uuid)
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::ACCEPT, JSONAPI_CONTENT_TYPE)
    }

    async fn check_status(response: reqwest::Response) -> TargetResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(TargetError::AuthError(truncate(&message)));
        }
        Err(TargetError::UnexpectedResponse { status: status.as_u16(), message: truncate(&message) })
    }

    fn create_body(spec: &EntitySpec) -> serde_json::Value {
        serde_json::json!({
            "data": {
                "type": spec.kind().resource_type(),
                "attributes": spec.attributes(),
            }
        })
    }

    fn update_body(handle: &EntityHandle, spec: &EntitySpec) -> serde_json::Value {
        serde_json::json!({
            "data": {
                "type": spec.kind().resource_type(),
                "id": handle.uuid,
                "attributes": spec.attributes(),
            }
        })
    }
}

#[async_trait]
impl TargetClient for DrupalClient {
    async fn load(&self, kind: EntityKind, id: &str) -> TargetResult<Option<EntityHandle>> {
        let url = format!(
            "{}?filter[drupal_internal__id]={}",
            self.collection_url(kind),
            urlencoding::encode(id),
        );
        let response = self.request(self.http.get(&url)).send().await?;
        let response = Self::check_status(response).await?;
        let document: CollectionDocument =
            response.json().await.map_err(|e| TargetError::InvalidBody(e.to_string()))?;

        Ok(document.data.into_iter().find_map(ResourceObject::into_handle))
    }

    async fn load_multiple(&self, kind: EntityKind) -> TargetResult<ExistingSnapshot> {
        let response = self.request(self.http.get(self.collection_url(kind))).send().await?;
        let response = Self::check_status(response).await?;
        let document: CollectionDocument =
            response.json().await.map_err(|e| TargetError::InvalidBody(e.to_string()))?;

        Ok(document
            .data
            .into_iter()
            .filter_map(ResourceObject::into_handle)
            .map(|h| (h.id.clone(), h))
            .collect())
    }

    async fn create(&self, spec: &EntitySpec) -> TargetResult<CreateStatus> {
        let response = self
            .request(self.http.post(self.collection_url(spec.kind())))
            .header(reqwest::header::CONTENT_TYPE, JSONAPI_CONTENT_TYPE)
            .json(&Self::create_body(spec))
            .send()
            .await?;

        match response.status().as_u16() {
            201 => Ok(CreateStatus::New),
            409 => Ok(CreateStatus::Existing),
            _ => {
                Self::check_status(response).await?;
                // A success status other than 201 means the target no-opped.
                Ok(CreateStatus::Existing)
            }
        }
    }

    async fn update(&self, handle: &EntityHandle, spec: &EntitySpec) -> TargetResult<()> {
        let url = self.resource_url(spec.kind(), &handle.uuid);
        let response = self
            .request(self.http.patch(&url))
            .header(reqwest::header::CONTENT_TYPE, JSONAPI_CONTENT_TYPE)
            .json(&Self::update_body(handle, spec))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

fn truncate(message: &str) -> String {
    const MAX: usize = 200;
    if message.len() <= MAX {
        return message.to_string();
    }
    let mut end = MAX;
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &message[..end])
}
