//! JSON REST client for the event API.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use super::error::ApiError;
use super::{
    ChecklistItem, ChecklistUpdate, CollaborationStore, Comment, EventFilters, EventStore,
    NewChecklistItem, NewComment, NewEvent, User,
};
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::types::{ColumnId, Event, EventId, RecordId};

/// Event store backed by the REST API
#[derive(Debug, Clone)]
pub struct HttpEventStore {
    client: Client,
    base_url: Url,
}

impl HttpEventStore {
    /// Create a client for the API rooted at `base_url`
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| BoardError::Config(format!("invalid api_url '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(BoardError::Config(format!(
                "invalid api_url '{base_url}': not a base URL"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the URL for a path below the base, e.g. `["events", "7", "status"]`
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BoardError::Config(format!("invalid api_url '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        tracing::debug!("{method} {url}");
        Ok(self.client.request(method, url))
    }

    async fn send(request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await.into());
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = Self::send(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        request: RequestBuilder,
        body: &B,
    ) -> Result<T> {
        Self::fetch(request.json(body)).await
    }
}

impl EventStore for HttpEventStore {
    async fn list_events(&self, filters: &EventFilters) -> Result<Vec<Event>> {
        let query: Vec<(&str, &str)> = filters
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let mut request = self.request(Method::GET, &["events"])?;
        if !query.is_empty() {
            request = request.query(&query);
        }
        Self::fetch(request).await
    }

    async fn get_event(&self, id: &EventId) -> Result<Event> {
        let request = self.request(Method::GET, &["events", id.as_str()])?;
        let response = request.send().await?;
        if !response.status().is_success() {
            let error = ApiError::from_response(response).await;
            if error.is_not_found() {
                return Err(BoardError::EventNotFound(id.to_string()));
            }
            return Err(error.into());
        }
        Ok(response.json::<Event>().await?)
    }

    async fn create_event(&self, event: &NewEvent) -> Result<Event> {
        let request = self.request(Method::POST, &["events"])?;
        Self::send_json(request, event).await
    }

    async fn update_event(&self, id: &EventId, fields: &Map<String, Value>) -> Result<Event> {
        let request = self.request(Method::PUT, &["events", id.as_str()])?;
        Self::send_json(request, fields).await
    }

    async fn update_event_status(&self, id: &EventId, status: ColumnId) -> Result<Event> {
        let request = self.request(Method::PATCH, &["events", id.as_str(), "status"])?;
        Self::send_json(request, &json!({ "status": status.wire_label() })).await
    }

    async fn delete_event(&self, id: &EventId) -> Result<()> {
        let request = self.request(Method::DELETE, &["events", id.as_str()])?;
        Self::send(request).await?;
        Ok(())
    }
}

impl CollaborationStore for HttpEventStore {
    async fn list_checklist(&self, event_id: &EventId) -> Result<Vec<ChecklistItem>> {
        let request = self.request(Method::GET, &["checklist", "event", event_id.as_str()])?;
        Self::fetch(request).await
    }

    async fn create_checklist_item(&self, item: &NewChecklistItem) -> Result<ChecklistItem> {
        let request = self.request(Method::POST, &["checklist"])?;
        Self::send_json(request, item).await
    }

    async fn update_checklist_item(
        &self,
        id: &RecordId,
        update: &ChecklistUpdate,
    ) -> Result<ChecklistItem> {
        let request = self.request(Method::PUT, &["checklist", id.as_str()])?;
        Self::send_json(request, update).await
    }

    async fn delete_checklist_item(&self, id: &RecordId) -> Result<()> {
        let request = self.request(Method::DELETE, &["checklist", id.as_str()])?;
        Self::send(request).await?;
        Ok(())
    }

    async fn list_comments(&self, event_id: &EventId) -> Result<Vec<Comment>> {
        let request = self.request(Method::GET, &["comments", "event", event_id.as_str()])?;
        Self::fetch(request).await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        let request = self.request(Method::POST, &["comments"])?;
        Self::send_json(request, comment).await
    }

    async fn update_comment(&self, id: &RecordId, text: &str) -> Result<Comment> {
        let request = self.request(Method::PUT, &["comments", id.as_str()])?;
        Self::send_json(request, &json!({ "text": text })).await
    }

    async fn delete_comment(&self, id: &RecordId) -> Result<()> {
        let request = self.request(Method::DELETE, &["comments", id.as_str()])?;
        Self::send(request).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let request = self.request(Method::GET, &["users"])?;
        Self::fetch(request).await
    }
}
