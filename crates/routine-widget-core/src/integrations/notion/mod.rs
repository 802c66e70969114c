//! Notion REST client and the collaborators built on it.

mod events;
mod profile;
mod properties;
mod report;

pub use events::NotionEventSource;
pub use profile::{NotionProfileSource, WidgetProfile};
pub use report::NotionRoutineStore;

use reqwest::{Client, Method};
use serde_json::{json, Value};
use url::Url;

use crate::error::NotionError;

pub const NOTION_VERSION: &str = "2022-06-28";
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1/";

/// Property holding the day of each page in the routine and profile databases.
pub const DAY_PROPERTY: &str = "Date";

/// Thin async wrapper over the endpoints the widgets use.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: Url,
    token: String,
}

impl NotionClient {
    pub fn new(token: &str) -> Result<Self, NotionError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Point the client at another API root (a mock server in tests).
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, NotionError> {
        if token.trim().is_empty() {
            return Err(NotionError::MissingCredentials("token"));
        }
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(&base)?,
            token: token.to_string(),
        })
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, NotionError> {
        let url = self.base_url.join(path)?;
        tracing::debug!(%method, %url, "notion request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION);
        if let Some(body) = body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let body: Value = resp.json().await.unwrap_or(Value::Null);
        Err(NotionError::Api {
            status: status.as_u16(),
            code: body["code"].as_str().unwrap_or("unknown").to_string(),
            message: body["message"].as_str().unwrap_or_default().to_string(),
        })
    }

    pub async fn retrieve_database(&self, database_id: &str) -> Result<Value, NotionError> {
        self.send(Method::GET, &format!("databases/{database_id}"), None)
            .await
    }

    pub async fn query_database(&self, database_id: &str, query: &Value) -> Result<Value, NotionError> {
        self.send(Method::POST, &format!("databases/{database_id}/query"), Some(query))
            .await
    }

    pub async fn update_page_properties(&self, page_id: &str, properties: Value) -> Result<Value, NotionError> {
        let body = json!({ "properties": properties });
        self.send(Method::PATCH, &format!("pages/{page_id}"), Some(&body))
            .await
    }

    pub async fn list_block_children(&self, block_id: &str, page_size: u32) -> Result<Value, NotionError> {
        self.send(
            Method::GET,
            &format!("blocks/{block_id}/children?page_size={page_size}"),
            None,
        )
        .await
    }

    pub async fn delete_block(&self, block_id: &str) -> Result<Value, NotionError> {
        self.send(Method::DELETE, &format!("blocks/{block_id}"), None)
            .await
    }

    pub async fn append_block_children(&self, block_id: &str, children: Value) -> Result<Value, NotionError> {
        let body = json!({ "children": children });
        self.send(Method::PATCH, &format!("blocks/{block_id}/children"), Some(&body))
            .await
    }
}

/// `results` of a list response, empty when absent.
fn results(response: &Value) -> &[Value] {
    response["results"].as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn require(value: &str, what: &'static str) -> Result<(), NotionError> {
    if value.trim().is_empty() {
        Err(NotionError::MissingCredentials(what))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        assert!(matches!(
            NotionClient::new("  "),
            Err(NotionError::MissingCredentials("token"))
        ));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = NotionClient::with_base_url("t", "http://localhost:1234/v1").unwrap();
        let url = client.base_url.join("databases/abc/query").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/v1/databases/abc/query");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        assert!(matches!(
            NotionClient::with_base_url("t", "not a url"),
            Err(NotionError::InvalidUrl(_))
        ));
    }
}
