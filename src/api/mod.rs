use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::Customer;

/// Error talking to the customers service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),
}

/// Error body the service returns on non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Search filters taken from the form fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub firstname: String,
    pub lastname: String,
    pub email_id: String,
    pub phone_number: String,
    pub active: bool,
}

impl SearchFilters {
    /// Builds the query string the way the shipped web form does: non-empty
    /// filters joined with `&`, values inserted verbatim (no percent
    /// encoding). When the active filter is not the first one it goes out
    /// under the misspelled key `activer`, which the service ignores, so a
    /// combined search silently drops the active condition. Keep it this way
    /// until the service team confirms a key rename on both sides.
    pub fn to_query_string(&self) -> String {
        let mut query = String::new();
        if !self.firstname.is_empty() {
            query.push_str("firstname=");
            query.push_str(&self.firstname);
        }
        if !self.lastname.is_empty() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str("lastname=");
            query.push_str(&self.lastname);
        }
        if !self.email_id.is_empty() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str("email_id=");
            query.push_str(&self.email_id);
        }
        if !self.phone_number.is_empty() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str("phone_number=");
            query.push_str(&self.phone_number);
        }
        if self.active {
            if !query.is_empty() {
                query.push_str("&activer=true");
            } else {
                query.push_str("active=true");
            }
        }
        query
    }
}

/// HTTP client for the `/customers` resource.
#[derive(Clone)]
pub struct CustomerApi {
    http: reqwest::Client,
    base_url: String,
}

impl CustomerApi {
    /// No timeouts on the client: requests stay in flight until the server
    /// answers or the connection drops, matching the form's behavior.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/customers", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Parse a response, mapping non-2xx statuses to `ApiError::Server` with
    /// the `message` property pulled out of the error body.
    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::server_error(resp).await);
        }
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {}", e)))
    }

    async fn server_error(resp: reqwest::Response) -> ApiError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.message,
            Err(_) => body,
        };
        ApiError::Server { status, message }
    }

    // Customer operations

    pub async fn create(&self, customer: &Customer) -> Result<Customer, ApiError> {
        let url = self.collection_url();
        tracing::debug!(%url, "POST customer");
        let resp = self.http.post(&url).json(customer).send().await?;
        Self::parse(resp).await
    }

    pub async fn update(&self, id: &str, customer: &Customer) -> Result<Customer, ApiError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "PUT customer");
        let resp = self.http.put(&url).json(customer).send().await?;
        Self::parse(resp).await
    }

    pub async fn get(&self, id: &str) -> Result<Customer, ApiError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "GET customer");
        let resp = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// The response body is not read: any 2xx counts as deleted, any other
    /// status is reported without a server message.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.item_url(id);
        tracing::debug!(%url, "DELETE customer");
        let resp = self
            .http
            .delete(&url)
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: String::new(),
            });
        }
        Ok(())
    }

    pub async fn activate(&self, id: &str) -> Result<Customer, ApiError> {
        let url = format!("{}/activate", self.item_url(id));
        tracing::debug!(%url, "PUT activate");
        let resp = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// Always queries with a trailing `?`, even with no filters set.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Customer>, ApiError> {
        let url = format!("{}?{}", self.collection_url(), filters.to_query_string());
        tracing::debug!(%url, "GET customers");
        let resp = self
            .http
            .get(&url)
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .send()
            .await?;
        Self::parse(resp).await
    }
}

#[cfg(test)]
mod client_test;
