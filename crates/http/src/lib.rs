//! HTTP client facade for the libris REST API.
//!
//! Every request goes through [`ApiClient::send`], which attaches the session's
//! bearer token and a request id, and clears the stored token when the backend
//! answers 401. Errors are always handed back to the caller.

use std::sync::Arc;

use anyhow::Context;
use reqwest::header::ACCEPT;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;
use uuid::{NoContext, Timestamp, Uuid};

use libris_kernel::settings::ApiSettings;
use libris_kernel::Session;

pub mod endpoints;
pub mod error;

pub use endpoints::Endpoint;
pub use error::{ApiError, FieldErrors};
pub use reqwest::{Method, StatusCode};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Thin wrapper over `reqwest::Client` bound to one base URL and one session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings, session: Arc<Session>) -> anyhow::Result<Self> {
        let base_url = Url::parse(&settings.base_url)
            .with_context(|| format!("invalid api.base_url '{}'", settings.base_url))?;
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build HTTP client")?;

        tracing::debug!(base_url = %base_url, "api client ready");
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Dispatch one request and return the response if its status is 2xx.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = endpoints::join(&self.base_url, path)?;
        let request_id = make_request_id();

        let mut request = self
            .http
            .request(method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, %request_id, "sending request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(
                    %method,
                    path,
                    %request_id,
                    error = %err,
                    "network error: no response from backend"
                );
                return Err(ApiError::Transport(err));
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(%method, path, %request_id, "unauthenticated; clearing stored token");
            if let Err(err) = self.session.clear_token() {
                tracing::error!(error = %err, "failed to remove stored token");
            }
        }

        let body = response.bytes().await.unwrap_or_default();
        let error = ApiError::from_status(status, &body);
        tracing::debug!(%method, path, %request_id, status = status.as_u16(), error = %error, "request failed");
        Err(error)
    }

    pub async fn get_json<T>(&self, endpoint: Endpoint) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .send::<()>(Method::GET, &endpoint.path(), None)
            .await?;
        response.json().await.map_err(ApiError::Decode)
    }

    pub async fn post_json<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, &endpoint.path(), Some(body)).await?;
        response.json().await.map_err(ApiError::Decode)
    }

    /// POST whose response body is not needed.
    pub async fn post<B>(&self, endpoint: Endpoint, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, &endpoint.path(), Some(body))
            .await
            .map(drop)
    }

    pub async fn put<B>(&self, endpoint: Endpoint, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, &endpoint.path(), Some(body))
            .await
            .map(drop)
    }

    pub async fn delete(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, &endpoint.path(), None)
            .await
            .map(drop)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish()
    }
}

/// Time-ordered id so request logs sort naturally.
fn make_request_id() -> Uuid {
    Uuid::new_v7(Timestamp::now(NoContext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode as AxumStatus};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    async fn echo(headers: HeaderMap) -> Json<Value> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(json!({
            "authorization": header(AUTHORIZATION.as_str()),
            "request_id": header(REQUEST_ID_HEADER),
        }))
    }

    async fn unauthenticated() -> (AxumStatus, Json<Value>) {
        (
            AxumStatus::UNAUTHORIZED,
            Json(json!({ "message": "Unauthenticated." })),
        )
    }

    async fn rejected() -> (AxumStatus, Json<Value>) {
        (
            AxumStatus::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The given data was invalid.",
                "errors": { "title": ["The title field is required."] }
            })),
        )
    }

    async fn serve() -> String {
        let router = Router::new()
            .route("/api/books", get(echo))
            .route("/api/login", post(unauthenticated))
            .route("/api/signup", post(rejected));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base_url: String) -> ApiClient {
        let settings = ApiSettings {
            base_url,
            request_timeout_ms: 5000,
        };
        ApiClient::new(&settings, Arc::new(Session::in_memory())).unwrap()
    }

    #[tokio::test]
    async fn attaches_bearer_token_when_present() {
        let client = client(serve().await);
        client.session().set_token("abc123").unwrap();

        let echoed: Value = client.get_json(Endpoint::Books).await.unwrap();
        assert_eq!(echoed["authorization"], "Bearer abc123");
        let request_id = echoed["request_id"].as_str().unwrap();
        assert!(Uuid::parse_str(request_id).is_ok());
    }

    #[tokio::test]
    async fn sends_unauthenticated_without_token() {
        let client = client(serve().await);

        let echoed: Value = client.get_json(Endpoint::Books).await.unwrap();
        assert!(echoed["authorization"].is_null());
    }

    #[tokio::test]
    async fn unauthorized_clears_stored_token() {
        let client = client(serve().await);
        client.session().set_token("stale").unwrap();

        let err = client
            .post(Endpoint::Login, &json!({ "email": "a@b.c", "password": "x" }))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(client.session().token(), None);
    }

    #[tokio::test]
    async fn validation_errors_pass_through() {
        let client = client(serve().await);
        client.session().set_token("kept").unwrap();

        let err = client
            .post(Endpoint::Signup, &json!({}))
            .await
            .unwrap_err();

        let errors = err.field_errors().unwrap();
        assert_eq!(errors["title"], vec!["The title field is required."]);
        assert_eq!(client.session().token().as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn transport_failure_is_returned_unchanged() {
        // grab a free port, then close it so nothing is listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client(format!("http://{addr}"));
        client.session().set_token("kept").unwrap();

        let err = client.delete(Endpoint::Book(1)).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        assert_eq!(client.session().token().as_deref(), Some("kept"));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let settings = ApiSettings {
            base_url: "not a url".to_string(),
            request_timeout_ms: 1000,
        };
        let err = ApiClient::new(&settings, Arc::new(Session::in_memory())).unwrap_err();
        assert!(err.to_string().contains("invalid api.base_url"));
    }

    #[test]
    fn request_ids_are_v7() {
        assert_eq!(make_request_id().get_version_num(), 7);
    }
}
