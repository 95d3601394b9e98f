//! HTTP client for the storefront REST API.

use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::{
    api::errors::{ApiError, server_message},
    session::{Session, SessionFile},
};

const AUTH_PREFIX: &str = "auth/";
const REFRESH_PATH: &str = "auth/refresh";

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash, e.g. `"http://localhost:3000/api"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// Authenticated JSON client.
///
/// A request rejected with 401 triggers exactly one `auth/refresh` followed by
/// one retry of the original request. When the refresh fails the session is
/// cleared and [`ApiError::SessionExpired`] is returned.
///
/// Requests rejected together share a single refresh: whoever holds
/// `refresh_lock` refreshes, the others retry with the token it stored.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: Mutex<Option<Session>>,
    refresh_lock: Mutex<()>,
    session_file: Option<SessionFile>,
}

impl ApiClient {
    /// Create a client without a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            session: Mutex::new(None),
            refresh_lock: Mutex::new(()),
            session_file: None,
        })
    }

    /// Use an in-memory session.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Mutex::new(Some(session));
        self
    }

    /// Load the session from `file` and keep it in sync with every login,
    /// refresh and logout.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read.
    pub fn with_session_file(mut self, file: SessionFile) -> Result<Self, ApiError> {
        self.session = Mutex::new(file.load()?);
        self.session_file = Some(file);

        Ok(self)
    }

    /// Whether a session is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.session.lock().await.is_some()
    }

    /// Replace the current session and persist it.
    pub(crate) async fn store_session(&self, session: Session) -> Result<(), ApiError> {
        if let Some(file) = &self.session_file {
            file.save(&session)?;
        }

        *self.session.lock().await = Some(session);

        Ok(())
    }

    /// Drop the current session and its persisted copy.
    pub(crate) async fn clear_session(&self) -> Result<(), ApiError> {
        self.session.lock().await.take();

        if let Some(file) = &self.session_file {
            file.clear()?;
        }

        Ok(())
    }

    /// `GET path`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, &[], None).await
    }

    /// `GET path?query`.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    /// `POST path` with a JSON body.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;

        self.request(Method::POST, path, &[], Some(body)).await
    }

    /// `PATCH path` with a JSON body.
    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;

        self.request(Method::PATCH, path, &[], Some(body)).await
    }

    /// `DELETE path`.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, path, &[], None).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let token = self.access_token().await;
        let mut response = self
            .send(&method, path, query, body.as_ref(), token.as_ref())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && !path.starts_with(AUTH_PREFIX)
            && self.can_refresh().await
        {
            warn!(%method, path, "access token rejected, refreshing session");

            self.refresh_session(token.as_ref()).await?;

            let token = self.access_token().await;
            response = self
                .send(&method, path, query, body.as_ref(), token.as_ref())
                .await?;
        }

        decode(path, response).await
    }

    async fn send(
        &self,
        method: &Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        token: Option<&Zeroizing<String>>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        let mut request = self.http.request(method.clone(), &url);

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, %url, "sending request");

        let response = request.send().await?;

        debug!(%method, %url, status = %response.status(), "received response");

        Ok(response)
    }

    async fn access_token(&self) -> Option<Zeroizing<String>> {
        self.session.lock().await.as_ref().map(Session::access_token)
    }

    async fn can_refresh(&self) -> bool {
        self.session
            .lock()
            .await
            .as_ref()
            .is_some_and(|session| session.refresh_token().is_some())
    }

    /// Refresh the session unless another request already replaced the
    /// `rejected` access token while this one waited for the lock.
    async fn refresh_session(&self, rejected: Option<&Zeroizing<String>>) -> Result<(), ApiError> {
        let _refreshing = self.refresh_lock.lock().await;

        let current = self.session.lock().await.clone();

        if let (Some(session), Some(rejected)) = (&current, rejected)
            && session.access_token().as_str() != rejected.as_str()
        {
            debug!("session already refreshed");
            return Ok(());
        }
        let refresh_token = current.as_ref().and_then(Session::refresh_token);

        let (Some(current), Some(refresh_token)) = (current, refresh_token) else {
            self.clear_session().await?;
            return Err(ApiError::SessionExpired);
        };

        let body = serde_json::json!({ "refreshToken": refresh_token.as_str() });

        let issued = match self.http.post(self.url(REFRESH_PATH)).json(&body).send().await {
            Ok(response) => decode::<Session>(REFRESH_PATH, response).await,
            Err(error) => Err(ApiError::Http(error)),
        };

        match issued {
            Ok(issued) => self.store_session(current.refreshed(issued)).await,
            Err(error) => {
                warn!(error = %error, "session refresh failed, clearing session");

                self.clear_session().await?;

                Err(ApiError::SessionExpired)
            }
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();

        return Err(ApiError::Server {
            status,
            message: server_message(&text),
        });
    }

    let text = response.text().await?;

    let value = if text.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })?
    };

    serde_json::from_value(unwrap_data(value)).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Responses come either bare or wrapped as `{ "data": ... }`.
fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut object) if object.contains_key("data") => {
            object.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
