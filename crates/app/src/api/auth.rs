//! Login and logout.

use serde::Serialize;
use serde_json::Value;
use tracing::info;
use zeroize::Zeroizing;

use crate::{
    api::{ApiClient, ApiError},
    session::Session,
};

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Log in with e-mail and password and keep the issued session.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the session cannot
    /// be persisted.
    #[tracing::instrument(name = "api.auth.login", skip(self, password), err)]
    pub async fn login(&self, email: &str, password: Zeroizing<String>) -> Result<(), ApiError> {
        let session: Session = self
            .post(
                "auth/login",
                &LoginRequest {
                    email,
                    password: password.as_str(),
                },
            )
            .await?;

        self.store_session(session).await?;

        info!("logged in");

        Ok(())
    }

    /// Log out. The local session is cleared even when the backend call
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns the backend error after clearing the local session.
    #[tracing::instrument(name = "api.auth.logout", skip(self), err)]
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .post::<Value, _>("auth/logout", &serde_json::json!({}))
            .await;

        self.clear_session().await?;

        result.map(|_response| ())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        api::ApiConfig,
        session::SessionFile,
        test::server::{Reply, StubServer},
    };

    use super::*;

    #[tokio::test]
    async fn login_persists_session() -> TestResult {
        let server = StubServer::start(vec![Reply::json(
            201,
            json!({ "data": { "accessToken": "a1", "refreshToken": "r1", "user": { "id": 1 } } }),
        )])
        .await?;

        let dir = tempfile::tempdir()?;
        let file = SessionFile::new(dir.path().join("session.json"));

        let client = ApiClient::new(ApiConfig {
            base_url: server.base_url(),
            timeout: Duration::from_secs(5),
        })?
        .with_session_file(file.clone())?;

        client
            .login("admin@example.com", Zeroizing::new("hunter2".to_string()))
            .await?;

        let requests = server.requests().await;

        assert_eq!(
            requests.first().map(|r| r.body.clone()),
            Some(json!({ "email": "admin@example.com", "password": "hunter2" }))
        );
        assert!(client.is_authenticated().await);
        assert_eq!(file.load()?, Some(Session::new("a1", Some("r1".to_string()))));

        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_session_even_on_failure() -> TestResult {
        let server = StubServer::start(vec![Reply::empty(500)]).await?;

        let client = ApiClient::new(ApiConfig {
            base_url: server.base_url(),
            timeout: Duration::from_secs(5),
        })?
        .with_session(Session::new("a1", None));

        let result = client.logout().await;

        assert!(matches!(result, Err(ApiError::Server { .. })));
        assert!(!client.is_authenticated().await);
        assert_eq!(
            server.requests().await.first().map(|r| r.method.clone()),
            Some("POST".to_string())
        );

        Ok(())
    }
}
