//! Consultation requests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::api::{ApiClient, ApiError};

/// Request for the shop to get in touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    /// Name to address the customer by.
    pub full_name: String,

    /// Phone number to call back.
    pub phone: String,

    /// Optional e-mail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// What the customer needs.
    pub message: String,
}

impl ApiClient {
    /// Send a consultation request.
    ///
    /// # Errors
    ///
    /// Returns the backend or transport error.
    #[tracing::instrument(name = "api.consultations.create", skip(self, request), err)]
    pub async fn request_consultation(&self, request: &ConsultationRequest) -> Result<(), ApiError> {
        self.post::<Value, _>("consultations", request).await?;

        info!("consultation requested");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        api::ApiConfig,
        test::server::{Reply, StubServer},
    };

    use super::*;

    #[tokio::test]
    async fn consultation_is_posted_without_empty_email() -> TestResult {
        let server = StubServer::start(vec![Reply::json(201, json!({ "id": 3 }))]).await?;

        let api = ApiClient::new(ApiConfig {
            base_url: server.base_url(),
            timeout: Duration::from_secs(5),
        })?;

        api.request_consultation(&ConsultationRequest {
            full_name: "Tran Thi B".to_string(),
            phone: "0912345678".to_string(),
            email: None,
            message: "Corporate gifts for 50 staff".to_string(),
        })
        .await?;

        assert_eq!(
            server.requests().await.first().map(|r| r.body.clone()),
            Some(json!({
                "fullName": "Tran Thi B",
                "phone": "0912345678",
                "message": "Corporate gifts for 50 staff"
            }))
        );

        Ok(())
    }
}
