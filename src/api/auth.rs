//! Account endpoints.

use serde_json::Value;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest};

impl ApiClient {
    /// POST /api/auth/login
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&LoginRequest { email, password });
        self.send(request).await
    }

    /// POST /api/auth/register
    #[tracing::instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<(), ClientError> {
        let request = self.http.post(self.url("/api/auth/register")).json(&RegisterRequest {
            name,
            email,
            password,
        });
        let _: Value = self.send(request).await?;
        Ok(())
    }

    /// POST /api/auth/change-password
    pub async fn change_password(
        &self,
        access_token: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ClientError> {
        let request = self
            .http
            .post(self.url("/api/auth/change-password"))
            .bearer_auth(access_token)
            .json(&ChangePasswordRequest {
                old_password,
                new_password,
            });
        let _: Value = self.send(request).await?;
        Ok(())
    }
}
