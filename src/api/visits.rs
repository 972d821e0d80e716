//! Visit history and decision endpoints.

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{DecisionAction, DecisionResponse, VisitsPage};

impl ApiClient {
    /// GET /api/visits/{user_id}?page=&limit=
    pub async fn list_visits(
        &self,
        access_token: &str,
        user_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<VisitsPage, ClientError> {
        let request = self
            .http
            .get(self.url(&format!("/api/visits/{}", user_id)))
            .bearer_auth(access_token)
            .query(&[("page", page), ("limit", limit)]);
        self.send(request).await
    }

    /// POST /api/visits/approve/{id} or /api/visits/deny/{id}
    pub async fn decide_visit(
        &self,
        access_token: &str,
        visit_id: &str,
        action: DecisionAction,
    ) -> Result<DecisionResponse, ClientError> {
        let request = self
            .http
            .post(self.url(&format!("/api/visits/{}/{}", action.endpoint(), visit_id)))
            .bearer_auth(access_token);
        self.send(request).await
    }
}
