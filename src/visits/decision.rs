//! Approve/deny flow for a visitor at the door.
//!
//! Per visit: `Idle -> Processing -> Idle`. A visit's status changes only
//! after the backend confirms the decision; a failed call leaves it pending.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::VisitorList;
use crate::errors::ClientError;
use crate::inflight::InFlight;
use crate::models::{DecisionAction, PendingRequest, VisitStatus};
use crate::AppContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionState {
    Idle,
    Processing,
}

pub struct DecisionFlow {
    ctx: AppContext,
    list: Arc<VisitorList>,
    inflight: InFlight,
    presented: RwLock<Option<PendingRequest>>,
}

impl DecisionFlow {
    pub fn new(ctx: AppContext, list: Arc<VisitorList>) -> Self {
        Self {
            ctx,
            list,
            inflight: InFlight::new(),
            presented: RwLock::new(None),
        }
    }

    /// Open the decision view for a pending visit from the history.
    pub async fn present(&self, visit_id: &str) -> Result<PendingRequest, ClientError> {
        let visit = self
            .list
            .find(visit_id)
            .await
            .ok_or_else(|| ClientError::NotFound(format!("Visit {} not found", visit_id)))?;
        if !visit.is_pending() {
            return Err(ClientError::Validation(format!(
                "Visit {} is already {}",
                visit_id,
                visit.status.as_str()
            )));
        }

        let request = PendingRequest::from(&visit);
        *self.presented.write().await = Some(request.clone());
        Ok(request)
    }

    /// Open the decision view for a request that did not come from the
    /// history, e.g. a push notification.
    pub async fn present_request(&self, request: PendingRequest) {
        *self.presented.write().await = Some(request);
    }

    pub async fn presented(&self) -> Option<PendingRequest> {
        self.presented.read().await.clone()
    }

    /// Close the decision view. Refused while its decision is in flight.
    pub async fn dismiss(&self) -> bool {
        let mut presented = self.presented.write().await;
        if let Some(request) = presented.as_ref() {
            if self.state(&request.id) == DecisionState::Processing {
                return false;
            }
        }
        *presented = None;
        true
    }

    pub fn state(&self, visit_id: &str) -> DecisionState {
        if self.inflight.is_active(&decision_key(visit_id)) {
            DecisionState::Processing
        } else {
            DecisionState::Idle
        }
    }

    /// Submit a decision and reconcile the history with the confirmed status.
    ///
    /// A repeated decision for the same visit while one is in flight fails
    /// with `Busy` and sends nothing.
    pub async fn decide(
        &self,
        visit_id: &str,
        action: DecisionAction,
    ) -> Result<VisitStatus, ClientError> {
        if visit_id.trim().is_empty() {
            return Err(ClientError::Validation("Missing visitor ID".to_string()));
        }
        let user = self.ctx.session.require_user().await.map_err(|_| {
            ClientError::Unauthenticated("Missing authentication token".to_string())
        })?;

        if let Some(visit) = self.list.find(visit_id).await {
            if !visit.is_pending() {
                return Err(ClientError::Validation(format!(
                    "Visit {} is already {}",
                    visit_id,
                    visit.status.as_str()
                )));
            }
        }

        let _guard = self.inflight.begin(decision_key(visit_id))?;

        let result = self
            .ctx
            .api
            .decide_visit(&user.access_token, visit_id, action)
            .await
            .and_then(|resp| confirmed_status(&resp.visit.status));

        match result {
            Ok(status) => {
                self.list.apply_decision(visit_id, status).await;
                let mut presented = self.presented.write().await;
                if presented.as_ref().is_some_and(|request| request.id == visit_id) {
                    *presented = None;
                }
                tracing::info!("Visitor {} {} successfully", visit_id, action.past_tense());
                Ok(status)
            }
            Err(e) => {
                let verb = match action {
                    DecisionAction::Accept => "approve",
                    DecisionAction::Reject => "deny",
                };
                tracing::error!("Error updating visitor {}: {}", visit_id, e);
                self.list
                    .set_error(format!("Failed to {} visitor: {}", verb, e.message()))
                    .await;
                Err(e)
            }
        }
    }
}

fn decision_key(visit_id: &str) -> String {
    format!("decide visit {}", visit_id)
}

/// Only a status that moved the visit out of pending counts as confirmation.
fn confirmed_status(raw: &str) -> Result<VisitStatus, ClientError> {
    match VisitStatus::from_remote(raw) {
        VisitStatus::Pending => Err(ClientError::Api(format!(
            "Server did not confirm the decision (status {})",
            raw
        ))),
        status => Ok(status),
    }
}
