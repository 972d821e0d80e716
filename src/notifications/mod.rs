//! Visitor push-notification payloads.
//!
//! The backend pushes a small JSON object when someone rings. Tapping the
//! notification either opens a visit's details or the approve/deny view.

use serde::{Deserialize, Serialize};

use crate::errors::ClientError;
use crate::models::{
    optional_string_or_number, NotificationStatus, PendingRequest, VisitorDetection,
    UNKNOWN_VISITOR,
};
use crate::AppContext;

/// Snapshot URL sent with a simulated detection.
pub const SAMPLE_DETECTION_IMAGE_URL: &str = "https://example.com/visitor-image.jpg";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationData {
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub visit_id: Option<String>,
    #[serde(default)]
    pub visitor_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub detected_label: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub screen: Option<String>,
}

/// Where a tapped notification leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationRoute {
    VisitDetails { visit_id: String },
    VisitorAlert(PendingRequest),
    None,
}

impl NotificationData {
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The decision request carried by the payload, if it names a visit.
    pub fn pending_request(&self) -> Option<PendingRequest> {
        let visit_id = self.visit_id.clone()?;
        let name = self
            .visitor_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_VISITOR.to_string());
        Some(PendingRequest::new(
            visit_id,
            name,
            self.image_url.iter().cloned().collect(),
        ))
    }

    pub fn route(&self) -> NotificationRoute {
        match self.screen.as_deref() {
            Some("VisitDetails") => match &self.visit_id {
                Some(visit_id) => NotificationRoute::VisitDetails {
                    visit_id: visit_id.clone(),
                },
                None => NotificationRoute::None,
            },
            Some("VisitorAlert") => self
                .pending_request()
                .map_or(NotificationRoute::None, NotificationRoute::VisitorAlert),
            _ => NotificationRoute::None,
        }
    }
}

/// Ask the backend whether notifications reach the signed-in owner.
pub async fn status(ctx: &AppContext) -> Result<NotificationStatus, ClientError> {
    let user = ctx.session.require_user().await?;
    ctx.api
        .notification_status(&user.access_token, &user.id)
        .await
}

/// Have the backend push a test notification to the owner's devices.
pub async fn send_test(ctx: &AppContext) -> Result<(), ClientError> {
    let user = ctx.session.require_user().await?;
    ctx.api
        .send_test_notification(&user.access_token, &user.id)
        .await?;
    tracing::info!("Test notification requested for user {}", user.id);
    Ok(())
}

/// Report a visitor the way the door camera does, producing a real alert.
pub async fn simulate_visitor(ctx: &AppContext, visitor_name: &str) -> Result<(), ClientError> {
    let user = ctx.session.require_user().await?;
    let owner_id = user.id.parse::<i64>().map_err(|_| {
        ClientError::Validation(format!("Owner id {} is not numeric", user.id))
    })?;
    let visitor_name = match visitor_name.trim() {
        "" => "John Doe",
        name => name,
    };

    ctx.api
        .report_visitor_detected(
            &user.access_token,
            &VisitorDetection {
                owner_id,
                visitor_name,
                image_url: SAMPLE_DETECTION_IMAGE_URL,
                detected_label: "person",
            },
        )
        .await
}
