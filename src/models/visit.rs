//! Visit model: the backend's visit record and the local view of it.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use super::{null_as_default, string_or_number};

/// Shown when a visit carries no photo.
pub const FALLBACK_PHOTO_URL: &str = "https://i.pravatar.cc/150?img=1";

/// Shown when a visit carries no visitor name.
pub const UNKNOWN_VISITOR: &str = "Unknown Visitor";

/// Approval status of a visit as the client understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    Pending,
    Accepted,
    Rejected,
}

impl VisitStatus {
    /// Map a backend status string onto the local status.
    pub fn from_remote(raw: &str) -> Self {
        match raw {
            "granted" | "approved" => VisitStatus::Accepted,
            "rejected" | "denied" => VisitStatus::Rejected,
            _ => VisitStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisitStatus::Pending => "pending",
            VisitStatus::Accepted => "accepted",
            VisitStatus::Rejected => "rejected",
        }
    }
}

/// A visit record as returned by `GET /api/visits/{user_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteVisit {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub visitor_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub visitor_id: Option<i64>,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub detected_label: Option<String>,
}

/// One page of visits.
#[derive(Debug, Deserialize)]
pub struct VisitsPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub visits: Vec<RemoteVisit>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_visits: usize,
}

/// A visit as rendered in the visitor history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub id: String,
    pub visitor_name: String,
    pub photo_url: String,
    pub date: String,
    pub time: String,
    pub status: VisitStatus,
    pub visitor_id: Option<i64>,
    pub owner_id: Option<i64>,
    pub detected_label: Option<String>,
    pub image_url: Option<String>,
}

impl Visit {
    pub fn from_remote(remote: RemoteVisit) -> Self {
        let when = remote
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Local::now);

        let photo_url = remote
            .profile_image_url
            .clone()
            .or_else(|| remote.image_url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| FALLBACK_PHOTO_URL.to_string());

        Self {
            id: remote.id,
            visitor_name: remote
                .visitor_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_VISITOR.to_string()),
            photo_url,
            date: when.format("%Y-%m-%d").to_string(),
            time: when.format("%H:%M").to_string(),
            status: remote
                .status
                .as_deref()
                .map(VisitStatus::from_remote)
                .unwrap_or(VisitStatus::Pending),
            visitor_id: remote.visitor_id,
            owner_id: remote.owner_id,
            detected_label: remote.detected_label,
            image_url: remote.image_url,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == VisitStatus::Pending
    }
}

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one taken as local time.
fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// The visitor request awaiting a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRequest {
    pub id: String,
    pub name: String,
    pub photos: Vec<String>,
}

impl PendingRequest {
    /// Build a request, substituting the placeholder when no photo is known.
    pub fn new(id: impl Into<String>, name: impl Into<String>, photos: Vec<String>) -> Self {
        let photos: Vec<String> = photos.into_iter().filter(|p| !p.is_empty()).collect();
        Self {
            id: id.into(),
            name: name.into(),
            photos: if photos.is_empty() {
                vec![FALLBACK_PHOTO_URL.to_string()]
            } else {
                photos
            },
        }
    }
}

impl From<&Visit> for PendingRequest {
    fn from(visit: &Visit) -> Self {
        PendingRequest::new(
            visit.id.clone(),
            visit.visitor_name.clone(),
            vec![visit.photo_url.clone()],
        )
    }
}

/// The owner's answer to a visitor request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionAction {
    Accept,
    Reject,
}

impl DecisionAction {
    /// Path segment of the approve/deny endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            DecisionAction::Accept => "approve",
            DecisionAction::Reject => "deny",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            DecisionAction::Accept => "approved",
            DecisionAction::Reject => "denied",
        }
    }
}

/// Response body for the approve/deny endpoints.
#[derive(Debug, Deserialize)]
pub struct DecisionResponse {
    pub visit: DecidedVisit,
}

#[derive(Debug, Deserialize)]
pub struct DecidedVisit {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(json: &str) -> RemoteVisit {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(VisitStatus::from_remote("granted"), VisitStatus::Accepted);
        assert_eq!(VisitStatus::from_remote("approved"), VisitStatus::Accepted);
        assert_eq!(VisitStatus::from_remote("denied"), VisitStatus::Rejected);
        assert_eq!(VisitStatus::from_remote("rejected"), VisitStatus::Rejected);
        assert_eq!(VisitStatus::from_remote("pending"), VisitStatus::Pending);
        assert_eq!(VisitStatus::from_remote("unknown"), VisitStatus::Pending);
    }

    #[test]
    fn test_from_remote_full_record() {
        let visit = Visit::from_remote(remote(
            r#"{
                "id": 12,
                "visitor_name": "Dana",
                "profile_image_url": "https://cdn/p.jpg",
                "image_url": "https://cdn/snap.jpg",
                "timestamp": "2024-05-01T14:30:00",
                "status": "approved",
                "visitor_id": 3,
                "owner_id": 1,
                "detected_label": "known"
            }"#,
        ));

        assert_eq!(visit.id, "12");
        assert_eq!(visit.visitor_name, "Dana");
        assert_eq!(visit.photo_url, "https://cdn/p.jpg");
        assert_eq!(visit.date, "2024-05-01");
        assert_eq!(visit.time, "14:30");
        assert_eq!(visit.status, VisitStatus::Accepted);
        assert_eq!(visit.visitor_id, Some(3));
        assert_eq!(visit.image_url.as_deref(), Some("https://cdn/snap.jpg"));
    }

    #[test]
    fn test_from_remote_fallbacks() {
        let visit = Visit::from_remote(remote(r#"{"id": "a1", "image_url": "https://cdn/s.jpg"}"#));
        assert_eq!(visit.visitor_name, UNKNOWN_VISITOR);
        assert_eq!(visit.photo_url, "https://cdn/s.jpg");
        assert_eq!(visit.status, VisitStatus::Pending);

        let bare = Visit::from_remote(remote(r#"{"id": "a2", "visitor_name": ""}"#));
        assert_eq!(bare.visitor_name, UNKNOWN_VISITOR);
        assert_eq!(bare.photo_url, FALLBACK_PHOTO_URL);
        assert_eq!(bare.date.len(), 10);
        assert_eq!(bare.time.len(), 5);
    }

    #[test]
    fn test_visits_page_tolerates_nulls() {
        let page: VisitsPage =
            serde_json::from_str(r#"{"visits": null, "total_visits": null}"#).unwrap();
        assert!(page.visits.is_empty());
        assert_eq!(page.total_visits, 0);

        let page: VisitsPage = serde_json::from_str(r#"{}"#).unwrap();
        assert!(page.visits.is_empty());

        let page: VisitsPage =
            serde_json::from_str(r#"{"visits": [{"id": 1}], "total_visits": 4}"#).unwrap();
        assert_eq!(page.visits.len(), 1);
        assert_eq!(page.total_visits, 4);
    }

    #[test]
    fn test_pending_request_placeholder() {
        let request = PendingRequest::new("9", "Sam", vec![String::new()]);
        assert_eq!(request.photos, vec![FALLBACK_PHOTO_URL.to_string()]);
    }
}
