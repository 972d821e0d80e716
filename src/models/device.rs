//! Push-device registration payloads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mobile platform reported alongside a push token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatform {
    Android,
    Ios,
}

impl DevicePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            DevicePlatform::Android => "android",
            DevicePlatform::Ios => "ios",
        }
    }
}

impl fmt::Display for DevicePlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DevicePlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(DevicePlatform::Android),
            "ios" => Ok(DevicePlatform::Ios),
            other => Err(format!("unknown platform: {}", other)),
        }
    }
}

/// Body for `POST /api/device/register` and `POST /api/devices/unregister`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRegistration {
    pub owner_id: String,
    pub push_token: String,
    pub platform: DevicePlatform,
}

/// Response of `GET /api/notifications/status/{owner_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotificationStatus {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub notifications_enabled: bool,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub registered_devices: usize,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub devices: Vec<serde_json::Value>,
}

/// Body for `POST /api/notifications/raspberry-pi/visitor-detected`, the
/// event the door camera sends when it sees someone.
#[derive(Debug, Serialize)]
pub struct VisitorDetection<'a> {
    pub owner_id: i64,
    pub visitor_name: &'a str,
    pub image_url: &'a str,
    pub detected_label: &'a str,
}
