//! Push-device endpoints.

use serde_json::Value;

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{DeviceRegistration, NotificationStatus, VisitorDetection};

impl ApiClient {
    /// POST /api/device/register
    pub async fn register_device(
        &self,
        access_token: &str,
        registration: &DeviceRegistration,
    ) -> Result<(), ClientError> {
        let request = self
            .http
            .post(self.url("/api/device/register"))
            .bearer_auth(access_token)
            .json(registration);
        let _: Value = self.send(request).await?;
        Ok(())
    }

    /// POST /api/devices/unregister
    pub async fn unregister_device(
        &self,
        access_token: &str,
        registration: &DeviceRegistration,
    ) -> Result<(), ClientError> {
        let request = self
            .http
            .post(self.url("/api/devices/unregister"))
            .bearer_auth(access_token)
            .json(registration);
        let _: Value = self.send(request).await?;
        Ok(())
    }

    /// GET /api/notifications/status/{owner_id}
    pub async fn notification_status(
        &self,
        access_token: &str,
        owner_id: &str,
    ) -> Result<NotificationStatus, ClientError> {
        let request = self
            .http
            .get(self.url(&format!("/api/notifications/status/{}", owner_id)))
            .bearer_auth(access_token);
        self.send(request).await
    }

    /// POST /api/notify/test/{owner_id}
    pub async fn send_test_notification(
        &self,
        access_token: &str,
        owner_id: &str,
    ) -> Result<(), ClientError> {
        let request = self
            .http
            .post(self.url(&format!("/api/notify/test/{}", owner_id)))
            .bearer_auth(access_token);
        let _: Value = self.send(request).await?;
        Ok(())
    }

    /// POST /api/notifications/raspberry-pi/visitor-detected
    #[tracing::instrument(skip(self, access_token))]
    pub async fn report_visitor_detected(
        &self,
        access_token: &str,
        detection: &VisitorDetection<'_>,
    ) -> Result<(), ClientError> {
        let request = self
            .http
            .post(self.url("/api/notifications/raspberry-pi/visitor-detected"))
            .bearer_auth(access_token)
            .json(detection);
        let _: Value = self.send(request).await?;
        Ok(())
    }
}
