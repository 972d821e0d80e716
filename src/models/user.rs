//! Authenticated user model and the auth endpoint payloads.

use serde::{Deserialize, Serialize};

use super::string_or_number;

/// The logged-in account. At most one is resident at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub access_token: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response body for a successful login.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub access_token: String,
}

impl From<LoginResponse> for User {
    fn from(resp: LoginResponse) -> Self {
        Self {
            id: resp.user_id,
            name: resp.name,
            email: resp.email,
            access_token: resp.access_token,
        }
    }
}

/// Request body for `POST /api/auth/register`.
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Request body for `POST /api/auth/change-password`.
#[derive(Debug, Serialize)]
pub struct ChangePasswordRequest<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_accepts_numeric_id() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"user_id": 42, "name": "A", "email": "a@b.com", "access_token": "tok"}"#,
        )
        .unwrap();
        let user = User::from(resp);
        assert_eq!(user.id, "42");
        assert_eq!(user.access_token, "tok");
    }

    #[test]
    fn test_login_response_requires_token() {
        let parsed = serde_json::from_str::<LoginResponse>(
            r#"{"user_id": "1", "name": "A", "email": "a@b.com"}"#,
        );
        assert!(parsed.is_err());
    }
}
