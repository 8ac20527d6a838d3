use serde::{Deserialize, Serialize};

/// Response of the `accounts:signInWithPassword` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub local_id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: String,
    /// Token lifetime in seconds, sent as a string
    #[serde(default)]
    pub expires_in: String,
}

/// The signed-in user
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub id_token: String,
}

impl CurrentUser {
    /// The marketplace only opens for users with a display name
    pub fn has_display_name(&self) -> bool {
        !self.display_name.trim().is_empty()
    }
}

impl From<SignInResponse> for CurrentUser {
    fn from(response: SignInResponse) -> Self {
        Self {
            uid: response.local_id,
            display_name: response.display_name,
            email: response.email,
            id_token: response.id_token,
        }
    }
}

/// State of the sign-in form
#[derive(Debug, Clone, PartialEq)]
pub enum SignInState {
    /// Waiting for input
    Idle,
    /// Request in flight
    SigningIn,
    /// Sign-in successful
    Success(CurrentUser),
    /// Sign-in failed with error message
    Error(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sign_in_response() {
        let body = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "u1",
            "email": "ada@example.com",
            "displayName": "Ada",
            "idToken": "token",
            "registered": true,
            "refreshToken": "refresh",
            "expiresIn": "3600"
        }"#;
        let response: SignInResponse = serde_json::from_str(body).unwrap();
        let user = CurrentUser::from(response);

        assert_eq!(user.uid, "u1");
        assert_eq!(user.display_name, "Ada");
        assert_eq!(user.id_token, "token");
        assert!(user.has_display_name());
    }

    #[test]
    fn test_missing_display_name() {
        let body = r#"{"localId": "u2", "email": "x@example.com", "idToken": "t"}"#;
        let user = CurrentUser::from(serde_json::from_str::<SignInResponse>(body).unwrap());
        assert!(!user.has_display_name());
    }
}
