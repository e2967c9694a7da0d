//! HTTP client for the remote authentication service

use url::Url;

use crate::error::AuthError;
use crate::types::{Credentials, SignInData, SignInEnvelope, VerifiedUser, VerifyEnvelope};
use crate::Result;

const SIGNIN_PATH: &str = "/api/v1/auth/signin";
const VERIFY_PATH: &str = "/api/v1/auth/verifytoken";

const STATUS_SUCCESS: &str = "success";

pub struct AuthClient {
    client: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    /// No timeout is set here: the caller-side channel failure is the only
    /// abort signal, matching the messaging model of the rest of the
    /// extension.
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AuthError::Malformed(format!("Invalid endpoint URL: {e}")))
    }

    /// Exchange credentials for a session record.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SignInData> {
        let url = self.endpoint(SIGNIN_PATH)?;

        tracing::debug!(email = %credentials.email, "Signing in");

        let resp = self.client.post(url).json(credentials).send().await?;

        let envelope: SignInEnvelope = resp
            .json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))?;

        if envelope.status != STATUS_SUCCESS {
            return Err(AuthError::Rejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Sign-in failed".to_string()),
            });
        }

        envelope
            .data
            .ok_or_else(|| AuthError::Malformed("Success response without data".to_string()))
    }

    /// Check a stored bearer credential against the remote.
    pub async fn verify_token(&self, token: &str) -> Result<VerifiedUser> {
        let url = self.endpoint(VERIFY_PATH)?;

        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;

        let envelope: VerifyEnvelope = resp
            .json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))?;

        if envelope.status != STATUS_SUCCESS {
            return Err(AuthError::Rejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "Token verification failed".to_string()),
            });
        }

        envelope
            .user
            .ok_or_else(|| AuthError::Malformed("Success response without user".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> AuthClient {
        AuthClient::new(Url::parse(&server.uri()).unwrap())
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "a@b.com".to_string(),
            password: "Valid1!x".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/signin"))
            .and(body_json(json!({"email": "a@b.com", "password": "Valid1!x"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"token": "T1", "email": "a@b.com", "name": "A", "role": "doctor"}
            })))
            .mount(&server)
            .await;

        let data = client_for(&server).sign_in(&credentials()).await.unwrap();
        assert_eq!(data.token, "T1");
        assert_eq!(data.role, "doctor");
    }

    #[tokio::test]
    async fn test_sign_in_remote_rejection_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/signin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "message": "Invalid credentials"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .sign_in(&credentials())
            .await
            .unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "Invalid credentials");
    }

    #[tokio::test]
    async fn test_sign_in_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/signin"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .sign_in(&credentials())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_verify_sends_bearer_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/verifytoken"))
            .and(header("authorization", "Bearer T1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "user": {"email": "a@b.com", "name": "A"}
            })))
            .mount(&server)
            .await;

        let user = client_for(&server).verify_token("T1").await.unwrap();
        assert_eq!(user.email, "a@b.com");
        assert_eq!(user.name, "A");
    }

    #[tokio::test]
    async fn test_verify_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/auth/verifytoken"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"status": "error"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).verify_token("T1").await.unwrap_err();
        assert!(err.is_rejection());
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_transport() {
        // A server that is no longer listening.
        let server = MockServer::start().await;
        let client = client_for(&server);
        drop(server);

        let err = client.sign_in(&credentials()).await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
    }
}
