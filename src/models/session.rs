//! Session tokens and the per-operation actor context
//!
//! Sign-in, factor enrollment and challenges all happen at the external
//! identity provider; this server only validates the JWT it issued and turns
//! the claims into an explicit [`SessionContext`] that is handed to every
//! core operation. There is no ambient authentication state.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Authenticator assurance level of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssuranceLevel {
    /// Password only
    Aal1,
    /// Password plus a verified second factor
    Aal2,
}

/// JWT claims issued by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Provider subject id
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub aal: AssuranceLevel,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new session token (used by tests and tooling; production
    /// tokens come from the identity provider)
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and validate a session token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Derive the explicit actor context passed to core operations
    pub fn session(&self) -> SessionContext {
        SessionContext {
            actor_id: self.sub.clone(),
            actor_name: self.name.clone().unwrap_or_else(|| self.email.clone()),
            assurance: self.aal,
        }
    }
}

/// Actor identity and assurance level for one operation
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub actor_id: String,
    pub actor_name: String,
    pub assurance: AssuranceLevel,
}

impl SessionContext {
    /// Require a two-factor session (forced lifecycle overrides)
    pub fn require_two_factor(&self) -> Result<(), AppError> {
        if self.assurance == AssuranceLevel::Aal2 {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Two-factor verification required for this operation".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(aal: AssuranceLevel) -> UserClaims {
        UserClaims {
            sub: "user-1".to_string(),
            email: "staff@campusfleet.org".to_string(),
            name: Some("Admin User".to_string()),
            aal,
            exp: chrono::Utc::now().timestamp() + 3600,
            iat: chrono::Utc::now().timestamp(),
        }
    }

    #[test]
    fn token_round_trip() {
        let claims = claims(AssuranceLevel::Aal2);
        let token = claims.create_token("test-secret").unwrap();
        let parsed = UserClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(parsed.sub, "user-1");
        assert_eq!(parsed.aal, AssuranceLevel::Aal2);
    }

    #[test]
    fn token_rejects_wrong_secret() {
        let token = claims(AssuranceLevel::Aal1).create_token("test-secret").unwrap();
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn two_factor_guard() {
        assert!(claims(AssuranceLevel::Aal2).session().require_two_factor().is_ok());
        assert!(claims(AssuranceLevel::Aal1).session().require_two_factor().is_err());
    }
}
