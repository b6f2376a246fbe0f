//! JWT signature and expiry verification.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use lifeshare_core::config::AuthConfig;
use lifeshare_core::error::AppError;
use lifeshare_core::result::AppResult;

use super::claims::Claims;

/// Validates identity tokens signed with the shared HS256 secret.
#[derive(Clone)]
pub struct JwtDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates a bearer token string.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "Rejected identity token");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidToken => {
                    AppError::authentication("Invalid token format")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::authentication("Invalid token signature")
                }
                _ => AppError::authentication(format!("Token validation failed: {e}")),
            }
        })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    use lifeshare_core::error::ErrorKind;
    use lifeshare_core::types::{HospitalId, UserId};
    use lifeshare_entity::user::{StaffRole, UserRole};

    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            leeway_seconds: 0,
        }
    }

    fn mint(secret: &str, exp_offset: Duration) -> (Claims, String) {
        let now = Utc::now();
        let claims = Claims {
            sub: UserId::new(),
            role: UserRole::HospitalStaff,
            hospital_id: Some(HospitalId::new()),
            staff_role: Some(StaffRole::Supervisor),
            iat: now.timestamp(),
            exp: (now + exp_offset).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();
        (claims, token)
    }

    #[test]
    fn test_decodes_valid_token() {
        let (claims, token) = mint("test-secret", Duration::minutes(10));
        let decoded = JwtDecoder::new(&config()).decode(&token).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.role, UserRole::HospitalStaff);
        assert_eq!(decoded.hospital_id, claims.hospital_id);
        assert_eq!(decoded.staff_role, Some(StaffRole::Supervisor));
        assert!(!decoded.is_expired());
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let (_, token) = mint("other-secret", Duration::minutes(10));
        let err = JwtDecoder::new(&config()).decode(&token).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_rejects_expired_token() {
        let (_, token) = mint("test-secret", Duration::minutes(-10));
        let err = JwtDecoder::new(&config()).decode(&token).unwrap_err();
        assert_eq!(err.message, "Token has expired");
    }

    #[test]
    fn test_rejects_garbage() {
        let err = JwtDecoder::new(&config()).decode("not-a-token").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
