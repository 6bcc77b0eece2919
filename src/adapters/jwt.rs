//! HS256 bearer-token validation.

use crate::ports::auth::{AuthError, TokenValidator};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

pub struct JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenValidator for JwtValidator {
    fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::debug!("JWT validation failed: {}", e);
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AuthError::InvalidToken("token has expired".to_string())
                }
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        exp: i64,
    }

    fn token(secret: &str, sub: &str, exp: i64) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &TestClaims { sub, exp },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_valid_token() {
        let user = Uuid::new_v4();
        let validator = JwtValidator::new("secret");
        let token = token("secret", &user.to_string(), in_one_hour());
        assert_eq!(validator.validate(&token).unwrap(), user);
    }

    #[test]
    fn test_wrong_secret() {
        let validator = JwtValidator::new("secret");
        let token = token("other", &Uuid::new_v4().to_string(), in_one_hour());
        assert!(matches!(
            validator.validate(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let validator = JwtValidator::new("secret");
        let expired = chrono::Utc::now().timestamp() - 60;
        let token = token("secret", &Uuid::new_v4().to_string(), expired);
        assert!(matches!(
            validator.validate(&token),
            Err(AuthError::InvalidToken(msg)) if msg == "token has expired"
        ));
    }

    #[test]
    fn test_subject_must_be_uuid() {
        let validator = JwtValidator::new("secret");
        let token = token("secret", "alice", in_one_hour());
        assert!(matches!(
            validator.validate(&token),
            Err(AuthError::InvalidSubject)
        ));
    }

    #[test]
    fn test_garbage() {
        let validator = JwtValidator::new("secret");
        assert!(validator.validate("not-a-jwt").is_err());
    }
}
