use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::Role;
use crate::error::{AppError, Result};

/// The authenticated caller, as attested by the external identity
/// provider. The core trusts this tuple as given and passes it
/// explicitly into every service call; there is no ambient auth state.
#[derive(Debug, Clone, Copy)]
pub struct AuthPrincipal {
    pub member_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Uuid,
    role: Role,
    #[allow(dead_code)]
    exp: usize,
}

/// Verifies bearer tokens issued by the identity provider. Issuance,
/// credential checks and password handling all live outside this
/// service; we only share the HS256 secret.
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthService {
    pub fn new(token_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(token_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify_token(&self, token: &str) -> Result<AuthPrincipal> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| AppError::Unauthorized)?;

        Ok(AuthPrincipal {
            member_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}
