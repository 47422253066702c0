use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::principal::{Identity, Principal};

/// Lifetime of every issued token.
pub const TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token generation failed: {0}")]
    Generation(String),
}

/// Wire claims. Exactly one of the two claim sets is written at issuance;
/// both are accepted on verification with the admin set taking precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_logado_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_logado_nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_logado_nivel: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_logado_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_logado_nome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_logado_nivel: Option<i32>,

    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn for_principal(principal: &Principal, issued_at: DateTime<Utc>) -> Self {
        let exp = (issued_at + Duration::hours(TOKEN_TTL_HOURS)).timestamp();
        let identity = principal.identity();
        let mut claims = Claims {
            iat: issued_at.timestamp(),
            exp,
            ..Default::default()
        };

        match principal {
            Principal::Admin(_) => {
                claims.admin_logado_id = Some(identity.id.to_string());
                claims.admin_logado_nome = Some(identity.name.clone());
                claims.admin_logado_nivel = Some(identity.level);
            }
            Principal::Customer(_) => {
                claims.user_logado_id = Some(identity.id.to_string());
                claims.user_logado_nome = Some(identity.name.clone());
                claims.user_logado_nivel = Some(identity.level);
            }
        }

        claims
    }

    /// Fold the claim sets into a single principal.
    pub fn into_principal(self) -> Result<Principal, TokenError> {
        if let Some(id) = self.admin_logado_id {
            let identity = identity(&id, self.admin_logado_nome, self.admin_logado_nivel)?;
            return Ok(Principal::Admin(identity));
        }
        if let Some(id) = self.user_logado_id {
            let identity = identity(&id, self.user_logado_nome, self.user_logado_nivel)?;
            return Ok(Principal::Customer(identity));
        }
        Err(TokenError::Malformed("no principal claims".to_string()))
    }
}

fn identity(id: &str, name: Option<String>, level: Option<i32>) -> Result<Identity, TokenError> {
    let id = Uuid::parse_str(id).map_err(|_| TokenError::Malformed(format!("invalid id claim: {}", id)))?;
    Ok(Identity {
        id,
        name: name.unwrap_or_default(),
        level: level.unwrap_or_default(),
    })
}

/// Signs and verifies HS256 tokens with the process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, principal: &Principal) -> Result<String, TokenError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issue a token as if it had been created at `issued_at`.
    pub fn issue_at(&self, principal: &Principal, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::for_principal(principal, issued_at);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Generation(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Principal, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        data.claims.into_principal()
    }
}
