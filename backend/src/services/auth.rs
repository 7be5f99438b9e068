use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    config::Config,
    models::auth::{AdminSession, Claims, LoginResponse, SessionUser},
};

pub struct AuthService;

impl AuthService {
    /// Check the submitted credentials against the configured admin account
    /// and issue a session token.
    pub fn login(config: &Config, email: &str, password: &str) -> anyhow::Result<LoginResponse> {
        if email.trim() != config.admin_email || password != config.admin_password {
            anyhow::bail!("Identifiants invalides");
        }

        let token = Self::issue_token(
            &config.admin_email,
            &config.admin_name,
            &config.session_secret,
            config.session_max_age_seconds,
        )?;

        Ok(LoginResponse {
            token,
            expires_in: config.session_max_age_seconds,
            user: SessionUser {
                id: "1".into(),
                name: config.admin_name.clone(),
                email: config.admin_email.clone(),
            },
        })
    }

    pub fn issue_token(email: &str, name: &str, secret: &str, ttl_seconds: u64) -> anyhow::Result<String> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: email.to_string(),
            name: name.to_string(),
            iat: now,
            exp: now + ttl_seconds as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    pub fn decode_token(token: &str, secret: &str) -> anyhow::Result<AdminSession> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let claims = decode::<Claims>(token, &key, &validation)?.claims;
        Ok(AdminSession { email: claims.sub, name: claims.name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let token = AuthService::issue_token("admin@oninvite.fr", "Admin", "s3cret", 3600).unwrap();
        let session = AuthService::decode_token(&token, "s3cret").unwrap();
        assert_eq!(session.email, "admin@oninvite.fr");
        assert!(AuthService::decode_token(&token, "other").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims { sub: "a@b.c".into(), name: "A".into(), iat: now - 7200, exp: now - 3600 };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"k")).unwrap();
        assert!(AuthService::decode_token(&token, "k").is_err());
    }
}
