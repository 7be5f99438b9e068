use serde::{Deserialize, Serialize};

/// Claims embedded in the CMS session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // admin email
    pub name: String,
    pub exp: usize,
    pub iat: usize,
}

/// Extracted from a validated session token, available via Axum extractors
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
}
