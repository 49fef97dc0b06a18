//! Response DTOs for the auth endpoints

use serde::{Deserialize, Serialize};

use crate::entities::UserInfo;

/// Successful login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserInfo,
}

/// Body of the token renewal call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Successful token renewal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}
