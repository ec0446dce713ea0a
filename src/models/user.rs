use serde::{Deserialize, Serialize};

/// Identifier of a user in the external user directory.
pub type UserId = i64;

/// Public profile of a user as exposed by the user directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub avatar: Option<String>,
}

/// JWT claims issued for an authenticated user
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Identity of the caller, inserted into request extensions by the auth middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);
