// app_state.rs

use std::sync::Arc;

use crate::repositories::{
    InMemoryMessageStore, InMemoryUserDirectory, MessageStore, UserDirectory,
};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Message log shared by every request
    pub store: Arc<dyn MessageStore>,
    /// External user directory
    pub users: Arc<dyn UserDirectory>,
    /// HS256 key used to verify bearer tokens
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// Creates a new instance of AppState
    ///
    /// # Arguments
    /// * `store` - Message store backend
    /// * `users` - User directory backend
    /// * `jwt_secret` - Secret shared with the token issuer
    pub fn new(
        store: Arc<dyn MessageStore>,
        users: Arc<dyn UserDirectory>,
        jwt_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            store,
            users,
            jwt_secret: jwt_secret.into(),
        }
    }

    /// State backed by empty in-memory stores
    pub fn in_memory(jwt_secret: impl Into<Arc<str>>) -> Self {
        Self::new(
            Arc::new(InMemoryMessageStore::new()),
            Arc::new(InMemoryUserDirectory::new()),
            jwt_secret,
        )
    }
}
