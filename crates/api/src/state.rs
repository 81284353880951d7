use std::sync::Arc;

use taskkeep_db::{TaskStore, UserStore};

use crate::auth::credentials::CredentialStore;
use crate::auth::jwt::{TokenIssuer, TokenVerifier};
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). Everything in it is
/// read-only after startup; mutable state lives in the stores.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// User records.
    pub users: Arc<dyn UserStore>,
    /// Task records.
    pub tasks: Arc<dyn TaskStore>,
    /// Registration and password login.
    pub credentials: Arc<CredentialStore>,
    /// Signs identity assertions with the configured secret.
    pub issuer: Arc<TokenIssuer>,
    /// Checks identity assertions with the configured secret.
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
    ) -> Self {
        let credentials = CredentialStore::new(Arc::clone(&users), config.password_hashing);
        let issuer = TokenIssuer::new(&config.jwt);
        let verifier = TokenVerifier::new(&config.jwt);

        Self {
            config: Arc::new(config),
            users,
            tasks,
            credentials: Arc::new(credentials),
            issuer: Arc::new(issuer),
            verifier: Arc::new(verifier),
        }
    }

    /// Build state over a single backend serving both users and tasks.
    pub fn with_store<S>(config: ServerConfig, store: Arc<S>) -> Self
    where
        S: UserStore + TaskStore + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let tasks: Arc<dyn TaskStore> = store;
        Self::new(config, users, tasks)
    }
}
