//! Session service: the single owner of the persisted principal.
//!
//! Every other surface reads the session through this service instead of
//! touching storage directly; mutations go through one `replace` path and
//! fan out to subscribers over a watch channel.

use std::sync::Arc;

use async_trait::async_trait;
use foodiehub::{Principal, envelope};
use mockall::automock;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    clients::IdentityApi,
    domain::session::{
        SessionServiceError,
        models::{ProfileUpdate, Registration},
    },
    storage::LocalStore,
};

/// Storage key holding the persisted principal.
const USER_KEY: &str = "user";

/// Session service backed by the identity service and a [`LocalStore`].
pub struct StoredSessionService {
    identity: Arc<dyn IdentityApi>,
    store: LocalStore,
    current: watch::Sender<Option<Principal>>,
}

impl StoredSessionService {
    /// Build the service, seeding the session from storage. A corrupt or
    /// missing persisted principal reads as logged out.
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityApi>, store: LocalStore) -> Self {
        let persisted = store.get::<Principal>(USER_KEY);
        let (current, _) = watch::channel(persisted);

        Self {
            identity,
            store,
            current,
        }
    }

    fn replace(&self, principal: Option<Principal>) {
        match &principal {
            Some(principal) => {
                if let Err(error) = self.store.set(USER_KEY, principal) {
                    warn!(%error, "failed to persist session");
                }
            }
            None => self.store.remove(USER_KEY),
        }

        self.current.send_replace(principal);
    }
}

#[async_trait]
impl SessionService for StoredSessionService {
    #[tracing::instrument(name = "session.login", skip(self, password), err)]
    async fn login(&self, email: &str, password: &str) -> Result<Principal, SessionServiceError> {
        let body = self.identity.login(email, password).await?;

        let record = envelope::record(body).ok_or(SessionServiceError::MalformedIdentity)?;
        let principal = Principal::from_wire(&record);

        info!(user = %principal.email, role = %principal.role, "logged in");

        self.replace(Some(principal.clone()));

        Ok(principal)
    }

    #[tracing::instrument(name = "session.register", skip(self, registration), err)]
    async fn register(
        &self,
        registration: Registration,
    ) -> Result<Principal, SessionServiceError> {
        let body = self.identity.add_user(registration.to_wire()).await?;

        let record = envelope::record(body).ok_or(SessionServiceError::MalformedIdentity)?;
        let principal = Principal::from_wire(&record);

        info!(user = %principal.email, "registered account");

        // Registration does not log the new account in; the caller signs in
        // explicitly afterwards.
        Ok(principal)
    }

    #[tracing::instrument(name = "session.update_profile", skip(self, update), err)]
    async fn update_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<Principal, SessionServiceError> {
        let current = self.current().ok_or(SessionServiceError::NotLoggedIn)?;
        let id = current.id.clone().ok_or(SessionServiceError::MissingUserId)?;

        let body = self.identity.update_user(&id, update.to_wire()).await?;

        let mut principal = current;

        if let Some(name) = update.name {
            principal.name = name;
        }

        // Overlay whatever the backend echoed; blank fields keep the stored
        // values so a partial echo cannot wipe the session.
        if let Some(record) = envelope::record(body) {
            let incoming = Principal::from_wire(&record);

            if incoming.id.is_some() {
                principal.id = incoming.id;
            }
            if !incoming.name.trim().is_empty() {
                principal.name = incoming.name;
            }
            if !incoming.email.trim().is_empty() {
                principal.email = incoming.email;
            }
            if record.get("role").is_some() {
                principal.role = incoming.role;
            }
        }

        self.replace(Some(principal.clone()));

        Ok(principal)
    }

    fn logout(&self) {
        info!("logged out");
        self.replace(None);
    }

    fn current(&self) -> Option<Principal> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Principal>> {
        self.current.subscribe()
    }
}

/// Session state: login, registration, logout, and the persisted principal.
#[automock]
#[async_trait]
pub trait SessionService: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<Principal, SessionServiceError>;

    async fn register(&self, registration: Registration)
    -> Result<Principal, SessionServiceError>;

    async fn update_profile(&self, update: ProfileUpdate)
    -> Result<Principal, SessionServiceError>;

    fn logout(&self);

    fn current(&self) -> Option<Principal>;

    fn subscribe(&self) -> watch::Receiver<Option<Principal>>;
}
