//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    clients::{HttpDriversClient, HttpIdentityClient, HttpMenuClient, HttpOrdersClient},
    config::AppConfig,
    domain::{
        carts::{CartsService, LocalCartsService, OrderSubmitter},
        dispatch::{DispatchService, RemoteDispatchService},
        menus::{MenusService, RemoteMenusService},
        orders::{OrdersService, RemoteOrdersService},
        reviews::{LocalReviewsService, ReviewsService},
        session::{SessionService, StoredSessionService},
        users::{RemoteUsersService, UsersService},
    },
    storage::{LocalStore, StorageError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open local state directory")]
    Storage(#[source] StorageError),

    #[error("failed to build HTTP client")]
    Http(#[source] reqwest::Error),
}

/// The injected service graph every surface works against.
///
/// Built once at startup; components receive the context instead of
/// constructing clients or touching storage themselves.
#[derive(Clone)]
pub struct AppContext {
    pub session: Arc<dyn SessionService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub dispatch: Arc<dyn DispatchService>,
    pub menus: Arc<dyn MenusService>,
    pub users: Arc<dyn UsersService>,
    pub reviews: Arc<dyn ReviewsService>,
}

impl AppContext {
    /// Wire the real clients and stores from configuration.
    ///
    /// Must run inside a Tokio runtime: the cart's order submitter spawns
    /// its delivery worker on the current runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when the state directory cannot be created or the
    /// HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let store = LocalStore::open(&config.storage.state_dir).map_err(AppInitError::Storage)?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(AppInitError::Http)?;

        let identity = Arc::new(HttpIdentityClient::new(
            http.clone(),
            config.backends.identity_url.clone(),
        ));
        // Drivers live on the identity service host.
        let drivers = Arc::new(HttpDriversClient::new(
            http.clone(),
            config.backends.identity_url.clone(),
        ));
        let menu = Arc::new(HttpMenuClient::new(
            http.clone(),
            config.backends.menu_url.clone(),
        ));
        let orders_api = Arc::new(HttpOrdersClient::new(
            http,
            config.backends.orders_url.clone(),
        ));

        let session: Arc<dyn SessionService> =
            Arc::new(StoredSessionService::new(identity.clone(), store.clone()));

        let submitter = OrderSubmitter::spawn(orders_api.clone());
        let carts = Arc::new(LocalCartsService::new(
            store.clone(),
            Arc::clone(&session),
            submitter,
        ));

        Ok(Self {
            session,
            carts,
            orders: Arc::new(RemoteOrdersService::new(orders_api.clone())),
            dispatch: Arc::new(RemoteDispatchService::new(orders_api, drivers)),
            menus: Arc::new(RemoteMenusService::new(menu)),
            users: Arc::new(RemoteUsersService::new(identity)),
            reviews: Arc::new(LocalReviewsService::new(store)),
        })
    }
}
