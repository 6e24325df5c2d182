use std::sync::Arc;

use api::auth::OAuthBridge;
use api::db::UserStore;

use crate::error::AppError;
use crate::views::Views;

/// Everything a handler needs, passed to the router as state.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn UserStore>,
    pub oauth: Arc<OAuthBridge>,
    pub views: Arc<Views>,
}

impl AppContext {
    pub fn new(store: Arc<dyn UserStore>, oauth: OAuthBridge) -> Result<Self, AppError> {
        Ok(Self {
            store,
            oauth: Arc::new(oauth),
            views: Arc::new(Views::new()?),
        })
    }
}
