//! Shared application state for all routes.

use crate::service::CustomerService;
use crate::store::CustomerStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub customers: CustomerService,
}

impl AppState {
    pub fn new(store: Arc<dyn CustomerStore>) -> Self {
        AppState {
            customers: CustomerService::new(store),
        }
    }
}
