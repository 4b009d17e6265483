// Application state module
// Shared, read-only state handed to every connection

use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::api::Api;

/// Application state
///
/// Built once before the listener starts; the API inside is immutable.
pub struct AppState {
    pub config: Config,
    pub api: Api,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub const fn new(config: Config, api: Api) -> Self {
        Self {
            config,
            api,
            active_connections: AtomicUsize::new(0),
        }
    }
}
