//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Fetches run on worker threads (see `fetcher`); their completions are
//! drained by the event loop and applied as ordinary messages, so all state
//! mutation happens on the event-loop thread.

mod effects;
mod event_loop;
mod fetcher;
mod input;
mod model;
mod update;

pub use model::{Focus, Model, ToastLevel};
pub use update::{Message, update};

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    api_key: String,
    endpoint: Option<String>,
    per_page: Option<u32>,
    initial_query: Option<String>,
    images_enabled: bool,
    force_half_cell: bool,
    config_global_path: Option<std::path::PathBuf>,
    config_local_path: Option<std::path::PathBuf>,
}

impl App {
    /// Create a new application with the given remote API key.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            endpoint: None,
            per_page: None,
            initial_query: None,
            images_enabled: true,
            force_half_cell: false,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Override the remote API endpoint.
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Override the remote page size.
    pub const fn with_per_page(mut self, per_page: Option<u32>) -> Self {
        self.per_page = per_page;
        self
    }

    /// Submit a query as soon as the app starts.
    pub fn with_initial_query(mut self, query: Option<String>) -> Self {
        self.initial_query = query;
        self
    }

    /// Enable or disable inline thumbnail rendering.
    pub const fn with_images_enabled(mut self, enabled: bool) -> Self {
        self.images_enabled = enabled;
        self
    }

    /// Force half-cell thumbnail rendering, bypassing protocol detection.
    pub const fn with_force_half_cell(mut self, force: bool) -> Self {
        self.force_half_cell = force;
        self
    }

    /// Record the config paths for display in the help overlay.
    pub fn with_config_paths(
        mut self,
        global: Option<std::path::PathBuf>,
        local: Option<std::path::PathBuf>,
    ) -> Self {
        self.config_global_path = global;
        self.config_local_path = local;
        self
    }
}

#[cfg(test)]
mod tests;
