// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchSession)
    clippy::module_name_repetitions
)]

//! # Pixseek
//!
//! A terminal image search gallery.
//!
//! Pixseek queries the Pixabay API and shows the results as a thumbnail
//! grid in the terminal:
//! - Inline thumbnails (Kitty, Sixel, iTerm2, half-block fallback)
//! - Pagination with a load-more gesture
//! - Toast notifications for search outcomes
//! - Opens the full-size image in the system browser
//!
//! ## Architecture
//!
//! Pixseek uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`search`]: Search session state and pagination
//! - [`remote`]: Pixabay API client
//! - [`image`]: Thumbnail decoding and caching
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved flag defaults
//! - [`perf`]: Startup and render instrumentation

pub mod app;
pub mod config;
pub mod image;
pub mod perf;
pub mod remote;
pub mod search;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::remote::{PixabayClient, SearchBackend};
    pub use crate::search::{SearchSession, SessionEvent};
}
