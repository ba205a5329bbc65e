use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;

use crate::app::fetcher::Fetcher;
use crate::image::ThumbCache;
use crate::search::{FetchRequest, SearchSession};
use crate::ui;

/// Toast auto-dismiss interval.
const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The query input bar.
    Search,
    /// The thumbnail grid.
    Gallery,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The active search session (query, results, pagination).
    pub session: SearchSession,
    /// Text in the query input bar; submitted on Enter.
    pub input: String,
    /// Which pane receives keystrokes.
    pub focus: Focus,
    /// Index of the selected record in `session.items()`.
    pub selected: usize,
    /// First visible grid row.
    pub scroll_row: usize,
    toast: Option<Toast>,
    /// Fetch queued by the last update, awaiting dispatch by the app layer.
    pending_fetch: Option<FetchRequest>,
    /// Image picker for terminal rendering.
    pub picker: Option<Picker>,
    /// Render protocols for fetched thumbnails, keyed by record id.
    /// Stores (protocol, `width_cols`, `height_rows`).
    pub thumb_protocols: HashMap<String, (StatefulProtocol, u16, u16)>,
    /// Thumbnail URLs with a download in flight.
    pub thumbs_pending: HashSet<String>,
    /// Whether inline thumbnails are enabled.
    pub images_enabled: bool,
    /// Whether help overlay is visible.
    pub help_visible: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Terminal size (columns, rows).
    pub terminal_size: (u16, u16),
    /// Global config path shown in the help overlay.
    pub config_global_path: Option<PathBuf>,
    /// Local override config path shown in the help overlay.
    pub config_local_path: Option<PathBuf>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("query", &self.session.query())
            .field("items", &self.session.items().len())
            .field("focus", &self.focus)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a new model with default settings.
    pub fn new(terminal_size: (u16, u16)) -> Self {
        Self {
            session: SearchSession::new(),
            input: String::new(),
            focus: Focus::Search,
            selected: 0,
            scroll_row: 0,
            toast: None,
            pending_fetch: None,
            picker: None,
            thumb_protocols: HashMap::new(),
            thumbs_pending: HashSet::new(),
            images_enabled: true,
            help_visible: false,
            should_quit: false,
            terminal_size,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Set the image picker.
    #[must_use]
    pub fn with_picker(mut self, picker: Option<Picker>) -> Self {
        self.picker = picker;
        self
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    pub(super) fn queue_fetch(&mut self, request: Option<FetchRequest>) {
        if request.is_some() {
            self.pending_fetch = request;
        }
    }

    /// Take the fetch queued by the last update, if any.
    pub fn take_pending_fetch(&mut self) -> Option<FetchRequest> {
        self.pending_fetch.take()
    }

    #[cfg(test)]
    pub(super) const fn has_pending_fetch(&self) -> bool {
        self.pending_fetch.is_some()
    }

    /// Columns in the thumbnail grid at the current terminal width.
    pub fn grid_cols(&self) -> usize {
        ui::gallery_cols(self.terminal_size.0)
    }

    /// Grid rows visible at the current terminal height.
    pub fn grid_rows(&self) -> usize {
        ui::gallery_rows(self.terminal_size.1)
    }

    /// Keep `selected` inside the item list and `scroll_row` on screen.
    pub(super) fn clamp_selection(&mut self) {
        let count = self.session.items().len();
        if count == 0 {
            self.selected = 0;
            self.scroll_row = 0;
            return;
        }
        self.selected = self.selected.min(count - 1);
        self.scroll_selection_into_view();
    }

    pub(super) fn scroll_selection_into_view(&mut self) {
        let cols = self.grid_cols();
        let rows = self.grid_rows();
        let selected_row = self.selected / cols;
        if selected_row < self.scroll_row {
            self.scroll_row = selected_row;
        } else if selected_row >= self.scroll_row + rows {
            self.scroll_row = selected_row + 1 - rows;
        }
    }

    /// Item indices currently on screen.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let cols = self.grid_cols();
        let rows = self.grid_rows();
        let start = (self.scroll_row * cols).min(self.session.items().len());
        let end = (start + rows * cols).min(self.session.items().len());
        start..end
    }

    /// Drop all thumbnail render state (new query or discarded search).
    pub(super) fn clear_thumbs(&mut self) {
        self.thumb_protocols.clear();
        self.thumbs_pending.clear();
    }

    /// Prepare protocols for visible thumbnails, downloading any that are
    /// missing from the cache.
    ///
    /// Decoded images come from `cache`; URLs not yet cached are dispatched
    /// through `fetcher` at most once.
    pub fn load_visible_thumbs(&mut self, cache: &ThumbCache, fetcher: &Fetcher) {
        if !self.images_enabled {
            return;
        }
        let Some(picker) = &self.picker else { return };

        let font_size = picker.font_size();
        let use_halfblocks = matches!(picker.protocol_type(), ProtocolType::Halfblocks);
        let target_cols = ui::THUMB_IMAGE_COLS;
        let target_rows = ui::THUMB_IMAGE_ROWS;
        let target_width_px = u32::from(target_cols) * u32::from(font_size.0);
        let target_height_px = u32::from(target_rows) * u32::from(font_size.1);

        let visible: Vec<_> = self.session.items()[self.visible_range()]
            .iter()
            .map(|record| (record.id.clone(), record.thumbnail_url.clone()))
            .collect();
        crate::perf::log_event(
            "thumb.load_visible",
            format!(
                "rows={}.. candidates={} cached={}",
                self.scroll_row,
                visible.len(),
                cache.len()
            ),
        );

        for (id, url) in visible {
            if self.thumb_protocols.contains_key(&id) {
                continue;
            }
            if let Some(img) = cache.get(&url) {
                let scaled = img.resize(
                    target_width_px,
                    target_height_px,
                    if use_halfblocks {
                        image::imageops::FilterType::CatmullRom
                    } else {
                        image::imageops::FilterType::Nearest
                    },
                );
                let protocol = picker.new_resize_protocol(scaled);
                self.thumb_protocols
                    .insert(id, (protocol, target_cols, target_rows));
            } else if !self.thumbs_pending.contains(&url) {
                self.thumbs_pending.insert(url.clone());
                fetcher.dispatch_thumbnail(url);
            }
        }
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new((80, 24))
    }
}
