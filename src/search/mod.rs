//! Search session state and pagination logic.
//!
//! A [`SearchSession`] owns everything the gallery needs to know about the
//! active query: the accumulated results, the next page to request, the
//! remote source's total hit count, and the loading/error flags. All
//! transitions are pure; fetch dispatch and notification display happen in
//! the app layer, driven by the [`FetchRequest`]s and [`SessionEvent`]s
//! these methods return.

/// A single image result, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Remote identity of the record.
    pub id: String,
    /// Comma-separated tag string supplied by the remote source.
    pub tags: String,
    /// URL of the thumbnail-sized rendition.
    pub thumbnail_url: String,
    /// URL of the full-size rendition.
    pub full_image_url: String,
}

/// One page of results as reported by the remote source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub hits: Vec<ImageRecord>,
    /// Total matching records for the query, independent of pagination.
    pub total_hits: u64,
}

/// A fetch the session wants dispatched.
///
/// Carries the generation it was issued for; completions must hand the same
/// generation back to [`SearchSession::apply_page`] /
/// [`SearchSession::apply_failure`] so stale arrivals can be discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub query: String,
    /// 1-based page index into the remote result set.
    pub page: u64,
    pub generation: u64,
}

/// Published whenever a fetch completion is applied to the session.
///
/// The app layer subscribes to these to drive toasts and re-rendering,
/// keeping state transitions decoupled from presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// First page of a query landed; `total` is the remote hit count.
    FirstPage { total: u64 },
    /// A follow-up page was appended to the existing results.
    PageAppended,
    /// The query succeeded but matched nothing.
    NoMatches,
    /// The remote source failed; the session discarded the search.
    Failed { message: String },
    /// The completion belonged to a superseded generation and was ignored.
    Stale,
}

/// Lifecycle phase of the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No active search.
    Idle,
    /// A fetch for the current (query, page) is outstanding.
    Loading,
    /// At least one page of results is on screen.
    Ready,
    /// The query matched nothing.
    Empty,
    /// The remote source failed.
    Failed,
}

/// State for one search box / result gallery pairing.
#[derive(Debug, Clone)]
pub struct SearchSession {
    query: String,
    items: Vec<ImageRecord>,
    page: u64,
    total_hits: u64,
    loading: bool,
    error: bool,
    // Distinguishes Empty from Failed in phase(); both set `error`.
    remote_failure: bool,
    generation: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            items: Vec::new(),
            page: 1,
            total_hits: 0,
            loading: false,
            error: false,
            remote_failure: false,
            generation: 0,
        }
    }

    /// The active search term; empty means no active search.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Results accumulated across pages for the current query.
    pub fn items(&self) -> &[ImageRecord] {
        &self.items
    }

    /// Next/current 1-based page.
    pub const fn page(&self) -> u64 {
        self.page
    }

    /// Total matching records reported by the remote source.
    pub const fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn has_error(&self) -> bool {
        self.error
    }

    /// Generation token carried by the most recent fetch request.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error {
            if self.remote_failure {
                Phase::Failed
            } else {
                Phase::Empty
            }
        } else if self.items.is_empty() {
            Phase::Idle
        } else {
            Phase::Ready
        }
    }

    /// Whether more pages remain to be fetched for the current query.
    ///
    /// Gates the "load more" control: some results are on screen, fewer than
    /// the remote total, and no fetch is currently outstanding.
    pub fn can_load_more(&self) -> bool {
        !self.loading && !self.items.is_empty() && (self.items.len() as u64) < self.total_hits
    }

    /// Start a new search for `text`.
    ///
    /// Always restarts from page 1 with cleared results, even when `text`
    /// matches the previous query. Returns the fetch to dispatch, or `None`
    /// when `text` is empty; an empty query resets the session without
    /// triggering a fetch.
    pub fn submit(&mut self, text: &str) -> Option<FetchRequest> {
        self.query = text.to_string();
        self.items.clear();
        self.total_hits = 0;
        self.page = 1;
        self.error = false;
        self.remote_failure = false;
        self.generation += 1;

        if self.query.is_empty() {
            self.loading = false;
            return None;
        }
        self.loading = true;
        Some(FetchRequest {
            query: self.query.clone(),
            page: 1,
            generation: self.generation,
        })
    }

    /// Advance to the next page of the current query.
    ///
    /// Returns `None` unless [`can_load_more`](Self::can_load_more) holds.
    pub fn load_more(&mut self) -> Option<FetchRequest> {
        if !self.can_load_more() {
            return None;
        }
        self.page += 1;
        self.generation += 1;
        self.loading = true;
        Some(FetchRequest {
            query: self.query.clone(),
            page: self.page,
            generation: self.generation,
        })
    }

    /// Apply a successful fetch completion.
    ///
    /// Completions carrying a generation older than the session's are
    /// discarded: a newer `submit`/`load_more` has superseded them.
    pub fn apply_page(&mut self, generation: u64, result: PageResult) -> SessionEvent {
        if generation != self.generation {
            return SessionEvent::Stale;
        }

        if result.total_hits == 0 {
            self.error = true;
            self.remote_failure = false;
            self.loading = false;
            return SessionEvent::NoMatches;
        }

        self.items.extend(result.hits);
        self.total_hits = result.total_hits;
        self.error = false;
        self.remote_failure = false;
        let event = if self.page == 1 {
            SessionEvent::FirstPage {
                total: result.total_hits,
            }
        } else {
            SessionEvent::PageAppended
        };
        self.loading = false;
        event
    }

    /// Apply a failed fetch completion.
    ///
    /// The failed search is fully discarded (accumulated items, total and
    /// page all reset) but the query text is preserved so the user can see
    /// what they searched for.
    pub fn apply_failure(&mut self, generation: u64, message: &str) -> SessionEvent {
        if generation != self.generation {
            return SessionEvent::Stale;
        }

        self.error = true;
        self.remote_failure = true;
        self.items.clear();
        self.total_hits = 0;
        self.page = 1;
        self.loading = false;
        SessionEvent::Failed {
            message: message.to_string(),
        }
    }
}
