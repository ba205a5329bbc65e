use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::remote::{RemoteError, SearchBackend};
use crate::search::{ImageRecord, PageResult, Phase};

use super::fetcher::{Arrival, Fetcher};
use super::{App, Focus, Message, Model, ToastLevel, update};

/// Backend with canned responses keyed by query text.
struct ScriptedBackend;

impl SearchBackend for ScriptedBackend {
    fn search(&self, query: &str, page: u64) -> Result<PageResult, RemoteError> {
        match query {
            "nothing" => Ok(PageResult {
                hits: Vec::new(),
                total_hits: 0,
            }),
            "down" => Err(RemoteError::Transport("connection refused".to_string())),
            _ => {
                let hits = (0..12)
                    .map(|i| {
                        let id = format!("{query}-p{page}-{i}");
                        ImageRecord {
                            id: id.clone(),
                            tags: format!("{query}, nature"),
                            thumbnail_url: format!("https://img.example/{id}_640.jpg"),
                            full_image_url: format!("https://img.example/{id}.jpg"),
                        }
                    })
                    .collect();
                Ok(PageResult {
                    hits,
                    total_hits: 30,
                })
            }
        }
    }

    fn fetch_thumbnail(&self, _url: &str) -> Result<Vec<u8>, RemoteError> {
        Ok(Vec::new())
    }
}

fn create_test_fetcher() -> Fetcher {
    Fetcher::new(Arc::new(ScriptedBackend))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Wait for the next page arrival and turn it into its message.
fn next_page_message(fetcher: &Fetcher) -> Message {
    loop {
        match fetcher
            .recv_timeout(Duration::from_secs(5))
            .expect("fetch completion")
        {
            Arrival::Page {
                generation,
                outcome,
                ..
            } => {
                return Message::PageArrived {
                    generation,
                    outcome,
                };
            }
            Arrival::Thumbnail { .. } => {}
        }
    }
}

/// Type a query, submit it, dispatch the fetch, and apply the completion.
fn search_for(mut model: Model, fetcher: &Fetcher, query: &str) -> Model {
    model.input = query.to_string();
    model = update(model, Message::SubmitQuery);
    App::handle_message_side_effects(&mut model, fetcher, &Message::SubmitQuery);
    let msg = next_page_message(fetcher);
    update(model, msg)
}

#[test]
fn test_successful_search_populates_gallery_and_toasts() {
    let fetcher = create_test_fetcher();
    let model = search_for(Model::new((80, 24)), &fetcher, "cats");

    assert_eq!(model.session.phase(), Phase::Ready);
    assert_eq!(model.session.items().len(), 12);
    assert_eq!(model.session.total_hits(), 30);
    assert!(!model.session.is_loading());
    assert_eq!(
        model.active_toast(),
        Some(("Hooray! We found 30 images.", ToastLevel::Success))
    );
}

#[test]
fn test_search_with_no_matches_warns() {
    let fetcher = create_test_fetcher();
    let model = search_for(Model::new((80, 24)), &fetcher, "nothing");

    assert_eq!(model.session.phase(), Phase::Empty);
    assert!(model.session.items().is_empty());
    assert_eq!(
        model.active_toast(),
        Some((
            "Sorry, there are no images matching your search query. Please try again.",
            ToastLevel::Warning
        ))
    );
}

#[test]
fn test_failed_search_discards_results_and_toasts_error() {
    let fetcher = create_test_fetcher();
    let model = search_for(Model::new((80, 24)), &fetcher, "cats");
    assert_eq!(model.session.items().len(), 12);

    let model = search_for(model, &fetcher, "down");

    assert_eq!(model.session.phase(), Phase::Failed);
    assert!(model.session.items().is_empty());
    assert_eq!(model.session.page(), 1);
    let (message, level) = model.active_toast().expect("error toast");
    assert_eq!(level, ToastLevel::Error);
    assert!(message.contains("connection refused"));
}

#[test]
fn test_load_more_appends_next_page() {
    let fetcher = create_test_fetcher();
    let mut model = search_for(Model::new((80, 24)), &fetcher, "cats");
    assert!(model.session.can_load_more());

    model = update(model, Message::LoadMore);
    assert!(model.session.is_loading());
    App::handle_message_side_effects(&mut model, &fetcher, &Message::LoadMore);
    let msg = next_page_message(&fetcher);
    model = update(model, msg);

    assert_eq!(model.session.items().len(), 24);
    assert_eq!(model.session.page(), 2);
    // A follow-up page keeps the first-page toast policy: no new toast text.
    assert_eq!(
        model.active_toast(),
        Some(("Hooray! We found 30 images.", ToastLevel::Success))
    );
}

#[test]
fn test_resubmit_discards_stale_completion() {
    let fetcher = create_test_fetcher();
    let mut model = Model::new((80, 24));

    // First query dispatched but its completion is not applied yet.
    model.input = "cats".to_string();
    model = update(model, Message::SubmitQuery);
    App::handle_message_side_effects(&mut model, &fetcher, &Message::SubmitQuery);
    let stale_msg = next_page_message(&fetcher);

    // User resubmits before the first fetch lands.
    model.input = "dogs".to_string();
    model = update(model, Message::SubmitQuery);
    App::handle_message_side_effects(&mut model, &fetcher, &Message::SubmitQuery);

    // The stale completion must not touch the new session.
    model = update(model, stale_msg);
    assert!(model.session.items().is_empty());
    assert!(model.session.is_loading());
    assert_eq!(model.active_toast(), None);

    // The current completion applies normally.
    let msg = next_page_message(&fetcher);
    model = update(model, msg);
    assert_eq!(model.session.query(), "dogs");
    assert_eq!(model.session.items().len(), 12);
}

#[test]
fn test_submit_empty_input_does_not_fetch() {
    let mut model = Model::new((80, 24));
    model.input = "   ".to_string();
    model = update(model, Message::SubmitQuery);
    assert!(!model.has_pending_fetch());
    assert_eq!(model.session.phase(), Phase::Idle);
}

#[test]
fn test_input_editing_messages() {
    let mut model = Model::new((80, 24));
    model = update(model, Message::InputChar('c'));
    model = update(model, Message::InputChar('a'));
    model = update(model, Message::InputChar('t'));
    assert_eq!(model.input, "cat");

    model = update(model, Message::InputBackspace);
    assert_eq!(model.input, "ca");

    model = update(model, Message::InputClear);
    assert!(model.input.is_empty());
}

#[test]
fn test_submit_moves_focus_to_gallery() {
    let fetcher = create_test_fetcher();
    let model = search_for(Model::new((80, 24)), &fetcher, "cats");
    assert_eq!(model.focus, Focus::Gallery);
}

#[test]
fn test_selection_navigation_clamps_to_items() {
    let fetcher = create_test_fetcher();
    let mut model = search_for(Model::new((80, 24)), &fetcher, "cats");

    model = update(model, Message::SelectPrev);
    assert_eq!(model.selected, 0);

    for _ in 0..50 {
        model = update(model, Message::SelectNext);
    }
    assert_eq!(model.selected, 11);

    model = update(model, Message::SelectRowDown);
    assert_eq!(model.selected, 11);
}

#[test]
fn test_row_navigation_moves_by_grid_columns() {
    let fetcher = create_test_fetcher();
    // 80 columns fit 3 grid cells.
    let mut model = search_for(Model::new((80, 24)), &fetcher, "cats");
    assert_eq!(model.grid_cols(), 3);

    model = update(model, Message::SelectRowDown);
    assert_eq!(model.selected, 3);
    model = update(model, Message::SelectRowUp);
    assert_eq!(model.selected, 0);
}

#[test]
fn test_resize_updates_grid_and_clamps_selection() {
    let fetcher = create_test_fetcher();
    let mut model = search_for(Model::new((160, 44)), &fetcher, "cats");
    for _ in 0..11 {
        model = update(model, Message::SelectNext);
    }
    assert_eq!(model.selected, 11);

    model = update(model, Message::Resize(52, 24));
    assert_eq!(model.terminal_size, (52, 24));
    assert_eq!(model.grid_cols(), 2);
    // Selection survives but the scroll row follows it into view.
    assert_eq!(model.selected, 11);
    assert!(model.visible_range().contains(&model.selected));
}

#[test]
fn test_toast_expires_after_duration() {
    let fetcher = create_test_fetcher();
    let mut model = search_for(Model::new((80, 24)), &fetcher, "cats");
    assert!(model.active_toast().is_some());

    assert!(!model.expire_toast(Instant::now()));
    assert!(model.active_toast().is_some());

    assert!(model.expire_toast(Instant::now() + Duration::from_secs(4)));
    assert_eq!(model.active_toast(), None);
}

#[test]
fn test_quit_message_sets_flag() {
    let model = update(Model::new((80, 24)), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_help_toggle_and_dismiss() {
    let mut model = update(Model::new((80, 24)), Message::ToggleHelp);
    assert!(model.help_visible);

    // Any key closes the overlay.
    let msg = App::handle_key(key(KeyCode::Char('x')), &model);
    assert_eq!(msg, Some(Message::HideHelp));
    model = update(model, Message::HideHelp);
    assert!(!model.help_visible);
}

#[test]
fn test_search_focus_keys_edit_input() {
    let model = Model::new((80, 24));
    assert_eq!(model.focus, Focus::Search);

    assert_eq!(
        App::handle_key(key(KeyCode::Char('c')), &model),
        Some(Message::InputChar('c'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::SubmitQuery)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Tab), &model),
        Some(Message::FocusGallery)
    );
}

#[test]
fn test_gallery_keys_navigate_and_open() {
    let fetcher = create_test_fetcher();
    let model = search_for(Model::new((80, 24)), &fetcher, "cats");

    assert_eq!(
        App::handle_key(key(KeyCode::Char('l')), &model),
        Some(Message::SelectNext)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::SelectRowDown)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Enter), &model),
        Some(Message::OpenSelected)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('/')), &model),
        Some(Message::FocusSearch)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q')), &model),
        Some(Message::Quit)
    );
}

#[test]
fn test_load_more_key_gated_when_exhausted() {
    let fetcher = create_test_fetcher();
    let mut model = search_for(Model::new((80, 24)), &fetcher, "cats");
    assert_eq!(
        App::handle_key(key(KeyCode::Char('m')), &model),
        Some(Message::LoadMore)
    );

    // While a page is loading, the binding is inert.
    model = update(model, Message::LoadMore);
    assert_eq!(App::handle_key(key(KeyCode::Char('m')), &model), None);
}

#[test]
fn test_ctrl_c_quits_from_any_focus() {
    let model = Model::new((80, 24));
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(App::handle_key(ctrl_c, &model), Some(Message::Quit));
}
