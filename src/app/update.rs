use crate::app::Model;
use crate::app::model::{Focus, ToastLevel};
use crate::remote::RemoteError;
use crate::search::{PageResult, SessionEvent};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // Query input
    /// Append a character to the query input
    InputChar(char),
    /// Delete the character before the input cursor
    InputBackspace,
    /// Clear the query input
    InputClear,
    /// Submit the query input as a new search
    SubmitQuery,

    // Focus
    /// Focus the query input bar
    FocusSearch,
    /// Focus the thumbnail grid
    FocusGallery,

    // Gallery
    /// Move selection to the next record
    SelectNext,
    /// Move selection to the previous record
    SelectPrev,
    /// Move selection one grid row down
    SelectRowDown,
    /// Move selection one grid row up
    SelectRowUp,
    /// Fetch the next page of the current query
    LoadMore,
    /// Open the selected record's full image in the system browser
    OpenSelected,

    // Fetch completions
    /// A search page fetch finished (delivered by the fetcher channel)
    PageArrived {
        generation: u64,
        outcome: Result<PageResult, RemoteError>,
    },

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here.
/// Fetch dispatch and other I/O run afterwards in
/// `App::handle_message_side_effects`, driven by the pending fetch this
/// function queues on the model.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        // Query input
        Message::InputChar(c) => {
            model.input.push(c);
        }
        Message::InputBackspace => {
            model.input.pop();
        }
        Message::InputClear => {
            model.input.clear();
        }
        Message::SubmitQuery => {
            let text = model.input.trim().to_string();
            let request = model.session.submit(&text);
            let submitted = request.is_some();
            model.queue_fetch(request);
            model.selected = 0;
            model.scroll_row = 0;
            model.clear_thumbs();
            if submitted {
                model.focus = Focus::Gallery;
            }
        }

        // Focus
        Message::FocusSearch => {
            model.focus = Focus::Search;
        }
        Message::FocusGallery => {
            model.focus = Focus::Gallery;
        }

        // Gallery
        Message::SelectNext => {
            if !model.session.items().is_empty() {
                model.selected += 1;
                model.clamp_selection();
            }
        }
        Message::SelectPrev => {
            model.selected = model.selected.saturating_sub(1);
            model.clamp_selection();
        }
        Message::SelectRowDown => {
            if !model.session.items().is_empty() {
                model.selected += model.grid_cols();
                model.clamp_selection();
            }
        }
        Message::SelectRowUp => {
            model.selected = model.selected.saturating_sub(model.grid_cols());
            model.clamp_selection();
        }
        Message::LoadMore => {
            let request = model.session.load_more();
            model.queue_fetch(request);
        }
        // Opening the image is a side effect; no state changes here.
        Message::OpenSelected => {}

        // Fetch completions
        Message::PageArrived {
            generation,
            outcome,
        } => {
            let event = match outcome {
                Ok(page) => model.session.apply_page(generation, page),
                Err(err) => model.session.apply_failure(generation, &err.message()),
            };
            apply_session_event(&mut model, &event);
        }

        // Window
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.clamp_selection();
        }
        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }

        // Application
        Message::Quit => {
            model.should_quit = true;
        }
    }

    model
}

/// Map a published session event onto presentation state (toasts, thumbs).
fn apply_session_event(model: &mut Model, event: &SessionEvent) {
    match event {
        SessionEvent::FirstPage { total } => {
            model.show_toast(
                ToastLevel::Success,
                format!("Hooray! We found {total} images."),
            );
        }
        SessionEvent::PageAppended => {}
        SessionEvent::NoMatches => {
            model.show_toast(
                ToastLevel::Warning,
                "Sorry, there are no images matching your search query. Please try again.",
            );
        }
        SessionEvent::Failed { message } => {
            model.show_toast(ToastLevel::Error, message.clone());
            // The session discarded the search; drop its render state too.
            model.clear_thumbs();
        }
        SessionEvent::Stale => {
            crate::perf::log_event("fetch.stale", "discarded superseded completion");
        }
    }
    model.clamp_selection();
}
