use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::app::model::Focus;
use crate::app::{App, Message, Model};

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                Self::handle_key(*key, model)
            }
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: crossterm::event::KeyEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return Some(Message::HideHelp);
        }

        // Global bindings
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Message::Quit);
        }

        match model.focus {
            Focus::Search => match key.code {
                KeyCode::Enter => Some(Message::SubmitQuery),
                KeyCode::Backspace => Some(Message::InputBackspace),
                KeyCode::Esc => {
                    if model.input.is_empty() {
                        Some(Message::FocusGallery)
                    } else {
                        Some(Message::InputClear)
                    }
                }
                KeyCode::Tab | KeyCode::Down => Some(Message::FocusGallery),
                KeyCode::Char(c)
                    if !key.modifiers.contains(KeyModifiers::CONTROL)
                        && !key.modifiers.contains(KeyModifiers::ALT) =>
                {
                    Some(Message::InputChar(c))
                }
                _ => None,
            },
            Focus::Gallery => match key.code {
                // Navigation
                KeyCode::Char('l') | KeyCode::Right => Some(Message::SelectNext),
                KeyCode::Char('h') | KeyCode::Left => Some(Message::SelectPrev),
                KeyCode::Char('j') | KeyCode::Down => Some(Message::SelectRowDown),
                KeyCode::Char('k') | KeyCode::Up => Some(Message::SelectRowUp),

                // Pagination, gated the same way the load-more hint is
                KeyCode::Char('m') | KeyCode::Char(' ') => {
                    if model.session.can_load_more() {
                        Some(Message::LoadMore)
                    } else {
                        None
                    }
                }

                // Open selected image
                KeyCode::Char('o') | KeyCode::Enter => {
                    if model.session.items().is_empty() {
                        None
                    } else {
                        Some(Message::OpenSelected)
                    }
                }

                // Search
                KeyCode::Char('/') | KeyCode::Tab => Some(Message::FocusSearch),

                KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),

                // Quit
                KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
                _ => None,
            },
        }
    }
}
