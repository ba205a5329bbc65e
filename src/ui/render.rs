use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::{Focus, Model};
use crate::search::Phase;

use super::{CHROME_ROWS, gallery, overlays, status};

/// Render the complete UI.
pub fn render(model: &mut Model, frame: &mut Frame) {
    let area = frame.area();

    let query_area = Rect { height: 1, ..area };
    let gallery_area = Rect {
        y: area.y + 1,
        height: area.height.saturating_sub(CHROME_ROWS),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    render_query_bar(model, frame, query_area);

    // Clear the gallery area first so image cells from previous frames do
    // not leak into the new layout.
    frame.render_widget(Clear, gallery_area);

    match model.session.phase() {
        Phase::Idle => render_message(
            frame,
            gallery_area,
            "Type a query and press Enter to search for images.",
            Style::default().fg(Color::Indexed(245)),
        ),
        Phase::Loading if model.session.items().is_empty() => render_message(
            frame,
            gallery_area,
            "Searching...",
            Style::default().fg(Color::Indexed(245)),
        ),
        Phase::Empty => render_message(
            frame,
            gallery_area,
            "Sorry, there are no images matching your search query. Please try again.",
            Style::default().fg(Color::Yellow),
        ),
        Phase::Failed => render_message(
            frame,
            gallery_area,
            "The image search failed. Check your connection and press Enter to retry.",
            Style::default().fg(Color::Red),
        ),
        Phase::Loading | Phase::Ready => gallery::render_gallery(model, frame, gallery_area),
    }

    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_query_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = model.focus == Focus::Search;
    let style = if focused {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    };
    // A block cursor marks the insertion point while the bar has focus.
    let cursor = if focused { "\u{2588}" } else { "" };
    let bar = Paragraph::new(format!(" Search: {}{}", model.input, cursor)).style(style);
    frame.render_widget(bar, area);
}

fn render_message(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let y = area.y + area.height / 2;
    let line_area = Rect {
        y,
        height: 1,
        ..area
    };
    let msg = Paragraph::new(Line::styled(text, style)).alignment(Alignment::Center);
    frame.render_widget(msg, line_area);
}
