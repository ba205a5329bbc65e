use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let session = &model.session;

    let query_info = if session.query().is_empty() {
        String::new()
    } else {
        format!(" \"{}\" ", session.query())
    };
    let count_info = if session.total_hits() > 0 {
        format!(" {}/{} images ", session.items().len(), session.total_hits())
    } else {
        String::new()
    };
    let loading_indicator = if session.is_loading() {
        " [loading]"
    } else {
        ""
    };
    let more_hint = if session.can_load_more() {
        "  m:more"
    } else {
        ""
    };

    let status = format!(
        " pixseek {}{}{}{} /:search  o:open  ?:help  q:quit",
        query_info, count_info, loading_indicator, more_hint
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Success => ("[ok]", Style::default().bg(Color::Green).fg(Color::Black)),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{} {}", prefix, message)).style(style);
    frame.render_widget(toast, area);
}
