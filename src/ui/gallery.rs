use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};
use ratatui_image::protocol::StatefulProtocolType;
use ratatui_image::{Resize, StatefulImage};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;

use super::{CELL_HEIGHT, CELL_WIDTH, THUMB_IMAGE_COLS, THUMB_IMAGE_ROWS};

/// Render the visible portion of the thumbnail grid.
pub fn render_gallery(model: &mut Model, frame: &mut Frame, area: Rect) {
    let cols = model.grid_cols();
    let visible = model.visible_range();
    let scroll_row = model.scroll_row;
    let selected = model.selected;

    crate::perf::log_event(
        "render.gallery",
        format!(
            "visible={}..{} cols={} protocols={}",
            visible.start,
            visible.end,
            cols,
            model.thumb_protocols.len()
        ),
    );

    let records: Vec<_> = model.session.items()[visible.clone()]
        .iter()
        .cloned()
        .collect();

    for (offset, record) in records.iter().enumerate() {
        let idx = visible.start + offset;
        let rel = idx - scroll_row * cols;
        let col = rel % cols;
        let row = rel / cols;

        let cell = Rect::new(
            area.x + col as u16 * CELL_WIDTH,
            area.y + row as u16 * CELL_HEIGHT,
            CELL_WIDTH,
            CELL_HEIGHT,
        );
        if cell.bottom() > area.bottom() || cell.right() > area.right() {
            continue;
        }

        let image_area = Rect::new(cell.x + 1, cell.y, THUMB_IMAGE_COLS, THUMB_IMAGE_ROWS);
        let caption_area = Rect::new(cell.x + 1, cell.y + THUMB_IMAGE_ROWS, THUMB_IMAGE_COLS, 1);

        if let Some((protocol, _, _)) = model.thumb_protocols.get_mut(&record.id) {
            let resize =
                if matches!(protocol.protocol_type(), StatefulProtocolType::Halfblocks(_)) {
                    // Nearest-neighbor causes strong color aliasing artifacts
                    // in half-cell mode.
                    Resize::Scale(Some(image::imageops::FilterType::CatmullRom))
                } else {
                    Resize::Scale(None)
                };
            StatefulImage::default()
                .resize(resize)
                .render(image_area, frame.buffer_mut(), protocol);
        } else {
            render_placeholder(frame, image_area, model.images_enabled);
        }

        let caption = truncate_to_width(&record.tags, caption_area.width as usize);
        let caption_style = if idx == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Indexed(245))
        };
        frame.render_widget(
            Paragraph::new(Line::styled(caption, caption_style)),
            caption_area,
        );
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, images_enabled: bool) {
    let fill = Block::default().style(Style::default().bg(Color::DarkGray));
    frame.render_widget(fill, area);
    let label = if images_enabled { "loading" } else { "image" };
    let label_area = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new(Line::styled(
            label,
            Style::default().bg(Color::DarkGray).fg(Color::Gray),
        ))
        .alignment(Alignment::Center),
        label_area,
    );
}

/// Truncate `text` to at most `width` terminal columns, appending an
/// ellipsis when anything was cut.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    let budget = width - 1;
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('\u{2026}');
    out
}
