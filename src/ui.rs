// src/ui.rs
use crate::app::App;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use std::rc::Rc;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Turns an announcement description into plain terminal text. Backends often
/// store these as HTML fragments; anything that looks like markup goes
/// through html2text, plain text passes through untouched.
pub fn format_description(description: &str) -> String {
    const DEFAULT_TEXT_WIDTH: usize = 80;

    let formatted = if description.contains('<')
        && description.contains('>')
        && description.contains("</")
    {
        match html2text::from_read(description.as_bytes(), DEFAULT_TEXT_WIDTH) {
            Ok(text_content) => text_content
                .lines()
                .map(|line| line.trim_end())
                .filter(|line| !line.is_empty())
                .collect::<Vec<&str>>()
                .join("\n"),
            Err(err) => {
                log::warn!("failed to convert HTML description: {}", err);
                description.to_string()
            }
        }
    } else {
        description.to_string()
    };

    formatted.trim().to_string()
}

/// Truncates to a display-cell budget, accounting for wide characters. Text
/// that already fits is returned untouched; the ellipsis cell is reserved
/// only when there is an actual overflow.
fn fit_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(1); // room for the ellipsis
    let mut width = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push('…');
    out
}

pub struct LayoutChunks {
    pub header_chunk: Rect,
    pub content_chunk: Rect,
    pub hint_chunk: Rect,
    pub list_chunk: Rect,
    pub detail_chunk: Rect,
}

pub fn compute_layout(frame_size: Rect) -> LayoutChunks {
    let main_chunks: Rc<[Rect]> = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(frame_size);

    let content_chunk: Rect = main_chunks[1];

    let content_columns: Rc<[Rect]> = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(content_chunk);

    LayoutChunks {
        header_chunk: main_chunks[0],
        content_chunk,
        hint_chunk: main_chunks[2],
        list_chunk: content_columns[0],
        detail_chunk: content_columns[1],
    }
}

/// Updates mutable state that depends on the layout (the detail panel's
/// viewport dimensions) outside the draw closure.
pub fn prepare_ui_layout(app: &mut App, frame_size: Rect) {
    let layout_chunks: LayoutChunks = compute_layout(frame_size);

    let temp_detail_block = Block::default().title("Announcement").borders(Borders::ALL);
    let inner_area: Rect = temp_detail_block.inner(layout_chunks.detail_chunk);

    app.detail_state.set_dimensions(inner_area.width, inner_area.height);
}

pub fn ui(f: &mut Frame, app: &mut App) {
    // === Layout Definitions ===
    let layout_chunks: LayoutChunks = compute_layout(f.size());

    // === Define Styles ===
    let default_style: Style = Style::default().fg(Color::White);
    let selected_item_style: Style =
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    // =================================== Header Panel =============================================
    let header_widget: Paragraph = Paragraph::new(app.welcome_line())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title("Tenant Portal")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Green)),
        );
    f.render_widget(header_widget, layout_chunks.header_chunk);

    // ============================== Announcements Panel (Left) ====================================
    let list_title = if app.feed.is_loading() {
        "Announcements (loading...)".to_string()
    } else {
        format!("Announcements ({})", app.feed.len())
    };

    let title_width = usize::from(layout_chunks.list_chunk.width.saturating_sub(2));
    let list_items: Vec<ListItem> = if app.feed.is_empty() {
        let placeholder = if app.feed.is_loading() {
            "Loading announcements..."
        } else {
            "No announcements right now."
        };
        vec![ListItem::new(placeholder).style(default_style)]
    } else {
        app.feed
            .items()
            .iter()
            .enumerate()
            .map(|(i, announcement)| {
                let mut item: ListItem =
                    ListItem::new(fit_to_width(announcement.title(), title_width));
                if Some(i) == app.selected_index {
                    item = item.style(selected_item_style);
                } else {
                    item = item.style(default_style);
                }
                item
            })
            .collect()
    };

    let list_block: Block = Block::default()
        .title(list_title)
        .borders(Borders::ALL)
        .border_style(default_style);
    let list_widget: List = List::new(list_items).block(list_block).highlight_symbol(">> ");
    f.render_widget(list_widget, layout_chunks.list_chunk);

    // ================================ Detail Panel (Right) ========================================
    let detail_title: String = match app.selected_announcement() {
        Some(announcement) => fit_to_width(
            announcement.title(),
            usize::from(layout_chunks.detail_chunk.width.saturating_sub(2)),
        ),
        None => "Announcement".to_string(),
    };

    let detail_block: Block = Block::default()
        .title(detail_title)
        .borders(Borders::ALL)
        .border_style(default_style);
    let detail_widget: Paragraph = Paragraph::new(app.detail_state.content.clone())
        .wrap(Wrap { trim: true })
        .style(default_style)
        .block(detail_block)
        .scroll((app.detail_state.scroll_offset_vertical, 0));
    f.render_widget(detail_widget, layout_chunks.detail_chunk);

    // =============================== Hint Bar Panel (Bottom) ======================================
    let hint_text: &str = "[↑/↓] Select Announcement | [j/k PgUp/PgDn] Scroll Detail | [Q] Quit";
    let hint_widget: Paragraph = Paragraph::new(hint_text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(hint_widget, layout_chunks.hint_chunk);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_descriptions_are_converted_to_text() {
        let formatted = format_description("<p>Pool closed <b>Friday</b></p>");
        assert!(formatted.contains("Pool closed"));
        assert!(!formatted.contains('<'));
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(format_description("  Water shutoff at 9am  "), "Water shutoff at 9am");
    }

    #[test]
    fn fit_to_width_truncates_with_ellipsis() {
        assert_eq!(fit_to_width("a very long announcement title", 10), "a very lo…");
        assert_eq!(fit_to_width("short", 10), "short");
    }

    #[test]
    fn fit_to_width_keeps_exact_fit_titles_intact() {
        assert_eq!(fit_to_width("exactly 10", 10), "exactly 10");
        // Wide characters count as two cells: four of them fill width 8.
        assert_eq!(fit_to_width("公告公告", 8), "公告公告");
        assert_eq!(fit_to_width("公告公告", 7), "公告公…");
    }
}
