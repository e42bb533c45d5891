use crate::announcement::Announcement;
use crate::event::FeedMessage;
use crate::feed::{AnnouncementFeed, FeedEvent};
use crate::session::SessionContext;
use crate::ui::format_description;
use crate::widgets::scrollable_paragraph::ScrollableParagraphState;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::Backend};
use std::io;
use tokio::sync::mpsc::UnboundedReceiver;

pub struct App {
    pub should_quit: bool,
    pub session: SessionContext,
    pub feed: AnnouncementFeed,
    pub selected_index: Option<usize>,
    pub detail_state: ScrollableParagraphState,
}

impl App {
    pub fn new(session: SessionContext) -> App {
        let mut app = App {
            should_quit: false,
            session,
            feed: AnnouncementFeed::new(),
            selected_index: None,
            detail_state: ScrollableParagraphState::default(),
        };

        app.update_detail_content();

        app
    }

    pub fn welcome_line(&self) -> String {
        format!("Welcome, {}!", self.session.display_name().unwrap_or("Guest"))
    }

    // =============================== Applying feed messages ======================================

    /// Applies one message from the fetch task or the push subscription.
    /// Messages are drained in arrival order by the single UI loop, so this
    /// is the only writer the feed ever sees.
    pub fn apply_message(&mut self, message: FeedMessage) {
        match message {
            FeedMessage::Snapshot(items) => {
                info!("announcement snapshot applied: {} items", items.len());
                self.feed.replace_all(items);
                self.feed.finish_loading();
                self.select_initial_item();
            }
            FeedMessage::SnapshotFailed => {
                // Non-fatal: the feed stays empty, the spinner stops.
                error!("announcement snapshot failed, feed left empty");
                self.feed.finish_loading();
            }
            FeedMessage::Delta(event) => {
                let was_insert = matches!(event, FeedEvent::New(_));
                if self.feed.apply(event) {
                    if was_insert {
                        // Keep the same announcement selected after a prepend.
                        self.selected_index = match self.selected_index {
                            Some(i) => Some(i + 1),
                            None => Some(0),
                        };
                    } else {
                        self.clamp_selection();
                    }
                }
            }
        }
        self.update_detail_content();
    }

    fn select_initial_item(&mut self) {
        self.selected_index = if self.feed.is_empty() { None } else { Some(0) };
    }

    fn clamp_selection(&mut self) {
        self.selected_index = match self.selected_index {
            _ if self.feed.is_empty() => None,
            Some(i) => Some(i.min(self.feed.len() - 1)),
            None => None,
        };
    }

    // =============================== Detail panel content ========================================

    // Called whenever the selection or the feed changes.
    fn update_detail_content(&mut self) {
        let new_content = if let Some(announcement) = self.selected_announcement() {
            let mut text = format_description(announcement.description());
            if let Some(file_url) = announcement.file_url() {
                text.push_str("\n\nAttachment: ");
                text.push_str(file_url);
            }
            text
        } else if self.feed.is_loading() {
            "Loading announcements...".to_string()
        } else {
            "No announcements right now.".to_string()
        };
        self.detail_state.set_content(new_content);
    }

    pub fn scroll_detail_up(&mut self) {
        self.detail_state.scroll_up(1);
    }

    pub fn scroll_detail_down(&mut self) {
        self.detail_state.scroll_down(1);
    }

    pub fn page_detail_up(&mut self) {
        self.detail_state.scroll_up(5);
    }

    pub fn page_detail_down(&mut self) {
        self.detail_state.scroll_down(5);
    }

    // =============================== List navigation =============================================

    pub fn select_next(&mut self) {
        if self.feed.is_empty() {
            self.selected_index = None;
        } else {
            let len = self.feed.len();
            self.selected_index = Some(self.selected_index.map_or(0, |i| (i + 1) % len));
        }
        self.update_detail_content();
    }

    pub fn select_prev(&mut self) {
        if self.feed.is_empty() {
            self.selected_index = None;
        } else {
            let len = self.feed.len();
            self.selected_index = Some(self.selected_index.map_or(len - 1, |i| (i + len - 1) % len));
        }
        self.update_detail_content();
    }

    // --- Key Handler ---
    pub fn on_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Down => self.select_next(),
            KeyCode::Up => self.select_prev(),
            KeyCode::PageDown => self.page_detail_down(),
            KeyCode::PageUp => self.page_detail_up(),
            KeyCode::Char('j') => self.scroll_detail_down(),
            KeyCode::Char('k') => self.scroll_detail_up(),
            _ => {}
        }
    }

    pub fn selected_announcement(&self) -> Option<&Announcement> {
        self.selected_index.and_then(|i| self.feed.items().get(i))
    }
}

pub fn start_ui(mut app: App, mut messages: UnboundedReceiver<FeedMessage>) -> Result<()> {
    // Set up the terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_loop(&mut terminal, &mut app, &mut messages);

    // Restore the terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

pub fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    messages: &mut UnboundedReceiver<FeedMessage>,
) -> Result<()> {
    while !app.should_quit {
        // Drain everything that arrived since the last tick, in arrival
        // order, before drawing. Each message is handled to completion.
        while let Ok(message) = messages.try_recv() {
            app.apply_message(message);
        }

        let frame_size = terminal.get_frame().size(); // Fetch once before drawing
        crate::ui::prepare_ui_layout(app, frame_size);
        terminal.draw(|f| crate::ui::ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                app.on_key(key_event.code);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcement::{Announcement, AnnouncementId};

    fn ann(id: i64, title: &str) -> Announcement {
        Announcement::new(AnnouncementId::new(id), title.to_string(), format!("{title} body"), None)
    }

    fn app_with_snapshot(items: Vec<Announcement>) -> App {
        let mut app = App::new(SessionContext::anonymous());
        app.apply_message(FeedMessage::Snapshot(items));
        app
    }

    #[test]
    fn welcome_line_uses_cached_name_or_guest() {
        let app = App::new(SessionContext::new(None, Some("Ada Lovelace".to_string())));
        assert_eq!(app.welcome_line(), "Welcome, Ada Lovelace!");

        let app = App::new(SessionContext::anonymous());
        assert_eq!(app.welcome_line(), "Welcome, Guest!");
    }

    #[test]
    fn snapshot_populates_feed_and_selects_first() {
        let app = app_with_snapshot(vec![ann(1, "a"), ann(2, "b")]);
        assert!(!app.feed.is_loading());
        assert_eq!(app.feed.len(), 2);
        assert_eq!(app.selected_index, Some(0));
    }

    #[test]
    fn failed_snapshot_settles_loading_with_empty_feed() {
        let mut app = App::new(SessionContext::anonymous());
        app.apply_message(FeedMessage::SnapshotFailed);
        assert!(!app.feed.is_loading());
        assert!(app.feed.is_empty());
        assert_eq!(app.selected_index, None);
    }

    #[test]
    fn insert_delta_keeps_current_selection_on_same_item() {
        let mut app = app_with_snapshot(vec![ann(1, "a"), ann(2, "b")]);
        app.select_next(); // now on id 2
        app.apply_message(FeedMessage::Delta(FeedEvent::New(ann(3, "c"))));
        assert_eq!(app.selected_announcement().unwrap().id().value(), 2);
        assert_eq!(app.feed.items()[0].id().value(), 3);
    }

    #[test]
    fn duplicate_insert_does_not_shift_selection() {
        let mut app = app_with_snapshot(vec![ann(1, "a"), ann(2, "b")]);
        app.apply_message(FeedMessage::Delta(FeedEvent::New(ann(2, "b dup"))));
        assert_eq!(app.selected_announcement().unwrap().id().value(), 1);
        assert_eq!(app.feed.len(), 2);
    }

    #[test]
    fn archive_delta_clamps_selection() {
        let mut app = app_with_snapshot(vec![ann(1, "a"), ann(2, "b")]);
        app.select_next(); // on id 2, index 1
        app.apply_message(FeedMessage::Delta(FeedEvent::Archive(AnnouncementId::new(2))));
        assert_eq!(app.selected_index, Some(0));

        app.apply_message(FeedMessage::Delta(FeedEvent::Archive(AnnouncementId::new(1))));
        assert_eq!(app.selected_index, None);
    }

    #[test]
    fn navigation_wraps_around() {
        let mut app = app_with_snapshot(vec![ann(1, "a"), ann(2, "b"), ann(3, "c")]);
        app.select_prev();
        assert_eq!(app.selected_index, Some(2));
        app.select_next();
        assert_eq!(app.selected_index, Some(0));
    }

    #[test]
    fn detail_panel_shows_attachment_url() {
        let with_file = Announcement::new(
            AnnouncementId::new(1),
            "Notice".to_string(),
            "Check the flyer".to_string(),
            Some("https://cdn.example.com/flyer.pdf".to_string()),
        );
        let app = app_with_snapshot(vec![with_file]);
        assert!(app.detail_state.content.contains("Attachment: https://cdn.example.com/flyer.pdf"));
    }

    #[test]
    fn quit_key_sets_flag() {
        let mut app = App::new(SessionContext::anonymous());
        app.on_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
