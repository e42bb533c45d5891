use unicode_width::UnicodeWidthStr;

/// Scroll state for a wrapped paragraph panel. The viewport dimensions are
/// fed in from the layout pass so scrolling can be capped at the last page.
#[derive(Debug, Default, Clone)]
pub struct ScrollableParagraphState {
    pub content: String,
    pub scroll_offset_vertical: u16,
    viewport_width: u16,
    viewport_height: u16,
}

impl ScrollableParagraphState {
    pub fn new(content: String) -> Self {
        Self { content, ..Default::default() }
    }

    /// Replaces the content and resets scroll, unless nothing changed (the
    /// feed redraws on every delta and must not yank the reader around).
    pub fn set_content(&mut self, content: String) {
        if self.content == content {
            return;
        }
        self.content = content;
        self.scroll_offset_vertical = 0;
    }

    pub fn set_dimensions(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.scroll_offset_vertical = self.scroll_offset_vertical.min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset_vertical = self.scroll_offset_vertical.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset_vertical =
            self.scroll_offset_vertical.saturating_add(amount).min(self.max_scroll());
    }

    /// Lines the content occupies once wrapped to the viewport width. An
    /// estimate by display width; close enough to cap scrolling sensibly.
    fn wrapped_line_count(&self) -> u16 {
        if self.viewport_width == 0 {
            return 0;
        }
        let width = usize::from(self.viewport_width);
        self.content
            .lines()
            .map(|line| {
                let cells = UnicodeWidthStr::width(line);
                (cells.max(1)).div_ceil(width) as u16
            })
            .sum()
    }

    fn max_scroll(&self) -> u16 {
        self.wrapped_line_count().saturating_sub(self.viewport_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(content: &str, width: u16, height: u16) -> ScrollableParagraphState {
        let mut state = ScrollableParagraphState::new(content.to_string());
        state.set_dimensions(width, height);
        state
    }

    #[test]
    fn scroll_up_saturates_at_zero() {
        let mut state = state_with("one\ntwo\nthree", 20, 2);
        state.scroll_up(5);
        assert_eq!(state.scroll_offset_vertical, 0);
    }

    #[test]
    fn scroll_down_is_capped_at_last_page() {
        let mut state = state_with("a\nb\nc\nd\ne", 20, 2);
        state.scroll_down(100);
        assert_eq!(state.scroll_offset_vertical, 3);
    }

    #[test]
    fn long_lines_count_as_wrapped() {
        // 45 cells at width 10 wraps to 5 lines.
        let mut state = state_with(&"x".repeat(45), 10, 2);
        state.scroll_down(100);
        assert_eq!(state.scroll_offset_vertical, 3);
    }

    #[test]
    fn new_content_resets_scroll_but_same_content_keeps_it() {
        let mut state = state_with("a\nb\nc\nd", 20, 2);
        state.scroll_down(2);
        state.set_content("a\nb\nc\nd".to_string());
        assert_eq!(state.scroll_offset_vertical, 2);
        state.set_content("different".to_string());
        assert_eq!(state.scroll_offset_vertical, 0);
    }
}
