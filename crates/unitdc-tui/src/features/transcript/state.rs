/// Scroll position of the transcript pane.
///
/// `offset` counts lines scrolled up from the bottom; zero follows the
/// newest cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptState {
    pub offset: usize,
}

impl TranscriptState {
    pub fn is_following(&self) -> bool {
        self.offset == 0
    }

    /// Scrolls towards older cells, never past `max_offset`.
    pub fn scroll_up(&mut self, lines: usize, max_offset: usize) {
        self.offset = self.offset.saturating_add(lines).min(max_offset);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = 0;
    }

    /// Pulls the offset back after the content or the pane shrank.
    pub fn clamp(&mut self, max_offset: usize) {
        self.offset = self.offset.min(max_offset);
    }

    /// Largest offset that still shows a full pane of `height` rows.
    pub fn max_offset(total: usize, height: usize) -> usize {
        total.saturating_sub(height)
    }

    /// First visible line for a pane of `height` over `total` lines.
    ///
    /// An offset beyond the top shows the top; the stored offset is not
    /// modified here.
    pub fn first_visible(&self, total: usize, height: usize) -> usize {
        let max_offset = Self::max_offset(total, height);
        max_offset - self.offset.min(max_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_following_shows_last_lines() {
        let state = TranscriptState::default();
        assert!(state.is_following());
        assert_eq!(state.first_visible(100, 20), 80);
        assert_eq!(state.first_visible(5, 20), 0);
    }

    #[test]
    fn test_scroll_up_clamps_at_top() {
        let max = TranscriptState::max_offset(100, 20);
        let mut state = TranscriptState::default();
        for _ in 0..50 {
            state.scroll_up(10, max);
        }
        assert_eq!(state.offset, 80);
        assert_eq!(state.first_visible(100, 20), 0);

        state.scroll_down(10);
        assert_eq!(state.first_visible(100, 20), 10);

        state.scroll_to_bottom();
        assert_eq!(state.first_visible(100, 20), 80);
    }

    #[test]
    fn test_clamp_after_pane_grows() {
        let mut state = TranscriptState::default();
        state.scroll_up(80, TranscriptState::max_offset(100, 20));
        state.clamp(TranscriptState::max_offset(100, 60));
        assert_eq!(state.offset, 40);
    }

    #[test]
    fn test_scroll_down_stops_at_bottom() {
        let mut state = TranscriptState::default();
        state.scroll_up(3, 10);
        state.scroll_down(10);
        assert!(state.is_following());
    }
}
