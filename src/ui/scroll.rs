/// Window of rows shown when the list is taller than the screen.
#[derive(Debug, Clone, Default)]
pub struct ScrollState {
    pub offset: usize,
    pub max_visible: Option<usize>,
}

impl ScrollState {
    pub fn new(max_visible: Option<usize>) -> Self {
        Self {
            offset: 0,
            max_visible,
        }
    }

    pub fn ensure_visible(&mut self, active: usize, total: usize) {
        let Some(max) = self.max_visible else {
            return;
        };
        if total <= max {
            self.offset = 0;
            return;
        }
        if active < self.offset {
            self.offset = active;
        } else {
            let last = self.offset.saturating_add(max).saturating_sub(1);
            if active > last {
                self.offset = active + 1 - max;
            }
        }
        self.offset = self.offset.min(total - max);
    }

    pub fn clamp_active(active: &mut usize, total: usize) {
        if total == 0 {
            *active = 0;
        } else if *active >= total {
            *active = total - 1;
        }
    }

    pub fn visible_range(&self, total: usize) -> (usize, usize) {
        match self.max_visible {
            Some(limit) => {
                let start = self.offset.min(total);
                let end = (start + limit).min(total);
                (start, end)
            }
            None => (0, total),
        }
    }

    pub fn footer(&self, total: usize) -> Option<String> {
        let max = self.max_visible?;
        if total <= max {
            return None;
        }
        let (start, end) = self.visible_range(total);
        let arrow = match (start > 0, end < total) {
            (true, true) => " ↑↓",
            (true, false) => " ↑",
            (false, true) => " ↓",
            (false, false) => "",
        };
        Some(format!("[{}-{} of {}]{}", start + 1, end, total, arrow))
    }
}

#[cfg(test)]
mod tests {
    use super::ScrollState;

    #[test]
    fn window_follows_active_row() {
        let mut scroll = ScrollState::new(Some(3));
        scroll.ensure_visible(5, 10);
        assert_eq!(scroll.visible_range(10), (3, 6));
        scroll.ensure_visible(1, 10);
        assert_eq!(scroll.visible_range(10), (1, 4));
    }

    #[test]
    fn window_shrinks_with_list() {
        let mut scroll = ScrollState::new(Some(3));
        scroll.ensure_visible(9, 10);
        scroll.ensure_visible(2, 4);
        assert_eq!(scroll.visible_range(4), (1, 4));
    }

    #[test]
    fn footer_only_when_clipped() {
        let scroll = ScrollState::new(Some(3));
        assert_eq!(scroll.footer(2), None);
        assert_eq!(scroll.footer(5), Some("[1-3 of 5] ↓".to_string()));
    }
}
