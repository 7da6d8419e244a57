//! Prev/next paging over a zero-based page index.

/// Presentational state of the pager under a resource table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current: usize,
    total: usize,
}

impl Pagination {
    pub fn new(current: usize, total: usize) -> Self {
        Self { current, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// 1-based label, e.g. `"1 / 3"`.
    pub fn label(&self) -> String {
        format!("{} / {}", self.current + 1, self.total)
    }

    pub fn prev_disabled(&self) -> bool {
        self.current == 0
    }

    /// Also disabled while nothing is loaded (`total == 0`).
    pub fn next_disabled(&self) -> bool {
        self.current + 1 >= self.total
    }

    /// Target of the "previous" control, `None` while disabled.
    pub fn prev(&self) -> Option<usize> {
        (!self.prev_disabled()).then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<usize> {
        (!self.next_disabled()).then(|| self.current + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_three() {
        let p = Pagination::new(0, 3);
        assert_eq!(p.label(), "1 / 3");
        assert!(p.prev_disabled());
        assert!(!p.next_disabled());
        assert_eq!(p.prev(), None);
        assert_eq!(p.next(), Some(1));
    }

    #[test]
    fn controls_follow_page_position() {
        for total in 1..6 {
            for current in 0..total {
                let p = Pagination::new(current, total);
                assert_eq!(p.label(), format!("{} / {}", current + 1, total));
                assert_eq!(p.prev_disabled(), current == 0);
                assert_eq!(p.next_disabled(), current + 1 == total);
            }
        }
    }

    #[test]
    fn last_page_only_goes_back() {
        let p = Pagination::new(2, 3);
        assert_eq!(p.next(), None);
        assert_eq!(p.prev(), Some(1));
    }

    #[test]
    fn unloaded_pager_is_inert() {
        let p = Pagination::new(0, 0);
        assert_eq!(p.label(), "1 / 0");
        assert!(p.prev_disabled() && p.next_disabled());
    }
}
