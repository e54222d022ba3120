//! Focus Management
//!
//! Tab index parsing and roving focus arithmetic for composite widgets.

/// Tab index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabIndex {
    /// tabindex="-1": focusable by script, skipped by sequential navigation
    NotFocusable,
    /// tabindex="0" or positive
    Sequential(i32),
}

impl TabIndex {
    /// The only stop a roving group exposes to sequential navigation
    pub const TAB_STOP: TabIndex = TabIndex::Sequential(0);

    pub fn parse(value: &str) -> Self {
        match value.trim().parse::<i32>() {
            Ok(n) if n < 0 => Self::NotFocusable,
            Ok(n) => Self::Sequential(n),
            Err(_) => Self::NotFocusable,
        }
    }

    pub fn is_focusable(&self) -> bool {
        matches!(self, Self::Sequential(_))
    }

    /// Attribute value for `tabindex`
    pub fn as_attr(&self) -> String {
        match self {
            Self::NotFocusable => "-1".to_string(),
            Self::Sequential(n) => n.to_string(),
        }
    }

    /// Roving tab index for a group member
    pub fn roving(is_tab_stop: bool) -> Self {
        if is_tab_stop {
            Self::TAB_STOP
        } else {
            Self::NotFocusable
        }
    }
}

/// Roving focus over an ordered group of `len` members
///
/// Moves wrap at both ends. Every query on an empty group yields `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RovingFocus {
    len: usize,
}

impl RovingFocus {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<usize> {
        (self.len > 0).then_some(0)
    }

    pub fn last(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    /// Following member; last wraps to first
    pub fn next(&self, current: usize) -> Option<usize> {
        if current >= self.len {
            return None;
        }
        Some(if current + 1 == self.len { 0 } else { current + 1 })
    }

    /// Preceding member; first wraps to last
    pub fn prev(&self, current: usize) -> Option<usize> {
        if current >= self.len {
            return None;
        }
        Some(if current == 0 { self.len - 1 } else { current - 1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_index() {
        assert!(!TabIndex::parse("-1").is_focusable());
        assert!(TabIndex::parse("0").is_focusable());
        assert!(TabIndex::parse("5").is_focusable());
        assert!(!TabIndex::parse("abc").is_focusable());
        assert_eq!(TabIndex::roving(true).as_attr(), "0");
        assert_eq!(TabIndex::roving(false).as_attr(), "-1");
    }

    #[test]
    fn test_roving_wraps() {
        let group = RovingFocus::new(3);

        assert_eq!(group.next(0), Some(1));
        assert_eq!(group.next(2), Some(0));
        assert_eq!(group.prev(0), Some(2));
        assert_eq!(group.prev(2), Some(1));
        assert_eq!(group.first(), Some(0));
        assert_eq!(group.last(), Some(2));
    }

    #[test]
    fn test_roving_edges() {
        let single = RovingFocus::new(1);
        assert_eq!(single.next(0), Some(0));
        assert_eq!(single.prev(0), Some(0));
        assert_eq!(single.next(1), None);

        let empty = RovingFocus::new(0);
        assert!(empty.is_empty());
        assert_eq!(empty.first(), None);
        assert_eq!(empty.last(), None);
        assert_eq!(empty.next(0), None);
    }
}
