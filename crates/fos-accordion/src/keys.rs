//! Keyboard mapping
//!
//! Translates key presses into roving-focus moves. Horizontal arrows mirror
//! under right-to-left layout; vertical arrows, Home and End do not.

use fos_a11y::RovingFocus;
use fos_dom::{Key, Modifiers};

use crate::Direction;

/// Header-to-header move requested from a header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIntent {
    First,
    Last,
    Prev,
    Next,
}

impl NavIntent {
    /// Target index within a group, wrapping at both ends
    pub fn resolve(self, group: RovingFocus, current: usize) -> Option<usize> {
        match self {
            Self::First => group.first(),
            Self::Last => group.last(),
            Self::Prev => group.prev(current),
            Self::Next => group.next(current),
        }
    }
}

/// Direction-aware key map for headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    direction: Direction,
}

impl KeyMap {
    pub fn new(direction: Direction) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Intent for an unmodified key press; ctrl is reserved for panel shortcuts
    pub fn intent(&self, key: &Key, modifiers: Modifiers) -> Option<NavIntent> {
        if modifiers.ctrl {
            return None;
        }
        match (key, self.direction) {
            (Key::Home, _) => Some(NavIntent::First),
            (Key::End, _) => Some(NavIntent::Last),
            (Key::ArrowUp, _) => Some(NavIntent::Prev),
            (Key::ArrowDown, _) => Some(NavIntent::Next),
            (Key::ArrowLeft, Direction::Ltr) | (Key::ArrowRight, Direction::Rtl) => {
                Some(NavIntent::Prev)
            }
            (Key::ArrowRight, Direction::Ltr) | (Key::ArrowLeft, Direction::Rtl) => {
                Some(NavIntent::Next)
            }
            _ => None,
        }
    }
}

/// Shortcut pressed while focus is inside a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelIntent {
    /// Ctrl+ArrowUp
    OwnHeader,
    /// Ctrl+PageUp
    PrevHeader,
    /// Ctrl+PageDown
    NextHeader,
}

impl PanelIntent {
    pub fn from_key(key: &Key, modifiers: Modifiers) -> Option<Self> {
        if !modifiers.ctrl {
            return None;
        }
        match key {
            Key::ArrowUp => Some(Self::OwnHeader),
            Key::PageUp => Some(Self::PrevHeader),
            Key::PageDown => Some(Self::NextHeader),
            _ => None,
        }
    }

    /// Target header index for the panel at `own`
    pub fn resolve(self, group: RovingFocus, own: usize) -> Option<usize> {
        match self {
            Self::OwnHeader => (own < group.len()).then_some(own),
            Self::PrevHeader => group.prev(own),
            Self::NextHeader => group.next(own),
        }
    }
}
