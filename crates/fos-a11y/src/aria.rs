//! ARIA Support
//!
//! ARIA roles and the state/property attribute names widgets write.

use std::str::FromStr;

use crate::A11yError;

/// ARIA role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    // Landmark roles
    Main,
    Navigation,
    Region,

    // Widget roles
    Button,
    Link,
    Tab,
    TabList,
    TabPanel,

    // Document structure
    Group,
    Heading,
    Presentation,
}

impl AriaRole {
    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim().to_ascii_lowercase().as_str() {
            "main" => Self::Main,
            "navigation" => Self::Navigation,
            "region" => Self::Region,
            "button" => Self::Button,
            "link" => Self::Link,
            "tab" => Self::Tab,
            "tablist" => Self::TabList,
            "tabpanel" => Self::TabPanel,
            "group" => Self::Group,
            "heading" => Self::Heading,
            "none" | "presentation" => Self::Presentation,
            _ => return None,
        })
    }

    /// Attribute value for `role`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Navigation => "navigation",
            Self::Region => "region",
            Self::Button => "button",
            Self::Link => "link",
            Self::Tab => "tab",
            Self::TabList => "tablist",
            Self::TabPanel => "tabpanel",
            Self::Group => "group",
            Self::Heading => "heading",
            Self::Presentation => "presentation",
        }
    }

    /// Check if role is widget
    pub fn is_widget(&self) -> bool {
        matches!(self, Self::Button | Self::Link | Self::Tab)
    }

    /// Check if role is landmark
    pub fn is_landmark(&self) -> bool {
        matches!(self, Self::Main | Self::Navigation | Self::Region)
    }
}

impl FromStr for AriaRole {
    type Err = A11yError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| A11yError::InvalidRole(s.to_string()))
    }
}

impl std::fmt::Display for AriaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute names
pub mod attr {
    pub const ROLE: &str = "role";
    pub const TABINDEX: &str = "tabindex";
    pub const CONTROLS: &str = "aria-controls";
    pub const LABELLEDBY: &str = "aria-labelledby";
    pub const EXPANDED: &str = "aria-expanded";
    pub const SELECTED: &str = "aria-selected";
    pub const HIDDEN: &str = "aria-hidden";
    pub const MULTISELECTABLE: &str = "aria-multiselectable";
}

/// Boolean ARIA state value
pub fn aria_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Parse a boolean ARIA state value
pub fn parse_aria_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
