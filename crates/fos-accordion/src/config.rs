//! Accordion configuration
//!
//! Three layers resolve into one immutable [`AccordionConfig`]: library
//! defaults, then instance options, then overrides read from the container's
//! markup. Later layers win. Resolution happens once, at mount time.

use fos_dom::{Document, NodeId};
use serde::Deserialize;

use crate::AccordionResult;

/// Layout direction, used to mirror horizontal arrow keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" => Some(Self::Ltr),
            "rtl" => Some(Self::Rtl),
            _ => None,
        }
    }
}

/// How a generated header button copies the label's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonContent {
    /// Plain text content
    #[default]
    Text,
    /// Deep copy of the label's child nodes
    Html,
}

impl ButtonContent {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "html" => Some(Self::Html),
            _ => None,
        }
    }
}

/// Where each header control comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStrategy {
    /// Create a `<button>` before each panel
    #[default]
    Generate,
    /// Turn the label node itself into the header
    Promote,
}

/// Resolved accordion configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionConfig {
    /// Label nodes, searched inside each panel
    pub headers_selector: String,
    /// Panels, searched inside the container
    pub panels_selector: String,
    /// Generated header controls; routes events to headers
    pub buttons_selector: String,
    /// Class given to generated buttons, matched by `buttons_selector`
    pub button_class: String,
    pub buttons_generated_content: ButtonContent,
    /// Appended to a panel id to form its header id
    pub button_suffix_id: String,
    pub multiselectable: bool,
    pub prefix_class: String,
    pub header_suffix_class: String,
    pub button_suffix_class: String,
    pub panel_suffix_class: String,
    pub direction: Direction,
    /// Prefix of generated container ids
    pub accordion_prefix_id: String,
    pub header_strategy: HeaderStrategy,
    /// Keep exactly one header in the sequential tab order
    pub roving_tabindex: bool,
    /// Ctrl+ArrowUp/PageUp/PageDown from inside a panel
    pub panel_shortcuts: bool,
    /// Panel marker for "opened by default"; consumed at initialization
    pub opened_attribute: String,
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            headers_selector: ".js-accordion__header".to_string(),
            panels_selector: ".js-accordion__panel".to_string(),
            buttons_selector: "button.js-accordion__header".to_string(),
            button_class: "js-accordion__header".to_string(),
            buttons_generated_content: ButtonContent::Text,
            button_suffix_id: "_tab".to_string(),
            multiselectable: true,
            prefix_class: "accordion".to_string(),
            header_suffix_class: "__title".to_string(),
            button_suffix_class: "__header".to_string(),
            panel_suffix_class: "__panel".to_string(),
            direction: Direction::Ltr,
            accordion_prefix_id: "accordion".to_string(),
            header_strategy: HeaderStrategy::Generate,
            roving_tabindex: true,
            panel_shortcuts: true,
            opened_attribute: "data-accordion-opened".to_string(),
        }
    }
}

impl AccordionConfig {
    /// Resolve all layers for one container
    pub fn resolve(doc: &Document, container: NodeId, instance: &AccordionOptions) -> Self {
        Self::default()
            .apply(instance)
            .apply(&AccordionOptions::from_markup(doc, container))
    }

    /// Overlay the options that are set
    pub fn apply(mut self, options: &AccordionOptions) -> Self {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        set(&mut self.headers_selector, &options.headers_selector);
        set(&mut self.panels_selector, &options.panels_selector);
        set(&mut self.buttons_selector, &options.buttons_selector);
        set(&mut self.button_class, &options.button_class);
        set(&mut self.buttons_generated_content, &options.buttons_generated_content);
        set(&mut self.button_suffix_id, &options.button_suffix_id);
        set(&mut self.multiselectable, &options.multiselectable);
        set(&mut self.prefix_class, &options.prefix_class);
        set(&mut self.header_suffix_class, &options.header_suffix_class);
        set(&mut self.button_suffix_class, &options.button_suffix_class);
        set(&mut self.panel_suffix_class, &options.panel_suffix_class);
        set(&mut self.direction, &options.direction);
        set(&mut self.accordion_prefix_id, &options.accordion_prefix_id);
        set(&mut self.header_strategy, &options.header_strategy);
        set(&mut self.roving_tabindex, &options.roving_tabindex);
        set(&mut self.panel_shortcuts, &options.panel_shortcuts);
        set(&mut self.opened_attribute, &options.opened_attribute);
        self
    }

    /// Class added to label nodes
    pub fn header_class(&self) -> String {
        format!("{}{}", self.prefix_class, self.header_suffix_class)
    }

    /// Class added to header controls
    pub fn button_class_name(&self) -> String {
        format!("{}{}", self.prefix_class, self.button_suffix_class)
    }

    /// Class added to panels
    pub fn panel_class(&self) -> String {
        format!("{}{}", self.prefix_class, self.panel_suffix_class)
    }
}

/// Partial configuration layer
///
/// Deserializes from camelCase JSON, e.g.
/// `{"multiselectable": false, "buttonsGeneratedContent": "html"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AccordionOptions {
    pub headers_selector: Option<String>,
    pub panels_selector: Option<String>,
    pub buttons_selector: Option<String>,
    pub button_class: Option<String>,
    pub buttons_generated_content: Option<ButtonContent>,
    pub button_suffix_id: Option<String>,
    pub multiselectable: Option<bool>,
    pub prefix_class: Option<String>,
    pub header_suffix_class: Option<String>,
    pub button_suffix_class: Option<String>,
    pub panel_suffix_class: Option<String>,
    pub direction: Option<Direction>,
    pub accordion_prefix_id: Option<String>,
    pub header_strategy: Option<HeaderStrategy>,
    pub roving_tabindex: Option<bool>,
    pub panel_shortcuts: Option<bool>,
    pub opened_attribute: Option<String>,
}

impl AccordionOptions {
    /// Parse instance options from JSON
    pub fn from_json(json: &str) -> AccordionResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Overrides declared on the container's markup
    ///
    /// - `data-accordion-multiselectable="none"` disables multiselect
    /// - `data-accordion-prefix-classes` replaces the prefix class
    /// - `data-accordion-button-generated-content` picks `text` or `html`
    /// - a nearest `dir="rtl"` (container or ancestor) switches to right-to-left;
    ///   other values leave the direction to the earlier layers
    pub fn from_markup(doc: &Document, container: NodeId) -> Self {
        let tree = doc.tree();
        let attr = |name: &str| tree.get_attribute(container, name);

        let multiselectable = attr("data-accordion-multiselectable")
            .filter(|v| v.trim() == "none")
            .map(|_| false);

        let prefix_class = attr("data-accordion-prefix-classes").map(str::to_string);

        let buttons_generated_content =
            attr("data-accordion-button-generated-content").and_then(|v| {
                let parsed = ButtonContent::parse(v);
                if parsed.is_none() {
                    tracing::warn!("Ignoring unknown generated content {:?} on {:?}", v, container);
                }
                parsed
            });

        let direction = std::iter::once(container)
            .chain(tree.ancestors(container))
            .find_map(|n| tree.get_attribute(n, "dir"))
            .and_then(Direction::parse)
            .filter(|&d| d == Direction::Rtl);

        Self {
            multiselectable,
            prefix_class,
            buttons_generated_content,
            direction,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(doc: &mut Document, attrs: &[(&str, &str)]) -> NodeId {
        let body = doc.body();
        let tree = doc.tree_mut();
        let div = tree.create_element("div");
        tree.append_child(body, div).unwrap();
        for (name, value) in attrs {
            tree.set_attribute(div, name, value).unwrap();
        }
        div
    }

    #[test]
    fn test_library_defaults() {
        let config = AccordionConfig::default();

        assert!(config.multiselectable);
        assert_eq!(config.direction, Direction::Ltr);
        assert_eq!(config.header_class(), "accordion__title");
        assert_eq!(config.button_class_name(), "accordion__header");
        assert_eq!(config.panel_class(), "accordion__panel");
        assert_eq!(config.button_suffix_id, "_tab");
    }

    #[test]
    fn test_options_from_json() {
        let options = AccordionOptions::from_json(
            r#"{"multiselectable": false, "buttonsGeneratedContent": "html", "direction": "rtl", "buttonSuffixId": "-h"}"#,
        )
        .unwrap();

        assert_eq!(options.multiselectable, Some(false));
        assert_eq!(options.buttons_generated_content, Some(ButtonContent::Html));
        assert_eq!(options.direction, Some(Direction::Rtl));
        assert_eq!(options.button_suffix_id.as_deref(), Some("-h"));
        assert_eq!(options.prefix_class, None);
    }

    #[test]
    fn test_options_reject_unknown_fields() {
        assert!(AccordionOptions::from_json(r#"{"multiselect": true}"#).is_err());
        assert!(AccordionOptions::from_json(r#"{"direction": "up"}"#).is_err());
    }

    #[test]
    fn test_layer_precedence() {
        let mut doc = Document::default();
        let div = container(
            &mut doc,
            &[
                ("data-accordion-multiselectable", "none"),
                ("data-accordion-prefix-classes", "faq"),
            ],
        );
        let instance = AccordionOptions {
            multiselectable: Some(true),
            prefix_class: Some("instance".to_string()),
            button_suffix_id: Some("_btn".to_string()),
            ..Default::default()
        };

        let config = AccordionConfig::resolve(&doc, div, &instance);
        assert!(!config.multiselectable, "markup beats instance");
        assert_eq!(config.prefix_class, "faq");
        assert_eq!(config.button_suffix_id, "_btn", "instance beats library");
        assert_eq!(config.panels_selector, ".js-accordion__panel");
    }

    #[test]
    fn test_markup_multiselectable_only_disables() {
        let mut doc = Document::default();
        let div = container(&mut doc, &[("data-accordion-multiselectable", "yes")]);

        assert_eq!(AccordionOptions::from_markup(&doc, div).multiselectable, None);
    }

    #[test]
    fn test_direction_from_ancestor() {
        let mut doc = Document::default();
        let html = doc.document_element();
        doc.set_attribute(html, "dir", "rtl").unwrap();
        let div = container(&mut doc, &[]);

        let config = AccordionConfig::resolve(&doc, div, &AccordionOptions::default());
        assert_eq!(config.direction, Direction::Rtl);

        // The nearest dir wins
        doc.set_attribute(div, "dir", "ltr").unwrap();
        let config = AccordionConfig::resolve(&doc, div, &AccordionOptions::default());
        assert_eq!(config.direction, Direction::Ltr);
    }

    #[test]
    fn test_ltr_markup_keeps_explicit_rtl() {
        let mut doc = Document::default();
        let html = doc.document_element();
        doc.set_attribute(html, "dir", "ltr").unwrap();
        let div = container(&mut doc, &[]);
        let instance = AccordionOptions {
            direction: Some(Direction::Rtl),
            ..Default::default()
        };

        assert_eq!(AccordionOptions::from_markup(&doc, div).direction, None);
        let config = AccordionConfig::resolve(&doc, div, &instance);
        assert_eq!(config.direction, Direction::Rtl);
    }

    #[test]
    fn test_invalid_markup_values_fall_through() {
        let mut doc = Document::default();
        let div = container(
            &mut doc,
            &[("data-accordion-button-generated-content", "markdown"), ("dir", "auto")],
        );
        let instance = AccordionOptions {
            buttons_generated_content: Some(ButtonContent::Html),
            direction: Some(Direction::Rtl),
            ..Default::default()
        };

        let config = AccordionConfig::resolve(&doc, div, &instance);
        assert_eq!(config.buttons_generated_content, ButtonContent::Html);
        assert_eq!(config.direction, Direction::Rtl);
    }
}
