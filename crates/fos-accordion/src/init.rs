//! Initializer
//!
//! One-shot ARIA wiring of an existing container. Discovers panels and their
//! labels, builds one header per panel and writes the initial state. Nothing
//! here reacts to events.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

use fos_a11y::aria::attr;
use fos_a11y::{AriaRole, TabIndex, aria_bool};
use fos_dom::{Document, DomError, NodeId, Selector};

use crate::controller::{Accordion, AccordionItem, PanelState};
use crate::{AccordionConfig, AccordionResult, ButtonContent, HeaderStrategy};

/// Alphabet of generated container ids
const ID_ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
const ID_LEN: usize = 10;

/// Wire `container` as an accordion
pub(crate) fn initialize(
    doc: &mut Document,
    container: NodeId,
    config: AccordionConfig,
) -> AccordionResult<Accordion> {
    if doc.tree().element(container).is_none() {
        return Err(match doc.tree().get(container) {
            Some(_) => DomError::NotAnElement(container),
            None => DomError::NotFound(container),
        }
        .into());
    }

    let panels_selector = Selector::parse(&config.panels_selector)?;
    let headers_selector = Selector::parse(&config.headers_selector)?;
    let routing = match config.header_strategy {
        HeaderStrategy::Generate => Selector::parse(&config.buttons_selector)?,
        HeaderStrategy::Promote => headers_selector.clone(),
    };

    let container_id = ensure_container_id(doc, container, &config.accordion_prefix_id)?;
    {
        let tree = doc.tree_mut();
        tree.set_attribute(container, attr::ROLE, AriaRole::TabList.as_str())?;
        tree.set_attribute(container, attr::MULTISELECTABLE, aria_bool(config.multiselectable))?;
        tree.add_class(container, &config.prefix_class)?;
    }

    let panels = panels_selector.query_all(doc.tree(), container);
    let mut items = Vec::with_capacity(panels.len());
    let mut opened = Vec::with_capacity(panels.len());

    for (index, panel) in panels.into_iter().enumerate() {
        let Some(label) = headers_selector.query(doc.tree(), panel) else {
            tracing::warn!("Accordion {}: panel {} has no label, skipping", container_id, index);
            continue;
        };

        let header = match config.header_strategy {
            HeaderStrategy::Generate => generate_button(doc, &config, label, panel)?,
            HeaderStrategy::Promote => label,
        };

        let panel_id = match doc.get_attribute(panel, "id") {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("{}-{}", container_id, index),
        };
        let header_id = format!("{}{}", panel_id, config.button_suffix_id);

        let tree = doc.tree_mut();
        tree.add_class(label, &config.header_class())?;

        tree.set_attribute(header, attr::ROLE, AriaRole::Tab.as_str())?;
        tree.set_attribute(header, "id", &header_id)?;
        tree.set_attribute(header, attr::CONTROLS, &panel_id)?;
        tree.add_class(header, &config.button_class_name())?;

        tree.set_attribute(panel, attr::ROLE, AriaRole::TabPanel.as_str())?;
        tree.set_attribute(panel, "id", &panel_id)?;
        tree.set_attribute(panel, attr::LABELLEDBY, &header_id)?;
        tree.add_class(panel, &config.panel_class())?;

        let marked = tree
            .remove_attribute(panel, &config.opened_attribute)?
            .is_some_and(|v| v.trim() == "true");
        opened.push(marked);

        items.push(AccordionItem {
            header,
            panel,
            label,
            header_id,
            panel_id,
        });
    }

    // Without multiselect only the last marked panel may start open
    if !config.multiselectable {
        if let Some(last) = opened.iter().rposition(|&o| o) {
            for (i, o) in opened.iter_mut().enumerate() {
                *o = i == last;
            }
        }
    }

    let roving = config.roving_tabindex;
    let strategy = config.header_strategy;
    let accordion = Accordion::new(container, container_id, config, items, routing);

    for (index, &is_open) in opened.iter().enumerate() {
        accordion.write_state(doc, index, PanelState::from_expanded(is_open))?;
    }
    accordion.write_selection(doc, None)?;

    for (index, header) in accordion.headers().enumerate() {
        let tab_index = if roving {
            TabIndex::roving(index == 0)
        } else if strategy == HeaderStrategy::Promote {
            TabIndex::TAB_STOP
        } else {
            continue;
        };
        doc.set_attribute(header, attr::TABINDEX, &tab_index.as_attr())?;
    }

    tracing::debug!(
        "Initialized accordion {} with {} panels ({} open)",
        accordion.id(),
        accordion.len(),
        opened.iter().filter(|&&o| o).count()
    );
    Ok(accordion)
}

/// Existing container id, or a fresh unique one
fn ensure_container_id(doc: &mut Document, container: NodeId, prefix: &str) -> AccordionResult<String> {
    if let Some(id) = doc.get_attribute(container, "id").filter(|id| !id.is_empty()) {
        return Ok(id.to_string());
    }

    let state = RandomState::new();
    let mut attempt: u32 = 0;
    let id = loop {
        let candidate = format!("{}-{}", prefix, random_suffix(state.hash_one((container, attempt))));
        if doc.get_element_by_id(&candidate).is_none() {
            break candidate;
        }
        attempt += 1;
    };
    doc.set_attribute(container, "id", &id)?;
    Ok(id)
}

/// Ten base-32 digits taken from the low bits of `bits`
fn random_suffix(mut bits: u64) -> String {
    let mut out = String::with_capacity(ID_LEN);
    for _ in 0..ID_LEN {
        out.push(ID_ALPHABET[(bits & 0x1f) as usize] as char);
        bits >>= 5;
    }
    out
}

/// Create the header button for `panel` and insert it right before it
fn generate_button(
    doc: &mut Document,
    config: &AccordionConfig,
    label: NodeId,
    panel: NodeId,
) -> AccordionResult<NodeId> {
    let tree = doc.tree_mut();
    let parent = tree.parent(panel).ok_or(DomError::NotFound(panel))?;

    let button = tree.create_element("button");
    tree.set_attribute(button, "type", "button")?;
    tree.add_class(button, &config.button_class)?;

    match config.buttons_generated_content {
        ButtonContent::Text => {
            let text = tree.text_content(label);
            let node = tree.create_text(&text);
            tree.append_child(button, node)?;
        }
        ButtonContent::Html => tree.clone_children_into(label, button)?,
    }

    tree.insert_before(parent, button, Some(panel))?;
    Ok(button)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_a11y::parse_aria_bool;

    fn panel_markup(doc: &mut Document, container: NodeId, label: &str, opened: bool) -> NodeId {
        let tree = doc.tree_mut();
        let panel = tree.create_element("div");
        tree.set_attribute(panel, "class", "js-accordion__panel").unwrap();
        if opened {
            tree.set_attribute(panel, "data-accordion-opened", "true").unwrap();
        }
        let title = tree.create_element("h2");
        tree.set_attribute(title, "class", "js-accordion__header").unwrap();
        let em = tree.create_element("em");
        let text = tree.create_text(label);
        tree.append_child(em, text).unwrap();
        tree.append_child(title, em).unwrap();
        tree.append_child(panel, title).unwrap();
        tree.append_child(container, panel).unwrap();
        panel
    }

    fn fixture(opened: &[bool]) -> (Document, NodeId) {
        let mut doc = Document::default();
        let body = doc.body();
        let container = doc.tree_mut().create_element("div");
        doc.tree_mut().append_child(body, container).unwrap();
        for (i, &o) in opened.iter().enumerate() {
            panel_markup(&mut doc, container, &format!("Section {}", i), o);
        }
        (doc, container)
    }

    fn expanded(doc: &Document, node: NodeId) -> Option<bool> {
        doc.get_attribute(node, attr::EXPANDED).and_then(parse_aria_bool)
    }

    #[test]
    fn test_random_suffix_shape() {
        let suffix = random_suffix(u64::MAX);
        assert_eq!(suffix.len(), ID_LEN);
        assert_eq!(suffix, "vvvvvvvvvv");
        assert_eq!(random_suffix(0), "0000000000");
    }

    #[test]
    fn test_container_wiring() {
        let (mut doc, container) = fixture(&[false, false]);
        let accordion = initialize(&mut doc, container, AccordionConfig::default()).unwrap();

        assert_eq!(doc.get_attribute(container, "role"), Some("tablist"));
        assert_eq!(doc.get_attribute(container, attr::MULTISELECTABLE), Some("true"));
        assert!(doc.tree().has_class(container, "accordion"));

        let id = accordion.id();
        assert!(id.starts_with("accordion-"));
        assert_eq!(id.len(), "accordion-".len() + ID_LEN);
        assert_eq!(doc.get_element_by_id(id), Some(container));
    }

    #[test]
    fn test_existing_ids_are_kept() {
        let (mut doc, container) = fixture(&[false, false]);
        doc.set_attribute(container, "id", "faq").unwrap();
        let second_panel = doc.tree().children(container).nth(1).unwrap();
        doc.set_attribute(second_panel, "id", "shipping").unwrap();

        let accordion = initialize(&mut doc, container, AccordionConfig::default()).unwrap();
        let items = accordion.items();

        assert_eq!(accordion.id(), "faq");
        assert_eq!(items[0].panel_id, "faq-0");
        assert_eq!(items[0].header_id, "faq-0_tab");
        assert_eq!(items[1].panel_id, "shipping");
        assert_eq!(items[1].header_id, "shipping_tab");
        assert_eq!(doc.get_attribute(items[1].panel, attr::LABELLEDBY), Some("shipping_tab"));
        assert_eq!(doc.get_attribute(items[1].header, attr::CONTROLS), Some("shipping"));
    }

    #[test]
    fn test_generated_button_precedes_panel() {
        let (mut doc, container) = fixture(&[false]);
        let accordion = initialize(&mut doc, container, AccordionConfig::default()).unwrap();
        let item = &accordion.items()[0];
        let tree = doc.tree();

        let children: Vec<_> = tree.children(container).collect();
        assert_eq!(children, vec![item.header, item.panel]);
        assert_eq!(tree.tag_name(item.header), Some("button"));
        assert_eq!(tree.get_attribute(item.header, "type"), Some("button"));
        assert!(tree.has_class(item.header, "js-accordion__header"));
        assert!(tree.has_class(item.header, "accordion__header"));
        assert!(tree.has_class(item.label, "accordion__title"));
        assert!(tree.has_class(item.panel, "accordion__panel"));
        assert_eq!(tree.inner_html(item.header), "Section 0");
    }

    #[test]
    fn test_html_content_is_copied() {
        let (mut doc, container) = fixture(&[false]);
        let config = AccordionConfig {
            buttons_generated_content: ButtonContent::Html,
            ..Default::default()
        };
        let accordion = initialize(&mut doc, container, config).unwrap();
        let item = &accordion.items()[0];

        assert_eq!(doc.tree().inner_html(item.header), "<em>Section 0</em>");
        // The label keeps its own content
        assert_eq!(doc.tree().inner_html(item.label), "<em>Section 0</em>");
    }

    #[test]
    fn test_initial_state_and_roving() {
        let (mut doc, container) = fixture(&[false, true, false]);
        let accordion = initialize(&mut doc, container, AccordionConfig::default()).unwrap();

        let states: Vec<_> = accordion.headers().map(|h| expanded(&doc, h)).collect();
        assert_eq!(states, [Some(false), Some(true), Some(false)]);

        for item in accordion.items() {
            assert_eq!(doc.get_attribute(item.header, attr::SELECTED), Some("false"));
            assert!(!doc.tree().has_attribute(item.panel, "data-accordion-opened"));
        }
        assert_eq!(doc.get_attribute(accordion.items()[1].panel, attr::HIDDEN), Some("false"));

        let tab_stops: Vec<_> = accordion
            .headers()
            .map(|h| doc.get_attribute(h, attr::TABINDEX).unwrap_or_default().to_string())
            .collect();
        assert_eq!(tab_stops, ["0", "-1", "-1"]);
    }

    #[test]
    fn test_single_select_keeps_last_opened() {
        let (mut doc, container) = fixture(&[true, false, true]);
        let config = AccordionConfig {
            multiselectable: false,
            ..Default::default()
        };
        let accordion = initialize(&mut doc, container, config).unwrap();

        assert_eq!(accordion.expanded_indices(&doc), vec![2]);
        assert_eq!(doc.get_attribute(container, attr::MULTISELECTABLE), Some("false"));
    }

    #[test]
    fn test_opened_marker_must_be_true() {
        let (mut doc, container) = fixture(&[false]);
        let panel = doc.tree().children(container).next().unwrap();
        doc.set_attribute(panel, "data-accordion-opened", "false").unwrap();

        let accordion = initialize(&mut doc, container, AccordionConfig::default()).unwrap();
        assert!(accordion.expanded_indices(&doc).is_empty());
        assert!(!doc.tree().has_attribute(panel, "data-accordion-opened"));
    }

    #[test]
    fn test_unlabelled_panel_is_skipped() {
        let (mut doc, container) = fixture(&[false, false]);
        let bare = doc.tree_mut().create_element("div");
        doc.tree_mut().set_attribute(bare, "class", "js-accordion__panel").unwrap();
        let first = doc.tree().children(container).next();
        doc.tree_mut().insert_before(container, bare, first).unwrap();

        let accordion = initialize(&mut doc, container, AccordionConfig::default()).unwrap();
        assert_eq!(accordion.len(), 2);
        assert_eq!(doc.get_attribute(bare, "role"), None);
        // Ids keep the panel's position among all panels
        assert!(accordion.items()[0].panel_id.ends_with("-1"));
    }

    #[test]
    fn test_promote_strategy() {
        let (mut doc, container) = fixture(&[false, false]);
        let config = AccordionConfig {
            header_strategy: HeaderStrategy::Promote,
            ..Default::default()
        };
        let accordion = initialize(&mut doc, container, config).unwrap();

        for item in accordion.items() {
            assert_eq!(item.header, item.label);
            assert_eq!(doc.tree().tag_name(item.header), Some("h2"));
            assert_eq!(doc.get_attribute(item.header, "role"), Some("tab"));
        }
        // No buttons were created
        assert_eq!(doc.tree().children(container).count(), 2);
    }

    #[test]
    fn test_promote_without_roving_keeps_headers_focusable() {
        let (mut doc, container) = fixture(&[false, false]);
        let config = AccordionConfig {
            header_strategy: HeaderStrategy::Promote,
            roving_tabindex: false,
            ..Default::default()
        };
        let accordion = initialize(&mut doc, container, config).unwrap();

        for header in accordion.headers() {
            assert_eq!(doc.get_attribute(header, attr::TABINDEX), Some("0"));
        }
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let (mut doc, container) = fixture(&[false]);
        let config = AccordionConfig {
            panels_selector: "div >".to_string(),
            ..Default::default()
        };
        assert!(initialize(&mut doc, container, config).is_err());
    }

    #[test]
    fn test_text_container_is_rejected() {
        let mut doc = Document::default();
        let text = doc.tree_mut().create_text("not a container");
        let err = initialize(&mut doc, text, AccordionConfig::default()).unwrap_err();
        assert!(matches!(err, crate::AccordionError::Dom(DomError::NotAnElement(_))));
    }
}
