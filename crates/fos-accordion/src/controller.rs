//! Event Controller
//!
//! Runtime state machine of one accordion. Each header/panel pair is either
//! collapsed or expanded; the DOM attributes are the observable state and
//! are rewritten on every transition:
//!
//! - `aria-expanded` on the header always equals `!aria-hidden` on its panel
//! - without multiselect, at most one pair is expanded after any handler
//! - focus moves are returned to the caller, which defers them to the next
//!   event-loop turn so attribute writes land first

use std::collections::HashMap;

use fos_a11y::aria::attr;
use fos_a11y::{RovingFocus, TabIndex, aria_bool, parse_aria_bool};
use fos_dom::{Document, DomEvent, EventType, Key, Modifiers, NodeId, Selector};

use crate::keys::{KeyMap, PanelIntent};
use crate::{AccordionConfig, AccordionResult};

/// One header/panel pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionItem {
    /// Interactive header (`role=tab`)
    pub header: NodeId,
    /// Content region (`role=tabpanel`)
    pub panel: NodeId,
    /// Label node the header was built from (the header itself when promoted)
    pub label: NodeId,
    pub header_id: String,
    pub panel_id: String,
}

/// State of a header/panel pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Collapsed,
    Expanded,
}

impl PanelState {
    pub fn from_expanded(expanded: bool) -> Self {
        if expanded { Self::Expanded } else { Self::Collapsed }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, Self::Expanded)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }
}

/// An initialized accordion instance
///
/// Owns the header/panel index built at initialization. The document is
/// passed to every operation; the page registry owns both.
#[derive(Debug, Clone)]
pub struct Accordion {
    container: NodeId,
    id: String,
    config: AccordionConfig,
    items: Vec<AccordionItem>,
    header_index: HashMap<NodeId, usize>,
    panel_index: HashMap<NodeId, usize>,
    /// Resolves event targets to header controls
    routing: Selector,
    keys: KeyMap,
}

impl Accordion {
    pub(crate) fn new(
        container: NodeId,
        id: String,
        config: AccordionConfig,
        items: Vec<AccordionItem>,
        routing: Selector,
    ) -> Self {
        let header_index = items.iter().enumerate().map(|(i, it)| (it.header, i)).collect();
        let panel_index = items.iter().enumerate().map(|(i, it)| (it.panel, i)).collect();
        let keys = KeyMap::new(config.direction);
        Self {
            container,
            id,
            config,
            items,
            header_index,
            panel_index,
            routing,
            keys,
        }
    }

    /// Container element (`role=tablist`)
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Container `id`
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &AccordionConfig {
        &self.config
    }

    pub fn items(&self) -> &[AccordionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().map(|it| it.header)
    }

    pub fn panels(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.items.iter().map(|it| it.panel)
    }

    /// Index of a header node
    pub fn header_position(&self, header: NodeId) -> Option<usize> {
        self.header_index.get(&header).copied()
    }

    /// Index of a panel node
    pub fn panel_position(&self, panel: NodeId) -> Option<usize> {
        self.panel_index.get(&panel).copied()
    }

    fn group(&self) -> RovingFocus {
        RovingFocus::new(self.items.len())
    }

    // ------------------------------------------------------------------
    // State queries
    // ------------------------------------------------------------------

    /// Current state of pair `index`, read from its header
    pub fn state(&self, doc: &Document, index: usize) -> Option<PanelState> {
        let item = self.items.get(index)?;
        let expanded = doc
            .get_attribute(item.header, attr::EXPANDED)
            .and_then(parse_aria_bool)
            .unwrap_or(false);
        Some(PanelState::from_expanded(expanded))
    }

    pub fn is_expanded(&self, doc: &Document, index: usize) -> bool {
        self.state(doc, index).is_some_and(|s| s.is_expanded())
    }

    pub fn expanded_indices(&self, doc: &Document) -> Vec<usize> {
        (0..self.items.len())
            .filter(|&i| self.is_expanded(doc, i))
            .collect()
    }

    /// Headers with `aria-selected=true`
    pub fn selected_indices(&self, doc: &Document) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, it)| doc.get_attribute(it.header, attr::SELECTED) == Some("true"))
            .map(|(i, _)| i)
            .collect()
    }

    /// The selected header, when exactly one is selected
    pub fn selected_index(&self, doc: &Document) -> Option<usize> {
        match self.selected_indices(doc).as_slice() {
            [one] => Some(*one),
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Attribute writes
    // ------------------------------------------------------------------

    pub(crate) fn write_state(
        &self,
        doc: &mut Document,
        index: usize,
        state: PanelState,
    ) -> AccordionResult<()> {
        let Some(item) = self.items.get(index) else {
            return Ok(());
        };
        let expanded = state.is_expanded();
        doc.set_attribute(item.header, attr::EXPANDED, aria_bool(expanded))?;
        doc.set_attribute(item.panel, attr::HIDDEN, aria_bool(!expanded))?;
        Ok(())
    }

    /// Mark `selected` as the only selected header (none when `None`)
    ///
    /// With roving tabindex the selected header also becomes the single tab
    /// stop; clearing the selection leaves tab stops untouched.
    pub(crate) fn write_selection(
        &self,
        doc: &mut Document,
        selected: Option<usize>,
    ) -> AccordionResult<()> {
        for (i, item) in self.items.iter().enumerate() {
            let is_selected = selected == Some(i);
            doc.set_attribute(item.header, attr::SELECTED, aria_bool(is_selected))?;
            if self.config.roving_tabindex && selected.is_some() {
                let tab_index = TabIndex::roving(is_selected).as_attr();
                doc.set_attribute(item.header, attr::TABINDEX, &tab_index)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Toggle pair `index`, collapsing the others without multiselect
    ///
    /// Returns the header to focus after the current turn.
    pub fn activate(&self, doc: &mut Document, index: usize) -> AccordionResult<Option<NodeId>> {
        let Some(previous) = self.state(doc, index) else {
            return Ok(None);
        };
        let next = previous.toggled();
        self.write_state(doc, index, next)?;

        if !self.config.multiselectable {
            for other in (0..self.items.len()).filter(|&i| i != index) {
                self.write_state(doc, other, PanelState::Collapsed)?;
            }
        }

        self.write_selection(doc, Some(index))?;
        tracing::trace!("Accordion {}: header {} {:?} -> {:?}", self.id, index, previous, next);
        Ok(Some(self.items[index].header))
    }

    /// Header `index` received input focus
    pub fn focus_header(&self, doc: &mut Document, index: usize) -> AccordionResult<()> {
        if index >= self.items.len() {
            return Ok(());
        }
        tracing::trace!("Accordion {}: header {} focused", self.id, index);
        self.write_selection(doc, Some(index))
    }

    /// Roving-focus move from header `from`
    ///
    /// Returns the header to focus after the current turn, or `None` when the
    /// key is not a navigation key or the target cannot be resolved.
    pub fn navigate(
        &self,
        doc: &mut Document,
        from: usize,
        key: &Key,
        modifiers: Modifiers,
    ) -> AccordionResult<Option<NodeId>> {
        let Some(intent) = self.keys.intent(key, modifiers) else {
            return Ok(None);
        };
        match intent.resolve(self.group(), from) {
            Some(target) => self.go_to_header(doc, target),
            None => Ok(None),
        }
    }

    /// Ctrl shortcut pressed inside panel `panel`
    pub fn panel_shortcut(
        &self,
        doc: &mut Document,
        panel: usize,
        key: &Key,
        modifiers: Modifiers,
    ) -> AccordionResult<Option<NodeId>> {
        if !self.config.panel_shortcuts {
            return Ok(None);
        }
        let Some(intent) = PanelIntent::from_key(key, modifiers) else {
            return Ok(None);
        };
        match intent.resolve(self.group(), panel) {
            Some(target) => self.go_to_header(doc, target),
            None => Ok(None),
        }
    }

    /// Select header `target` ahead of its deferred focus
    ///
    /// No-op unless the header id resolves to exactly this header.
    fn go_to_header(&self, doc: &mut Document, target: usize) -> AccordionResult<Option<NodeId>> {
        let Some(item) = self.items.get(target) else {
            return Ok(None);
        };
        if doc.elements_by_id(&item.header_id) != [item.header] {
            tracing::debug!(
                "Accordion {}: header id {:?} does not resolve uniquely, ignoring move",
                self.id,
                item.header_id
            );
            return Ok(None);
        }

        self.write_selection(doc, Some(target))?;
        tracing::trace!("Accordion {}: roving focus -> header {}", self.id, target);
        Ok(Some(item.header))
    }

    // ------------------------------------------------------------------
    // Event routing
    // ------------------------------------------------------------------

    /// Header owning an event target, if it is one of ours
    fn header_for(&self, doc: &Document, target: NodeId) -> Option<usize> {
        let node = self.routing.closest(doc.tree(), target)?;
        self.header_position(node)
    }

    /// Panel containing an event target
    fn panel_for(&self, doc: &Document, target: NodeId) -> Option<usize> {
        std::iter::once(target)
            .chain(doc.tree().ancestors(target))
            .take_while(|&n| n != self.container)
            .find_map(|n| self.panel_position(n))
    }

    /// Run the handler for one event
    ///
    /// Returns the header that should receive focus once the current turn
    /// completes.
    pub fn handle_event(
        &self,
        doc: &mut Document,
        event: &mut DomEvent,
    ) -> AccordionResult<Option<NodeId>> {
        if let Some(index) = self.header_for(doc, event.target) {
            return match event.event_type {
                EventType::Click => {
                    let focus = self.activate(doc, index)?;
                    event.prevent_default();
                    event.stop_propagation();
                    Ok(focus)
                }
                EventType::Focus => {
                    self.focus_header(doc, index)?;
                    Ok(None)
                }
                EventType::KeyDown => {
                    let Some(key) = event.key.clone() else {
                        return Ok(None);
                    };
                    let focus = self.navigate(doc, index, &key, event.modifiers)?;
                    if focus.is_some() {
                        event.prevent_default();
                        return Ok(focus);
                    }
                    // A promoted header sits inside its panel; ctrl keys
                    // belong to the panel shortcuts
                    if !event.modifiers.ctrl {
                        return Ok(None);
                    }
                    self.panel_key_down(doc, event)
                }
            };
        }

        if event.event_type != EventType::KeyDown {
            return Ok(None);
        }
        self.panel_key_down(doc, event)
    }

    fn panel_key_down(
        &self,
        doc: &mut Document,
        event: &mut DomEvent,
    ) -> AccordionResult<Option<NodeId>> {
        let (Some(panel), Some(key)) = (self.panel_for(doc, event.target), event.key.clone()) else {
            return Ok(None);
        };
        let focus = self.panel_shortcut(doc, panel, &key, event.modifiers)?;
        if focus.is_some() {
            event.prevent_default();
        }
        Ok(focus)
    }
}
