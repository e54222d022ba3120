//! Accordion Page
//!
//! Owns a document together with every accordion mounted on it and the
//! deferred focus queue. Events are dispatched to the accordions containing
//! their target, innermost first, until one stops propagation. Focus moves
//! requested by handlers run on the next turn through [`AccordionPage::run_pending`].

use std::collections::HashMap;

use fos_dom::{Document, DomEvent, Key, Modifiers, NodeId, TaskQueue};

use crate::init::initialize;
use crate::{Accordion, AccordionConfig, AccordionError, AccordionOptions, AccordionResult};

/// Containers picked up by [`AccordionPage::mount_all`] by default
pub const DEFAULT_CONTAINER_SELECTOR: &str = ".js-accordion";

/// Deferred focus request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusTask {
    /// Accordion that asked for the move
    pub container: NodeId,
    /// Header to focus
    pub target: NodeId,
}

/// Document plus its accordion registry
#[derive(Debug)]
pub struct AccordionPage {
    document: Document,
    accordions: HashMap<NodeId, Accordion>,
    tasks: TaskQueue<FocusTask>,
}

impl AccordionPage {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            accordions: HashMap::new(),
            tasks: TaskQueue::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Initialize `container` and register it
    pub fn mount(
        &mut self,
        container: NodeId,
        options: &AccordionOptions,
    ) -> AccordionResult<&Accordion> {
        if self.accordions.contains_key(&container) {
            return Err(AccordionError::AlreadyMounted(container));
        }

        let config = AccordionConfig::resolve(&self.document, container, options);
        let accordion = initialize(&mut self.document, container, config)?;
        tracing::debug!("Mounted accordion {} on {:?}", accordion.id(), container);

        Ok(self.accordions.entry(container).or_insert(accordion))
    }

    /// Mount every container matching `selector`, in document order
    ///
    /// Containers that are already mounted are left alone. Returns the newly
    /// mounted containers.
    pub fn mount_all(
        &mut self,
        selector: &str,
        options: &AccordionOptions,
    ) -> AccordionResult<Vec<NodeId>> {
        let containers = self.document.query_selector_all(NodeId::ROOT, selector)?;
        let mut mounted = Vec::with_capacity(containers.len());

        for container in containers {
            if self.accordions.contains_key(&container) {
                tracing::debug!("Skipping mounted accordion {:?}", container);
                continue;
            }
            self.mount(container, options)?;
            mounted.push(container);
        }

        tracing::debug!("Mounted {} accordions matching {:?}", mounted.len(), selector);
        Ok(mounted)
    }

    /// Accordion registered on `container`
    pub fn accordion(&self, container: NodeId) -> Option<&Accordion> {
        self.accordions.get(&container)
    }

    /// Innermost accordion containing `node`
    pub fn accordion_for(&self, node: NodeId) -> Option<&Accordion> {
        self.containers_of(node)
            .first()
            .and_then(|c| self.accordions.get(c))
    }

    pub fn len(&self) -> usize {
        self.accordions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accordions.is_empty()
    }

    /// Focus tasks waiting for the next turn
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Registered containers holding `node`, innermost first
    fn containers_of(&self, node: NodeId) -> Vec<NodeId> {
        std::iter::once(node)
            .chain(self.document.tree().ancestors(node))
            .filter(|n| self.accordions.contains_key(n))
            .collect()
    }

    // ------------------------------------------------------------------
    // Event dispatch
    // ------------------------------------------------------------------

    /// Run one event to completion
    ///
    /// Returns the event so callers can inspect its flags.
    pub fn dispatch(&mut self, mut event: DomEvent) -> AccordionResult<DomEvent> {
        for container in self.containers_of(event.target) {
            let Some(accordion) = self.accordions.get(&container) else {
                continue;
            };
            if let Some(target) = accordion.handle_event(&mut self.document, &mut event)? {
                self.tasks.post(FocusTask { container, target });
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        Ok(event)
    }

    pub fn click(&mut self, target: NodeId) -> AccordionResult<DomEvent> {
        self.dispatch(DomEvent::click(target))
    }

    /// Move input focus to `target` and fire a focus event
    ///
    /// Returns `None` when `target` already had focus.
    pub fn focus(&mut self, target: NodeId) -> AccordionResult<Option<DomEvent>> {
        if !self.document.focus(target)? {
            return Ok(None);
        }
        self.dispatch(DomEvent::focus(target)).map(Some)
    }

    pub fn key_down(
        &mut self,
        target: NodeId,
        key: Key,
        modifiers: Modifiers,
    ) -> AccordionResult<DomEvent> {
        self.dispatch(DomEvent::key_down(target, key, modifiers))
    }

    /// Run the focus tasks posted before this turn
    ///
    /// Tasks posted while running land in the next turn. Returns the number
    /// of tasks run.
    pub fn run_pending(&mut self) -> AccordionResult<usize> {
        let tasks = self.tasks.take_turn();
        let count = tasks.len();

        for task in tasks {
            tracing::trace!("Deferred focus {:?} for {:?}", task.target, task.container);
            self.focus(task.target)?;
        }
        Ok(count)
    }
}
