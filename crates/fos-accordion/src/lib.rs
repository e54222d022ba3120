//! fOS Accordion
//!
//! Accessible accordion widget following the ARIA tabs pattern.
//!
//! Features:
//! - Layered configuration (library defaults, instance options, markup)
//! - One-shot ARIA wiring of headers and panels over existing markup
//! - Single-select and multiselectable collapse policies
//! - Direction-aware roving focus with Home/End and wrap-around
//! - Page-level registry driving events and deferred focus
//!
//! # Example
//! ```rust,ignore
//! use fos_accordion::{AccordionOptions, AccordionPage};
//!
//! let mut page = AccordionPage::new(document);
//! page.mount_all(".js-accordion", &AccordionOptions::default())?;
//! page.click(header)?;
//! page.run_pending()?;
//! ```

mod config;
mod controller;
mod init;
mod keys;
mod page;

pub use config::{AccordionConfig, AccordionOptions, ButtonContent, Direction, HeaderStrategy};
pub use controller::{Accordion, AccordionItem, PanelState};
pub use keys::{KeyMap, NavIntent, PanelIntent};
pub use page::{AccordionPage, FocusTask, DEFAULT_CONTAINER_SELECTOR};

use fos_dom::{DomError, NodeId};

/// Result type for accordion operations
pub type AccordionResult<T> = Result<T, AccordionError>;

/// Accordion error
#[derive(Debug, thiserror::Error)]
pub enum AccordionError {
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Invalid accordion options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("Container {0:?} is already an accordion")]
    AlreadyMounted(NodeId),
}
