//! Example: mount accordions on a page and drive them from the keyboard
//!
//! Run with `RUST_LOG=fos_accordion=trace` to watch the transitions.

use fos_accordion::{AccordionOptions, AccordionPage, DEFAULT_CONTAINER_SELECTOR};
use fos_dom::{Key, Modifiers};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"
<!DOCTYPE html>
<html>
<body>
  <div class="js-accordion" data-accordion-multiselectable="none" data-accordion-prefix-classes="faq">
    <div class="js-accordion__panel" data-accordion-opened="true">
      <h2 class="js-accordion__header">Shipping</h2>
      <p>Orders leave the warehouse within two days.</p>
    </div>
    <div class="js-accordion__panel">
      <h2 class="js-accordion__header">Returns</h2>
      <p>Unused items can be returned for thirty days.</p>
    </div>
    <div class="js-accordion__panel">
      <h2 class="js-accordion__header">Warranty</h2>
      <p>Two years on every device.</p>
    </div>
  </div>
</body>
</html>
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let document = fos_html::parse(PAGE)?;
    let mut page = AccordionPage::new(document);
    let options = AccordionOptions::from_json(r#"{"buttonSuffixId": "-tab"}"#)?;
    let mounted = page.mount_all(DEFAULT_CONTAINER_SELECTOR, &options)?;
    println!("Mounted {} accordion(s)", mounted.len());

    let Some(&container) = mounted.first() else {
        return Ok(());
    };
    let Some(first) = page.accordion(container).and_then(|a| a.headers().next()) else {
        return Ok(());
    };

    // Tab into the widget, jump to the last header and open it
    page.focus(first)?;
    page.key_down(first, Key::End, Modifiers::NONE)?;
    page.run_pending()?;
    if let Some(active) = page.document().active_element() {
        page.click(active)?;
        page.run_pending()?;
    }

    let doc = page.document();
    if let Some(accordion) = page.accordion(container) {
        for item in accordion.items() {
            println!(
                "{:<12} expanded={:<5} selected={}",
                item.header_id,
                doc.get_attribute(item.header, "aria-expanded").unwrap_or("?"),
                doc.get_attribute(item.header, "aria-selected").unwrap_or("?"),
            );
        }
    }
    println!("\n{}", doc.tree().inner_html(container));
    Ok(())
}
