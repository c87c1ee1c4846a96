//! Extraction schema applied to a rendered page.
//!
//! Operates on the serialized DOM of the page (after scripts ran), so the
//! same schema is used for live sessions and for fixture HTML in tests.

use scraper::{ElementRef, Html, Selector};

use super::error::ScrapeError;
use super::types::ExtractionResult;

const TITLE_SELECTOR: &str = "title";
const META_DESCRIPTION_SELECTOR: &str = r#"meta[name="description"]"#;
const H1_SELECTOR: &str = "h1";

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Extraction(format!("selector {css}: {e}")))
}

/// Raw text content of an element, as `textContent` reports it.
fn raw_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Visible text of an element with whitespace runs collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply the extraction schema to a document.
///
/// Only the first match in document order is used for each field.
pub fn extract_page_summary(html: &str) -> Result<ExtractionResult, ScrapeError> {
    let document = Html::parse_document(html);

    // `<title>` is never rendered, so its text is kept verbatim.
    let title = document
        .select(&selector(TITLE_SELECTOR)?)
        .next()
        .map(raw_text)
        .unwrap_or_default();

    let meta_description = document
        .select(&selector(META_DESCRIPTION_SELECTOR)?)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
        .unwrap_or_default();

    let h1 = document
        .select(&selector(H1_SELECTOR)?)
        .next()
        .map(element_text)
        .unwrap_or_default();

    Ok(ExtractionResult {
        title,
        meta_description,
        h1,
    })
}
