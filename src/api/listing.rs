use scraper::{Html, Selector};
use url::Url;

/// Collect the `src` of every preview element on a listing page, in document
/// order. Relative sources are resolved against `page_url`.
pub fn extract_preview_urls(html: &str, selector: &Selector, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut image_urls = Vec::new();

    for element in document.select(selector) {
        let Some(src) = element.value().attr("src") else {
            continue;
        };
        let src = src.trim();
        if src.is_empty() {
            continue;
        }

        match page_url.join(src) {
            Ok(url) => image_urls.push(url.to_string()),
            Err(e) => tracing::warn!("skipping unparsable image source {:?}: {}", src, e),
        }
    }

    image_urls
}
