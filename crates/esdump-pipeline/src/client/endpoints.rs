//! Cluster endpoint URL builders

use super::SCROLL_KEEP_ALIVE;

/// Build document count URL
pub fn count_url(base_url: &str, index: &str) -> String {
    format!("{}/{}/_count", base_url, urlencoding::encode(index))
}

/// Build the URL that opens a scroll cursor
pub fn search_url(base_url: &str, index: &str, size: usize) -> String {
    format!(
        "{}/{}/_search?scroll={}&size={}",
        base_url,
        urlencoding::encode(index),
        SCROLL_KEEP_ALIVE,
        size
    )
}

/// Build the scroll continuation / release URL
pub fn scroll_url(base_url: &str) -> String {
    format!("{}/_search/scroll", base_url)
}

/// Build single document URL
pub fn document_url(base_url: &str, index: &str, id: &str) -> String {
    format!(
        "{}/{}/_doc/{}?refresh=false",
        base_url,
        urlencoding::encode(index),
        urlencoding::encode(id)
    )
}

/// Build mapping URL
pub fn mapping_url(base_url: &str, index: &str) -> String {
    format!("{}/{}/_mapping", base_url, urlencoding::encode(index))
}

/// Build settings URL
pub fn settings_url(base_url: &str, index: &str) -> String {
    format!("{}/{}/_settings", base_url, urlencoding::encode(index))
}
