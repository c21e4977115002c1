//! Page text extraction for queries submitted as a URL.

use canonical::{normalize_query, NormalizedQuery};

/// Fetches `url` and returns its visible text, normalized like a typed query.
///
/// Any failure (connect, timeout, non-2xx status, undecodable HTML) yields an
/// empty query; the caller reports insufficient text instead of the cause.
pub async fn fetch_page_text(client: &reqwest::Client, url: &str) -> NormalizedQuery {
    match fetch_html(client, url).await {
        Ok(body) => match html_to_text(&body) {
            Ok(text) => normalize_query(Some(&text)),
            Err(err) => {
                tracing::warn!(url, error = %err, "page_render_failed");
                normalize_query(None)
            }
        },
        Err(err) => {
            tracing::warn!(url, error = %err, "page_fetch_failed");
            normalize_query(None)
        }
    }
}

async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Renders HTML to plain text on a single logical column.
pub fn html_to_text(html: &[u8]) -> Result<String, html2text::Error> {
    html2text::from_read(html, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_visible_text() {
        let html = b"<html><head><title>Role</title></head>\
            <body><h1>Java Developer</h1><p>Works with   the team.</p></body></html>";
        let text = html_to_text(html).unwrap();
        let query = normalize_query(Some(&text));
        assert!(query.as_str().contains("Java Developer"));
        assert!(query.as_str().contains("Works with the team."));
    }

    #[tokio::test]
    async fn unreachable_url_yields_empty_text() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(1))
            .build()
            .unwrap();
        let query = fetch_page_text(&client, "http://127.0.0.1:9/posting").await;
        assert!(query.is_empty());
    }
}
