use crate::UrlError;
use url::Url;

/// Normalizes a URL string according to Ripple-Seek's address rules
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` schemes
/// 3. Require a host (the parser already lowercases it)
/// 4. Remove fragment (everything after #)
/// 5. Sort query parameters by key
/// 6. Remove empty query string (trailing ?)
///
/// Dot segments are resolved by the parser. The path is otherwise left alone:
/// a trailing slash changes how relative links resolve, so it is significant.
/// Query parameters are never dropped; any of them may select a different
/// document.
///
/// # Examples
///
/// ```
/// use ripple_seek::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.COM/a/../page?b=2&a=1#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page?a=1&b=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Applies normalization to an already parsed URL
pub(crate) fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let original: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let sorted = sort_query_params(&original);

        if sorted.is_empty() {
            url.set_query(None);
        } else if sorted != original {
            url.query_pairs_mut().clear().extend_pairs(sorted);
        }
    }

    Ok(url)
}

/// Sorts query parameters by key
fn sort_query_params(params: &[(String, String)]) -> Vec<(String, String)> {
    let mut sorted = params.to_vec();

    // Stable sort keeps repeated keys in their original order
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    sorted
}
