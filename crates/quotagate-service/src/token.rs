//! Token extraction from subscriber connection URLs.

use url::Url;

/// Query parameter carrying the billing token.
const TOKEN_PARAM: &str = "token";

/// Extract the `token` query parameter from a connection URL.
///
/// Accepts absolute URLs of any scheme (`rtmp://`, `http://`, `ws://`) as
/// well as bare `path?query` strings. An empty value counts as absent.
pub fn extract_token(connection_url: &str) -> Option<String> {
    let value = match Url::parse(connection_url) {
        Ok(url) => url
            .query_pairs()
            .find(|(key, _)| key == TOKEN_PARAM)
            .map(|(_, value)| value.into_owned()),
        Err(_) => {
            let without_fragment = connection_url.split('#').next().unwrap_or_default();
            let (_, query) = without_fragment.split_once('?')?;
            url::form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == TOKEN_PARAM)
                .map(|(_, value)| value.into_owned())
        }
    };

    value.filter(|token| !token.is_empty())
}
