//! Product QR payloads. Image rendering is left to the caller.

use url::Url;

use crate::errors::ServiceError;

/// Link encoded in a product's QR code.
///
/// Bases that already carry a query, or end in a file-like segment
/// (`/product.html`), receive the id as an `id` query parameter; any other
/// base gets it appended as a path segment.
pub fn product_url(base: &str, pro_id: &str) -> Result<String, ServiceError> {
    let mut url = Url::parse(base.trim())
        .map_err(|e| ServiceError::ConfigError(format!("invalid QR base URL '{base}': {e}")))?;

    let file_like = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|last| last.contains('.'))
        .unwrap_or(false);

    if url.query().is_some() || file_like {
        url.query_pairs_mut().append_pair("id", pro_id);
    } else {
        url.path_segments_mut()
            .map_err(|_| ServiceError::ConfigError(format!("QR base URL '{base}' cannot hold a path")))?
            .pop_if_empty()
            .push(pro_id);
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://estate.lk/product", "PRO-001", "https://estate.lk/product/PRO-001")]
    #[case("https://estate.lk/product/", "PRO-001", "https://estate.lk/product/PRO-001")]
    #[case("https://estate.lk/view.html", "PRO-001", "https://estate.lk/view.html?id=PRO-001")]
    #[case("https://estate.lk/view?src=qr", "PRO-001", "https://estate.lk/view?src=qr&id=PRO-001")]
    #[case("https://estate.lk/p", "A B", "https://estate.lk/p/A%20B")]
    fn product_url_shapes(#[case] base: &str, #[case] id: &str, #[case] expected: &str) {
        assert_eq!(product_url(base, id).unwrap(), expected);
    }

    #[test]
    fn invalid_base_is_a_config_error() {
        assert!(matches!(
            product_url("not a url", "PRO-001"),
            Err(ServiceError::ConfigError(_))
        ));
    }
}
