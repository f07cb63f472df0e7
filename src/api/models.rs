//! Wire models for the storefront endpoints

use serde::Deserialize;

/// One product hit from the live-search endpoint.
///
/// The server returns a JSON array of these for `GET /search/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub slug: String,
}

/// Reply to the checkout POST.
///
/// The happy path carries `success: true` plus a redirect URL. Rejections
/// sometimes arrive as a bare `{"error": ...}` with no `success` key at
/// all, which must read as a failure rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_array_decodes() {
        let json = r#"[{"name": "Shimano Stradic", "slug": "shimano-stradic"},
                       {"name": "Daiwa Ninja", "slug": "daiwa-ninja"}]"#;
        let products: Vec<ProductSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].slug, "shimano-stradic");
    }

    #[test]
    fn order_success_decodes() {
        let json = r#"{"success": true, "redirect_url": "/"}"#;
        let resp: OrderResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.redirect_url.as_deref(), Some("/"));
    }

    #[test]
    fn bare_error_reads_as_failure() {
        let json = r#"{"error": "Your card was declined."}"#;
        let resp: OrderResponse = serde_json::from_str(json).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("Your card was declined."));
    }
}
