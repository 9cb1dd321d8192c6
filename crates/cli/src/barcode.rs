//! Barcode lookup against Open Food Facts.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from barcode handling.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Barcode is blank or has non-digit characters.
    #[error("invalid barcode '{0}': expected digits only")]
    InvalidBarcode(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status.
    #[error("Open Food Facts returned {0}")]
    Status(u16),

    /// Body did not parse.
    #[error("parse error: {0}")]
    Parse(String),

    /// The configured base URL cannot take path segments.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Trim a manually entered barcode and check it is all digits.
///
/// # Errors
///
/// Returns `LookupError::InvalidBarcode` for blank or non-numeric input.
pub fn normalize_barcode(raw: &str) -> Result<String, LookupError> {
    let code = raw.trim();
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(LookupError::InvalidBarcode(raw.to_string()));
    }
    Ok(code.to_string())
}

/// What Open Food Facts knows about a barcode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInfo {
    pub found: bool,
    pub name: Option<String>,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    status: i64,
    product: Option<LookupProduct>,
}

#[derive(Deserialize)]
struct LookupProduct {
    product_name: Option<String>,
}

impl From<LookupResponse> for ProductInfo {
    fn from(response: LookupResponse) -> Self {
        if response.status != 1 {
            return Self::default();
        }
        Self {
            found: true,
            name: response
                .product
                .and_then(|p| p.product_name)
                .filter(|name| !name.trim().is_empty()),
        }
    }
}

/// Product name to put in the form after a scan.
///
/// A found product's name wins; a found product without a name, or an
/// unknown barcode with nothing typed yet, gets the barcode itself.
#[must_use]
pub fn resolve_name(info: &ProductInfo, typed_name: &str, barcode: &str) -> String {
    let typed = typed_name.trim();
    match (&info.name, info.found) {
        (Some(name), true) => name.clone(),
        (_, true) => barcode.to_string(),
        (_, false) if typed.is_empty() => barcode.to_string(),
        (_, false) => typed.to_string(),
    }
}

/// Open Food Facts API client.
#[derive(Clone)]
pub struct OpenFoodFactsClient {
    inner: Arc<OpenFoodFactsInner>,
}

struct OpenFoodFactsInner {
    client: reqwest::Client,
    base_url: Url,
}

impl OpenFoodFactsClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: Url) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .user_agent(concat!("dispensa/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(OpenFoodFactsInner { client, base_url }),
        })
    }

    /// Look up a normalized barcode.
    ///
    /// # Errors
    ///
    /// Returns `LookupError` on network failure, a non-2xx status or an
    /// unparseable body. An unknown barcode is not an error.
    #[instrument(skip(self))]
    pub async fn lookup(&self, barcode: &str) -> Result<ProductInfo, LookupError> {
        let file = format!("{barcode}.json");
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| LookupError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "v0", "product", file.as_str()]);

        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: LookupResponse =
            serde_json::from_str(&body).map_err(|e| LookupError::Parse(e.to_string()))?;
        let info = ProductInfo::from(parsed);

        tracing::debug!(found = info.found, name = ?info.name, "Barcode lookup finished");
        Ok(info)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ProductInfo {
        serde_json::from_str::<LookupResponse>(json).unwrap().into()
    }

    #[test]
    fn test_normalize_barcode() {
        assert_eq!(normalize_barcode(" 8001505005707 \n").unwrap(), "8001505005707");
        assert!(normalize_barcode("").is_err());
        assert!(normalize_barcode("80015-05").is_err());
    }

    #[test]
    fn test_found_product() {
        let info = parse(
            r#"{"status": 1, "product": {"product_name": "Passata di pomodoro",
                "image_url": "https://images.openfoodfacts.org/x.jpg"}}"#,
        );
        assert!(info.found);
        assert_eq!(resolve_name(&info, "", "123"), "Passata di pomodoro");
    }

    #[test]
    fn test_found_without_name_uses_barcode() {
        let info = parse(r#"{"status": 1, "product": {"product_name": ""}}"#);
        assert!(info.found);
        assert_eq!(resolve_name(&info, "Latte", "8001"), "8001");
    }

    #[test]
    fn test_not_found_keeps_typed_name() {
        let info = parse(r#"{"status": 0, "status_verbose": "product not found"}"#);
        assert!(!info.found);
        assert_eq!(resolve_name(&info, "Latte fresco", "8001"), "Latte fresco");
        assert_eq!(resolve_name(&info, "  ", "8001"), "8001");
    }
}
