//! "Information" content type: notice texts and links shown on the portal.

use super::fetch_list;
use crate::gateway::KurocoGateway;
use domain::{FetchResult, PreviewToken};
use serde::{Deserialize, Serialize};

pub const INFORMATION_ENDPOINT: &str = "/rcms-api/1/information";

/// Stable projection of a Kuroco information record.
///
/// The CMS names these fields with hyphens; missing fields project to
/// empty vectors so callers never see absent values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Information {
    #[serde(rename = "information-text", default)]
    pub information_text: Vec<String>,

    #[serde(rename = "information-link", default)]
    pub information_link: Vec<String>,
}

/// Fetch the information listing, optionally as a draft preview.
pub async fn fetch_information(
    gateway: &KurocoGateway,
    preview_token: Option<&PreviewToken>,
) -> FetchResult<Vec<Information>> {
    fetch_list(gateway, INFORMATION_ENDPOINT, preview_token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hyphenated_cms_fields_map_onto_the_projection() {
        let item: Information = serde_json::from_value(json!({
            "information-text": ["maintenance tonight"],
            "information-link": ["/web/samplePages/1"],
            "unrelated-field": 42
        }))
        .expect("information decodes");

        assert_eq!(item.information_text, vec!["maintenance tonight"]);
        assert_eq!(item.information_link, vec!["/web/samplePages/1"]);
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let item: Information = serde_json::from_value(json!({})).expect("information decodes");

        assert!(item.information_text.is_empty());
        assert!(item.information_link.is_empty());
    }
}
