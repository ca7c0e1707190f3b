//! "Function" content type: feature directory entries.

use super::fetch_list;
use crate::gateway::KurocoGateway;
use domain::{FetchResult, PreviewToken};
use serde::{Deserialize, Serialize};

pub const FUNCTION_ENDPOINT: &str = "/rcms-api/1/function";

/// Stable projection of a Kuroco function record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionItem {
    #[serde(default)]
    pub dir_name: String,

    #[serde(default)]
    pub dir_name2: String,

    #[serde(default)]
    pub text: String,
}

/// Fetch the function listing, optionally as a draft preview.
pub async fn fetch_functions(
    gateway: &KurocoGateway,
    preview_token: Option<&PreviewToken>,
) -> FetchResult<Vec<FunctionItem>> {
    fetch_list(gateway, FUNCTION_ENDPOINT, preview_token).await
}
