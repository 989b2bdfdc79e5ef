//! Error body shared by every endpoint.

use serde::{Deserialize, Serialize};

/// RFC 7807 problem details.
///
/// Serialized as the body of every non-2xx response so clients can
/// branch on `status` and show `title`/`detail` verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Problem type URI; `about:blank` when the status code says it all.
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short summary of the problem class.
    pub title: String,

    /// HTTP status code, duplicated in the body.
    pub status: u16,

    /// Occurrence-specific explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn forbidden() -> Self {
        Self::new(403, "Forbidden")
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_omitted_when_absent() {
        let json = serde_json::to_value(ErrorResponse::forbidden()).unwrap();

        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["status"], 403);
        assert!(json.get("detail").is_none());
    }

    #[test]
    fn detail_round_trips() {
        let json =
            serde_json::to_value(ErrorResponse::bad_request("lat is out of range")).unwrap();

        assert_eq!(json["detail"], "lat is out of range");
    }
}
