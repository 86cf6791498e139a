//! The `{success, data | error}` wrapper every endpoint answers with.

use crate::data::page::Page;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub page_info: Option<PageInfo>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            page_info: None,
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            page_info: None,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn paged(page: Page<T>) -> Self {
        let page_info = PageInfo {
            total: page.total,
            page: page.page,
            pages: page.pages(),
        };

        Self {
            success: true,
            data: Some(page.items),
            error: None,
            page_info: Some(page_info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paged_envelope_flattens_page_info() {
        let page = Page {
            items: vec![1, 2],
            total: 12,
            page: 2,
            per_page: 5,
        };

        let value = serde_json::to_value(Envelope::paged(page)).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "data": [1, 2], "total": 12, "page": 2, "pages": 3})
        );
    }

    #[test]
    fn plain_envelope_has_no_page_info() {
        let value = serde_json::to_value(Envelope::success("done")).unwrap();
        assert_eq!(value, json!({"success": true, "data": "done"}));
    }
}
