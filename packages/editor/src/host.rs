//! Where the preview is running.
//!
//! Editing affordances exist only when the page is embedded in the editor
//! frame and the URL does not ask for a plain preview.

use crate::EditorError;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostContext {
    /// Rendered inside a parent window (the editor shell)
    pub is_embedded: bool,

    /// `mode=preview` on the page URL
    pub is_preview_mode: bool,
}

impl HostContext {
    /// Embedded in the editor with editing enabled
    pub fn editor() -> Self {
        Self {
            is_embedded: true,
            is_preview_mode: false,
        }
    }

    /// Live storefront, no parent frame
    pub fn standalone() -> Self {
        Self::default()
    }

    /// Build from the page URL; relative URLs are accepted
    pub fn from_url(page_url: &str, is_embedded: bool) -> Result<Self, EditorError> {
        let base = Url::parse("http://localhost/")?;
        let parsed = base.join(page_url)?;

        let is_preview_mode = parsed
            .query_pairs()
            .any(|(key, value)| key == "mode" && value == "preview");

        Ok(Self {
            is_embedded,
            is_preview_mode,
        })
    }

    pub fn is_editor(&self) -> bool {
        self.is_embedded && !self.is_preview_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_mode_disables_editing() {
        let host = HostContext::from_url("https://shop.example.com/?mode=preview", true).unwrap();
        assert!(host.is_preview_mode);
        assert!(!host.is_editor());
    }

    #[test]
    fn test_embedded_without_preview_flag_is_editor() {
        let host = HostContext::from_url("/products?page=2&mode=edit", true).unwrap();
        assert!(host.is_editor());
    }

    #[test]
    fn test_top_level_window_is_not_editor() {
        let host = HostContext::from_url("/", false).unwrap();
        assert!(!host.is_editor());
        assert_eq!(host, HostContext::standalone());
    }
}
