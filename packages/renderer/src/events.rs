//! DOM events raised inside a rendered page that the renderer routes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PreviewEvent {
    LinkClick {
        href: String,
    },

    #[serde(rename_all = "camelCase")]
    FormSubmit {
        block_id: String,
        #[serde(default)]
        fields: BTreeMap<String, String>,
    },
}

impl PreviewEvent {
    pub fn link(href: impl Into<String>) -> Self {
        PreviewEvent::LinkClick { href: href.into() }
    }

    pub fn submit(block_id: impl Into<String>, fields: &[(&str, &str)]) -> Self {
        PreviewEvent::FormSubmit {
            block_id: block_id.into(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum EventOutcome {
    /// Let the browser follow the link
    Navigate(String),

    /// Handed to a form callback
    Submitted,

    /// Blocked by the editor sandbox
    Suppressed,

    /// Submitted data failed validation
    Invalid(String),

    Ignored,
}

/// Newsletter form submission passed to the host application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterSignup {
    pub block_id: String,
    pub email: String,
}
