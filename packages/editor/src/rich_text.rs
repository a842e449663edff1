//! # Rich Text Fields
//!
//! Same session lifecycle as plain text, but the value is HTML produced by an
//! opaque formatting engine, and its UTF-8 size is capped.
//!
//! Every edit is measured. An edit that would exceed the cap is refused and
//! the surface is reset to the last value that fit, with a warning kept until
//! an accepted edit brings the content back under the limit. Edits that shrink
//! the content are always accepted, so a value loaded over the limit can
//! still be trimmed.

use crate::config::EditorConfig;
use crate::controller::{Admission, ContentPolicy, FieldController};
use crate::host::HostContext;
use crate::lock::{EditLock, FieldKey};
use crate::surface::{Size, TextSurface};
use crate::toolbar::{position_toolbar, ToolbarPlacement};
use serde::Serialize;
use tracing::warn;

/// Shown while the last edit was refused for size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeWarning {
    pub current_bytes: usize,
    pub max_bytes: usize,
}

impl SizeWarning {
    pub fn message(&self) -> String {
        format!(
            "Content too large ({} / {}). Remove some content to continue editing.",
            format_bytes(self.current_bytes),
            format_bytes(self.max_bytes)
        )
    }
}

pub fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[derive(Debug, Clone)]
pub struct RichText {
    max_bytes: usize,
    last_valid: String,
    warning: Option<SizeWarning>,
}

impl RichText {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            last_valid: String::new(),
            warning: None,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn warning(&self) -> Option<SizeWarning> {
        self.warning
    }
}

impl ContentPolicy for RichText {
    fn begin(&mut self, value: &str) {
        self.last_valid = value.to_string();
        self.warning = None;
    }

    fn admit(&mut self, candidate: &str) -> Admission {
        let size = candidate.len();

        if size <= self.max_bytes || size < self.last_valid.len() {
            self.last_valid = candidate.to_string();
            if size <= self.max_bytes {
                self.warning = None;
            }
            return Admission::Accept;
        }

        warn!(size, max = self.max_bytes, "Rich text edit exceeds size limit, reverting");
        self.warning = Some(SizeWarning {
            current_bytes: size,
            max_bytes: self.max_bytes,
        });
        Admission::Reject {
            restore: self.last_valid.clone(),
        }
    }

    /// Enter always inserts a paragraph
    fn enter_commits(&self) -> bool {
        false
    }
}

pub type EditableRichText<S> = FieldController<S, RichText>;

impl<S: TextSurface> FieldController<S, RichText> {
    pub fn rich(
        key: FieldKey,
        html: impl Into<String>,
        surface: S,
        host: HostContext,
        lock: EditLock,
        config: &EditorConfig,
    ) -> Self {
        let policy = RichText::new(config.rich_text_max_bytes);
        Self::new(key, html, surface, policy, host, lock, config)
    }

    pub fn size_warning(&self) -> Option<SizeWarning> {
        if self.is_editing() {
            self.policy().warning()
        } else {
            None
        }
    }

    /// Where the formatting toolbar goes, if there is a selection to anchor it
    pub fn toolbar_placement(&self, toolbar: Size, viewport: Size, config: &EditorConfig) -> Option<ToolbarPlacement> {
        if !self.is_editing() {
            return None;
        }
        let selection = self.surface().selection_rect()?;
        Some(position_toolbar(
            selection,
            toolbar,
            viewport,
            config.toolbar_padding_px,
            config.toolbar_gap_px,
        ))
    }
}
