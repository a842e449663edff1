//! Inputs shared by every block template in one render.

use crate::catalog::Catalog;
use storefront_editor::{EditorConfig, HostContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Published storefront
    View,

    /// Inside the editor frame: fields are annotated for inline editing
    Edit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub catalog: Catalog,
    pub mode: RenderMode,
    pub placeholder: String,
}

impl RenderContext {
    pub fn view(catalog: Catalog) -> Self {
        Self {
            catalog,
            mode: RenderMode::View,
            placeholder: String::new(),
        }
    }

    pub fn edit(catalog: Catalog, config: &EditorConfig) -> Self {
        Self {
            catalog,
            mode: RenderMode::Edit,
            placeholder: config.placeholder.clone(),
        }
    }

    /// Edit mode only when the page is hosted by the editor
    pub fn for_host(catalog: Catalog, host: &HostContext, config: &EditorConfig) -> Self {
        if host.is_editor() {
            Self::edit(catalog, config)
        } else {
            Self::view(catalog)
        }
    }

    pub fn is_edit(&self) -> bool {
        self.mode == RenderMode::Edit
    }
}
