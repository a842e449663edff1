//! Navigation guard for the editor preview.
//!
//! While installed, link clicks and form submissions anywhere in the page
//! are swallowed so the preview stays a static mock. The browser binding
//! registers capture-phase listeners on install and removes them on
//! uninstall; this type owns the decision.

use crate::events::PreviewEvent;
use tracing::debug;

#[derive(Debug, Default)]
pub struct NavigationGuard {
    installed: bool,
    suppressed: usize,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install(&mut self) {
        if !self.installed {
            debug!("Installing preview navigation guard");
            self.installed = true;
        }
    }

    pub fn uninstall(&mut self) {
        if self.installed {
            debug!(suppressed = self.suppressed, "Removing preview navigation guard");
            self.installed = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.installed
    }

    /// Events swallowed since creation
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// `true` when the event must not reach its default action
    pub fn intercept(&mut self, event: &PreviewEvent) -> bool {
        if !self.installed {
            return false;
        }

        match event {
            PreviewEvent::LinkClick { href } => debug!(href = %href, "Suppressed navigation in preview"),
            PreviewEvent::FormSubmit { block_id, .. } => {
                debug!(block_id = %block_id, "Suppressed form submission in preview")
            }
        }
        self.suppressed += 1;
        true
    }
}
