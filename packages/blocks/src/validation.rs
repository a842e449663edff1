//! Layout validation.
//!
//! Rendering tolerates every problem reported here (unknown types render
//! nothing, bad nesting is not enforced at render time). These diagnostics are
//! for the editor shell and the CLI, which consult them before saving.

use crate::block::{Block, PageLayout};
use crate::ordering::children_sequence;
use crate::registry::{can_block_be_child_of, get_block_meta};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

/// A problem found in a layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,

    /// The check that produced this diagnostic
    pub rule: String,

    pub message: String,

    /// Offending block, if the problem is local to one
    pub block_id: Option<String>,

    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(rule: impl Into<String>, message: impl Into<String>, block_id: Option<&str>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            rule: rule.into(),
            message: message.into(),
            block_id: block_id.map(str::to_string),
            suggestion: None,
        }
    }

    pub fn warning(rule: impl Into<String>, message: impl Into<String>, block_id: Option<&str>) -> Self {
        Self {
            level: DiagnosticLevel::Warning,
            rule: rule.into(),
            message: message.into(),
            block_id: block_id.map(str::to_string),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

pub fn validate_layout(layout: &PageLayout) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let mut seen: HashSet<&str> = HashSet::new();
    for block in &layout.blocks {
        if !seen.insert(block.id.as_str()) {
            diagnostics.push(Diagnostic::error(
                "duplicate-id",
                format!("Block id '{}' is used more than once", block.id),
                Some(&block.id),
            ));
        }
    }

    for block in &layout.blocks {
        check_block(layout, block, &mut diagnostics);
    }

    let mut parents: Vec<Option<&str>> = vec![None];
    parents.extend(layout.blocks.iter().map(|b| Some(b.id.as_str())));
    for parent in parents {
        check_order_ties(layout, parent, &mut diagnostics);
    }

    diagnostics
}

fn check_block(layout: &PageLayout, block: &Block, diagnostics: &mut Vec<Diagnostic>) {
    let type_name = block.kind.as_str();

    let Some(meta) = get_block_meta(type_name) else {
        diagnostics.push(Diagnostic::warning(
            "unknown-type",
            format!("Unknown block type '{}' will not be rendered", type_name),
            Some(&block.id),
        ));
        return;
    };

    if let Some(variant) = &block.variant {
        if !meta.has_variant(variant) {
            diagnostics.push(
                Diagnostic::warning(
                    "unknown-variant",
                    format!("'{}' is not a variant of {}", variant, type_name),
                    Some(&block.id),
                )
                .with_suggestion(format!("Use one of: {}", meta.variants.join(", "))),
            );
        }
    }

    let Some(parent_id) = &block.parent_id else {
        return;
    };

    match layout.find_block(parent_id) {
        None => diagnostics.push(Diagnostic::error(
            "dangling-parent",
            format!("Parent '{}' does not exist", parent_id),
            Some(&block.id),
        )),
        Some(parent) if !can_block_be_child_of(type_name, parent.kind.as_str()) => {
            diagnostics.push(Diagnostic::error(
                "invalid-nesting",
                format!("{} cannot be placed inside {}", type_name, parent.kind.as_str()),
                Some(&block.id),
            ))
        }
        Some(_) => {}
    }
}

fn check_order_ties(layout: &PageLayout, parent: Option<&str>, diagnostics: &mut Vec<Diagnostic>) {
    let visible = children_sequence(&layout.blocks, parent);
    for pair in visible.windows(2) {
        if pair[0].order == pair[1].order {
            diagnostics.push(
                Diagnostic::warning(
                    "order-tie",
                    format!(
                        "Blocks '{}' and '{}' share order {}",
                        pair[0].id, pair[1].id, pair[0].order
                    ),
                    Some(&pair[1].id),
                )
                .with_suggestion("Renumber the page to make the order explicit"),
            );
        }
    }
}
