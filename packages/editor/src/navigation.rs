//! Tab order between editable fields.
//!
//! Fields are visited in visual reading order: top to bottom, and left to
//! right among fields whose top edges lie within `row_tolerance` pixels of
//! the first field in their row.

use crate::controller::Direction;
use crate::lock::FieldKey;
use crate::surface::Rect;

#[derive(Debug, Clone, Default)]
pub struct FieldNavigator {
    row_tolerance: f64,
    fields: Vec<(FieldKey, Rect)>,
}

impl FieldNavigator {
    pub fn new(row_tolerance: f64) -> Self {
        Self {
            row_tolerance,
            fields: Vec::new(),
        }
    }

    /// Add a field, or update its bounds if already known
    pub fn register(&mut self, field: FieldKey, bounds: Rect) {
        match self.fields.iter_mut().find(|(key, _)| *key == field) {
            Some(entry) => entry.1 = bounds,
            None => self.fields.push((field, bounds)),
        }
    }

    pub fn unregister(&mut self, field: &FieldKey) {
        self.fields.retain(|(key, _)| key != field);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn reading_order(&self) -> Vec<FieldKey> {
        let mut by_top: Vec<&(FieldKey, Rect)> = self.fields.iter().collect();
        by_top.sort_by(|a, b| a.1.top.total_cmp(&b.1.top));

        let mut rows: Vec<Vec<&(FieldKey, Rect)>> = Vec::new();
        for entry in by_top {
            match rows.last_mut() {
                Some(row) if (entry.1.top - row[0].1.top).abs() <= self.row_tolerance => row.push(entry),
                _ => rows.push(vec![entry]),
            }
        }

        rows.into_iter()
            .flat_map(|mut row| {
                row.sort_by(|a, b| a.1.left.total_cmp(&b.1.left));
                row.into_iter().map(|(key, _)| key.clone())
            })
            .collect()
    }

    /// Field Tab (or Shift+Tab) moves to; `None` at either end
    pub fn neighbour(&self, from: &FieldKey, direction: Direction) -> Option<FieldKey> {
        let order = self.reading_order();
        let index = order.iter().position(|key| key == from)?;

        let target = match direction {
            Direction::Forward => index.checked_add(1)?,
            Direction::Backward => index.checked_sub(1)?,
        };
        order.get(target).cloned()
    }
}
