//! Single active edit session per preview frame.
//!
//! Every field controller in a frame holds a clone of the same `EditLock`.
//! A field may enter editing only while the lock is free or already its own,
//! so programmatic focus cannot leave two fields editing at once.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use storefront_blocks::BlockId;

/// Identifies one editable field: a block plus a path into its settings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldKey {
    pub block_id: BlockId,
    pub field_path: String,
}

impl FieldKey {
    pub fn new(block_id: impl Into<BlockId>, field_path: impl Into<String>) -> Self {
        Self {
            block_id: block_id.into(),
            field_path: field_path.into(),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.block_id, self.field_path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditLock {
    holder: Rc<RefCell<Option<FieldKey>>>,
}

impl EditLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock for `field`; re-entrant for the current holder
    pub fn try_acquire(&self, field: &FieldKey) -> bool {
        let mut holder = self.holder.borrow_mut();
        match holder.as_ref() {
            Some(current) => current == field,
            None => {
                *holder = Some(field.clone());
                true
            }
        }
    }

    /// Release the lock if `field` holds it
    pub fn release(&self, field: &FieldKey) {
        let mut holder = self.holder.borrow_mut();
        if holder.as_ref() == Some(field) {
            *holder = None;
        }
    }

    pub fn holder(&self) -> Option<FieldKey> {
        self.holder.borrow().clone()
    }

    pub fn is_held(&self) -> bool {
        self.holder.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_is_exclusive_across_clones() {
        let lock = EditLock::new();
        let other = lock.clone();
        let title = FieldKey::new("hero", "title");
        let subtitle = FieldKey::new("hero", "subtitle");

        assert!(lock.try_acquire(&title));
        assert!(lock.try_acquire(&title));
        assert!(!other.try_acquire(&subtitle));

        // Only the holder can release
        other.release(&subtitle);
        assert_eq!(lock.holder(), Some(title.clone()));

        lock.release(&title);
        assert!(other.try_acquire(&subtitle));
    }
}
