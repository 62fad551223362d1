//! In-progress memo draft.
//!
//! # Invariants
//! - A draft is "blank" when its title and every bullet hold only whitespace.
//! - A fresh draft has an empty title and exactly one empty bullet.

use crate::model::bullet::BulletList;
use crate::model::memo::ArchivedMemo;

/// Title plus bullet rows being edited; has no identity until archived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoDraft {
    pub title: String,
    pub bullets: BulletList,
}

impl MemoDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates a draft from an archived record for read-only display.
    pub fn from_archived(memo: &ArchivedMemo) -> Self {
        Self {
            title: memo.title.clone(),
            bullets: BulletList::from_texts(memo.bullets.iter().cloned()),
        }
    }

    pub fn has_blank_title(&self) -> bool {
        self.title.trim().is_empty()
    }

    /// Returns whether nothing worth archiving was written.
    pub fn is_blank(&self) -> bool {
        self.has_blank_title() && self.bullets.is_blank()
    }

    /// Resets to an empty title and one empty bullet.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
