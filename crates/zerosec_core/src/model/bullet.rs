//! Bullet rows of the in-progress memo.
//!
//! # Responsibility
//! - Keep an ordered list of free-text rows with stable identities.
//! - Resolve edits by identity so that mid-list deletions never retarget rows.
//!
//! # Invariants
//! - A `BulletList` always holds at least one bullet.
//! - Insertion order is display order.
//! - A `BulletId` is never reused within one list.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one bullet row.
pub type BulletId = Uuid;

/// One free-text row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: BulletId,
    pub text: String,
}

impl Bullet {
    /// Creates an empty bullet with a fresh identity.
    pub fn empty() -> Self {
        Self::with_text("")
    }

    /// Creates a bullet with a fresh identity and initial text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
        }
    }

    /// Returns whether the row holds only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Ordered, never-empty list of bullets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletList {
    items: Vec<Bullet>,
}

impl Default for BulletList {
    fn default() -> Self {
        Self::new()
    }
}

impl BulletList {
    /// Creates a list holding a single empty bullet.
    pub fn new() -> Self {
        Self {
            items: vec![Bullet::empty()],
        }
    }

    /// Builds a list from texts, one bullet per entry.
    ///
    /// An empty input still yields one empty bullet.
    pub fn from_texts<I, T>(texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let items: Vec<Bullet> = texts.into_iter().map(Bullet::with_text).collect();
        if items.is_empty() {
            return Self::new();
        }
        Self { items }
    }

    /// Appends one empty bullet and returns its identity.
    pub fn insert(&mut self) -> BulletId {
        let bullet = Bullet::empty();
        let id = bullet.id;
        self.items.push(bullet);
        id
    }

    /// Replaces the text of the matching bullet.
    ///
    /// Returns `false` when `id` is absent; that case is not an error.
    pub fn update(&mut self, id: BulletId, text: impl Into<String>) -> bool {
        match self.items.iter_mut().find(|bullet| bullet.id == id) {
            Some(bullet) => {
                bullet.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Removes the matching bullet.
    ///
    /// # Invariants
    /// - Removing the last remaining bullet leaves one fresh empty bullet.
    pub fn remove(&mut self, id: BulletId) -> bool {
        let before = self.items.len();
        self.items.retain(|bullet| bullet.id != id);
        let removed = self.items.len() != before;
        if self.items.is_empty() {
            self.items.push(Bullet::empty());
        }
        removed
    }

    /// Returns whether a remove control should be offered.
    pub fn can_remove(&self) -> bool {
        self.items.len() > 1
    }

    pub fn get(&self, id: BulletId) -> Option<&Bullet> {
        self.items.iter().find(|bullet| bullet.id == id)
    }

    pub fn position(&self, id: BulletId) -> Option<usize> {
        self.items.iter().position(|bullet| bullet.id == id)
    }

    pub fn first_id(&self) -> BulletId {
        self.items[0].id
    }

    /// Returns the identity of the row following `id`, if any.
    pub fn next_id(&self, id: BulletId) -> Option<BulletId> {
        let index = self.position(id)?;
        self.items.get(index + 1).map(|bullet| bullet.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bullet> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Bullet] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// A list never drops below one bullet, so this is always `false`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns whether every row is blank.
    pub fn is_blank(&self) -> bool {
        self.items.iter().all(Bullet::is_blank)
    }

    /// Returns texts of non-blank rows, in display order.
    pub fn non_blank_texts(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|bullet| !bullet.is_blank())
            .map(|bullet| bullet.text.clone())
            .collect()
    }
}
