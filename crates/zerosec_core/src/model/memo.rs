//! Archived memo record.
//!
//! # Responsibility
//! - Define the immutable snapshot produced when a session is archived.
//! - Enforce record invariants on construction and on deserialization.
//!
//! # Invariants
//! - `id` is never nil.
//! - `bullets` never contains a blank entry.
//! - `completed_at >= created_at` when `completed_at` is set.

use crate::model::draft::MemoDraft;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable identifier of one archived memo.
pub type MemoId = Uuid;

/// Record-level invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValidationError {
    NilId,
    BlankBullet {
        index: usize,
    },
    CompletedBeforeCreated {
        created_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "memo id must not be nil"),
            Self::BlankBullet { index } => {
                write!(f, "archived bullet at index {index} must not be blank")
            }
            Self::CompletedBeforeCreated {
                created_at,
                completed_at,
            } => write!(
                f,
                "completed_at ({}) must be >= created_at ({})",
                completed_at.to_rfc3339(),
                created_at.to_rfc3339()
            ),
        }
    }
}

impl Error for MemoValidationError {}

/// Immutable snapshot of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ArchivedMemoWire")]
pub struct ArchivedMemo {
    pub id: MemoId,
    /// Title kept verbatim, including surrounding whitespace.
    pub title: String,
    /// Non-blank bullet texts in draft order.
    pub bullets: Vec<String>,
    /// When writing began (first title interaction).
    pub created_at: DateTime<Utc>,
    /// When the session expired or was skipped.
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ArchivedMemoWire {
    id: MemoId,
    title: String,
    bullets: Vec<String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ArchivedMemoWire> for ArchivedMemo {
    type Error = MemoValidationError;

    fn try_from(value: ArchivedMemoWire) -> Result<Self, Self::Error> {
        let memo = Self {
            id: value.id,
            title: value.title,
            bullets: value.bullets,
            created_at: value.created_at,
            completed_at: value.completed_at,
        };
        memo.validate()?;
        Ok(memo)
    }
}

impl ArchivedMemo {
    /// Builds a validated record with a fresh id.
    pub fn new(
        title: impl Into<String>,
        bullets: Vec<String>,
        created_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, MemoValidationError> {
        let memo = Self {
            id: Uuid::new_v4(),
            title: title.into(),
            bullets,
            created_at,
            completed_at,
        };
        memo.validate()?;
        Ok(memo)
    }

    /// Snapshots a draft, or returns `None` when the draft is blank.
    ///
    /// Blank bullet rows are dropped. A `completed_at` earlier than
    /// `created_at` (wall clock stepped back) is clamped to `created_at`.
    pub fn snapshot(
        draft: &MemoDraft,
        created_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Option<Self> {
        if draft.is_blank() {
            return None;
        }

        Some(Self {
            id: Uuid::new_v4(),
            title: draft.title.clone(),
            bullets: draft.bullets.non_blank_texts(),
            created_at,
            completed_at: Some(completed_at.max(created_at)),
        })
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        if self.id.is_nil() {
            return Err(MemoValidationError::NilId);
        }
        if let Some(index) = self.bullets.iter().position(|text| text.trim().is_empty()) {
            return Err(MemoValidationError::BlankBullet { index });
        }
        if let Some(completed_at) = self.completed_at {
            if completed_at < self.created_at {
                return Err(MemoValidationError::CompletedBeforeCreated {
                    created_at: self.created_at,
                    completed_at,
                });
            }
        }
        Ok(())
    }

    /// One-line preview for history lists.
    ///
    /// Uses the title, falling back to the first bullet when the title is
    /// blank. Whitespace runs collapse to one space; output longer than
    /// `max_chars` is cut and suffixed with `...`.
    pub fn summary(&self, max_chars: usize) -> String {
        let source = if self.title.trim().is_empty() {
            self.bullets.first().map(String::as_str).unwrap_or("")
        } else {
            self.title.as_str()
        };
        let normalized = WHITESPACE_RE.replace_all(source, " ");
        let trimmed = normalized.trim();
        let mut summary = trimmed.chars().take(max_chars).collect::<String>();
        if trimmed.chars().count() > max_chars {
            summary.push_str("...");
        }
        summary
    }
}
