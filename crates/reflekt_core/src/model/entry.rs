//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the canonical `Entry` record returned by every repository adapter.
//! - Define write-side inputs (`EntryDraft`, `EntryPatch`) and their validation.
//! - Own the single normalization step that back-fills optional fields.
//!
//! # Invariants
//! - `id` and `user_id` are never changed after creation.
//! - `created_at <= updated_at`.
//! - `images.len() <= MAX_IMAGES_PER_ENTRY`.
//! - An entry with blank content must carry at least one image.

use crate::attachment::parse_data_url;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the backend on creation.
pub type EntryId = Uuid;

/// Title stored when the author leaves the title blank.
pub const DEFAULT_TITLE: &str = "Untitled Entry";

/// Maximum number of inline images one entry may carry.
pub const MAX_IMAGES_PER_ENTRY: usize = 3;

/// Mood attached to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mood {
    #[default]
    Calm,
    Happy,
    Productive,
    Motivated,
    Reflective,
    Sad,
}

impl Mood {
    /// All moods in picker order.
    pub const ALL: [Mood; 6] = [
        Mood::Calm,
        Mood::Happy,
        Mood::Productive,
        Mood::Motivated,
        Mood::Reflective,
        Mood::Sad,
    ];

    /// Display/storage label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Calm => "Calm",
            Self::Happy => "Happy",
            Self::Productive => "Productive",
            Self::Motivated => "Motivated",
            Self::Reflective => "Reflective",
            Self::Sad => "Sad",
        }
    }

    /// Parses a mood label case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|mood| mood.as_str().eq_ignore_ascii_case(trimmed))
    }

    /// Parses a stored mood, falling back to `Calm` for absent or unknown values.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully-populated journal entry.
///
/// Every adapter returns this shape after normalization, so derived views can
/// rely on all fields being present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    /// Owner identifier used for access scoping.
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
    /// Inline `data:` URLs, at most `MAX_IMAGES_PER_ENTRY`.
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Title for display, defaulting blank titles.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            self.title.as_str()
        }
    }
}

/// Raw stored document as written by any backend.
///
/// Records written by older clients may lack `mood`, `tags`, `images` or
/// `updated_at`; [`EntryRecord::normalize`] is the only place defaults are
/// applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: EntryId,
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EntryRecord {
    /// Back-fills defaults and returns the canonical entry.
    pub fn normalize(self) -> Entry {
        let title = match self.title {
            Some(title) if !title.trim().is_empty() => title,
            _ => DEFAULT_TITLE.to_string(),
        };
        let updated_at = match self.updated_at {
            Some(updated_at) if updated_at >= self.created_at => updated_at,
            _ => self.created_at,
        };

        Entry {
            id: self.id,
            user_id: self.user_id,
            title,
            content: self.content,
            mood: Mood::parse_or_default(self.mood.as_deref()),
            tags: self.tags.unwrap_or_default(),
            images: self.images.unwrap_or_default(),
            created_at: self.created_at,
            updated_at,
        }
    }
}

/// Validation failures detected before any backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// Owner identifier is blank.
    MissingOwner,
    /// Content is blank and no image is attached.
    EmptyContent,
    /// More images than one entry may hold.
    TooManyImages { count: usize, max: usize },
    /// Image at `index` is not an inline base64 data URL.
    InvalidImage { index: usize },
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingOwner => write!(f, "entry owner is required"),
            Self::EmptyContent => write!(f, "entry content cannot be empty"),
            Self::TooManyImages { count, max } => {
                write!(f, "entry holds {count} images; at most {max} are allowed")
            }
            Self::InvalidImage { index } => {
                write!(f, "image #{index} is not an inline base64 data URL")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// Validated, normalized field values ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFields {
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

impl EntryFields {
    fn from_parts(
        title: &str,
        content: &str,
        mood: Mood,
        tags: &[String],
        images: &[String],
    ) -> Result<Self, EntryValidationError> {
        let title = title.trim();
        let content = content.trim();

        if images.len() > MAX_IMAGES_PER_ENTRY {
            return Err(EntryValidationError::TooManyImages {
                count: images.len(),
                max: MAX_IMAGES_PER_ENTRY,
            });
        }
        if content.is_empty() && images.is_empty() {
            return Err(EntryValidationError::EmptyContent);
        }
        for (index, image) in images.iter().enumerate() {
            if parse_data_url(image).is_none() {
                return Err(EntryValidationError::InvalidImage { index });
            }
        }

        Ok(Self {
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title.to_string()
            },
            content: content.to_string(),
            mood,
            tags: normalize_tags(tags),
            images: images.to_vec(),
        })
    }
}

/// Author input for a new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
    pub mood: Option<Mood>,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one inline image, rejecting a fourth attachment.
    ///
    /// The draft is left unchanged on error.
    pub fn attach_image(&mut self, data_url: impl Into<String>) -> Result<(), EntryValidationError> {
        if self.images.len() >= MAX_IMAGES_PER_ENTRY {
            return Err(EntryValidationError::TooManyImages {
                count: self.images.len() + 1,
                max: MAX_IMAGES_PER_ENTRY,
            });
        }
        let data_url = data_url.into();
        if parse_data_url(&data_url).is_none() {
            return Err(EntryValidationError::InvalidImage {
                index: self.images.len(),
            });
        }
        self.images.push(data_url);
        Ok(())
    }

    /// Removes the image at `index`, if present.
    pub fn remove_image(&mut self, index: usize) -> Option<String> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Number of whitespace-separated words in the content.
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    /// Validates the draft and applies create-time defaults.
    pub fn prepare(&self) -> Result<EntryFields, EntryValidationError> {
        EntryFields::from_parts(
            &self.title,
            &self.content,
            self.mood.unwrap_or_default(),
            &self.tags,
            &self.images,
        )
    }
}

/// Partial field replacement for an existing entry.
///
/// Owner and creation time are not representable here, so an update can never
/// change them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<Mood>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
}

impl EntryPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = Some(images);
        self
    }

    /// Returns whether the patch replaces no field.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.mood.is_none()
            && self.tags.is_none()
            && self.images.is_none()
    }

    /// Merges the patch over `current` and validates the result.
    pub fn apply_to(&self, current: &Entry) -> Result<EntryFields, EntryValidationError> {
        EntryFields::from_parts(
            self.title.as_deref().unwrap_or(&current.title),
            self.content.as_deref().unwrap_or(&current.content),
            self.mood.unwrap_or(current.mood),
            self.tags.as_deref().unwrap_or(&current.tags),
            self.images.as_deref().unwrap_or(&current.images),
        )
    }
}

/// Normalizes one tag: trims, strips a leading `#`, rejects blanks.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalizes tags, dropping duplicates but keeping first-seen order.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            if !normalized.contains(&value) {
                normalized.push(value);
            }
        }
    }
    normalized
}
