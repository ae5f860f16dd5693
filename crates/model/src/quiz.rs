use alloc::{
    collections::{BTreeMap, BTreeSet},
    string::String,
};
use serde::{Deserialize, Serialize};

/// Bookkeeping fields. Timestamps are opaque strings produced by the store.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Audit {
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub updated_by: String,
    #[serde(default)]
    pub deleted_by: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub deleted_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    /// Owner of the quiz.
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Time limit in seconds.
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub audit: Audit,
}

/// Acceptable schema for new quizzes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuizDraft {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl From<QuizDraft> for Quiz {
    fn from(draft: QuizDraft) -> Self {
        let QuizDraft { user_id, title, description, duration, thumbnail, cover, category, tags, metadata } = draft;
        Self {
            id: String::new(),
            audit: Audit { created_by: user_id.clone(), updated_by: user_id.clone(), ..Default::default() },
            user_id,
            title,
            description,
            duration,
            thumbnail,
            cover,
            category,
            tags,
            metadata,
        }
    }
}

/// Partial update of a quiz. Absent fields keep their stored values.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct QuizPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<BTreeSet<String>>,
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
}

impl QuizPatch {
    pub fn apply(self, quiz: &mut Quiz) {
        let Self { title, description, duration, thumbnail, cover, category, tags, metadata } = self;
        if let Some(title) = title {
            quiz.title = title;
        }
        if let Some(description) = description {
            quiz.description = description;
        }
        if duration.is_some() {
            quiz.duration = duration;
        }
        if thumbnail.is_some() {
            quiz.thumbnail = thumbnail;
        }
        if cover.is_some() {
            quiz.cover = cover;
        }
        if category.is_some() {
            quiz.category = category;
        }
        if let Some(tags) = tags {
            quiz.tags = tags;
        }
        if let Some(metadata) = metadata {
            quiz.metadata = metadata;
        }
    }
}

/// Request-scoped window over a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 0, size: Self::DEFAULT_SIZE }
    }
}

impl Pagination {
    pub const DEFAULT_SIZE: u32 = 10;

    /// Normalizes raw query values: a missing or negative page becomes the first
    /// page while a missing or non-positive size falls back to the default.
    pub fn new(page: Option<i64>, size: Option<i64>) -> Self {
        let page = page.map_or(0, |page| page.clamp(0, u32::MAX.into()) as u32);
        let size = match size {
            Some(size) if size >= 1 => size.min(u32::MAX.into()) as u32,
            _ => Self::DEFAULT_SIZE,
        };
        Self { page, size }
    }

    /// Number of entries to skip.
    pub const fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}
