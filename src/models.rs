//! Persistent record types for the comic catalog.
//!
//! Each struct maps 1:1 onto a table created by [`crate::migrate`]; field
//! names match the snake_case column names, so both `sqlx::FromRow`
//! hydration and serde JSON responses work without renames (the one
//! exception is `engine.type`, a reserved word in Rust).
//!
//! All timestamps are UTC instants. Surrogate keys are assigned by the
//! store on insert; a zero id means "not yet persisted".

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A managed comic/manga title, the root of the catalog.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comic {
    pub comic_id: i64,
    pub title: String,
    pub alternative_title: Option<String>,
    pub description: Option<String>,
    /// Filesystem root for this title's assets.
    pub managed_path: String,
    pub cover_image_path: Option<String>,
    /// Optional reference to one of this comic's own pages.
    pub cover_page_id: Option<i64>,
    pub status: String,
    pub rating: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One scanned/rendered page image belonging to a comic.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Page {
    pub page_id: i64,
    pub comic_id: i64,
    /// Advisory ordering within the comic; uniqueness is not enforced.
    pub page_number: i64,
    pub storage_path: String,
    pub file_name: String,
    pub file_extension: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub dpi: Option<i64>,
    pub color_profile: Option<String>,
    /// Content hash (<= 64 chars) for de-dup and verification.
    pub image_hash: Option<String>,
    pub thumbnail_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A positioned text region on a page, used for translation overlay.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OverlayBox {
    pub overlay_id: i64,
    pub page_id: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    /// Stacking order among boxes on the same page.
    pub z_index: i64,
    pub original_text: Option<String>,
    pub translated_text: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A classification label, optionally grouped.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tag {
    pub tag_id: i64,
    pub group_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub is_sensitive: bool,
    pub created_at: DateTime<Utc>,
}

/// Named grouping of tags. Deleting a group clears `Tag::group_id` on its
/// members rather than deleting them.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TagGroup {
    pub group_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A person or entity credited on a comic.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Creator {
    pub creator_id: i64,
    pub name: String,
    pub role: Option<String>,
    pub website_url: Option<String>,
    pub social_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An attribution/origin record linkable to comics.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Source {
    pub source_id: i64,
    pub platform: Option<String>,
    pub source_url: Option<String>,
    pub author_handle: Option<String>,
    pub post_id: Option<String>,
    pub description: Option<String>,
    pub discovered_at: DateTime<Utc>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// A standalone record of a discovered download origin, not linked to
/// anything else in the schema.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DownloadSource {
    pub download_source_id: i64,
    pub platform: Option<String>,
    pub source_url: Option<String>,
    pub author_handle: Option<String>,
    pub post_id: Option<String>,
    pub description: Option<String>,
    pub discovered_at: DateTime<Utc>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

/// A reusable text-rendering style preset. Persisted but not yet referenced
/// by [`OverlayBox`].
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TextStyle {
    pub text_style_id: i64,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: String,
    pub font_style: String,
    pub color: Option<String>,
    pub background_color: Option<String>,
    pub letter_spacing: Option<f64>,
    pub line_height: Option<f64>,
    pub text_align: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Configuration for an external OCR/translation engine. Execution is
/// external; this service only stores the configuration and its history.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Engine {
    pub engine_id: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub engine_type: String,
    pub api_endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Opaque configuration blob, typically JSON.
    pub configuration: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Audit record of one engine invocation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EngineHistory {
    pub history_id: i64,
    pub engine_id: i64,
    pub overlay_box_id: Option<i64>,
    pub original_text: Option<String>,
    pub translated_text: Option<String>,
    pub status: Option<String>,
    pub error_message: Option<String>,
    pub processed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Join row linking a comic to a tag. Composite key, no independent
/// lifecycle: created and destroyed only by explicit link/unlink.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ComicTag {
    pub comic_id: i64,
    pub tag_id: i64,
}

/// Join row linking a comic to a creator.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ComicCreator {
    pub comic_id: i64,
    pub creator_id: i64,
}

/// Join row linking a comic to a source.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ComicSource {
    pub comic_id: i64,
    pub source_id: i64,
}
