//! Table mappings for every entity in the catalog schema.
//!
//! One [`Entity`] impl per table: column list, insert bind order, and key
//! predicate. The three join rows carry composite keys and implement
//! [`Entity`] only; everything else is [`KeyedEntity`] with a generated
//! integer key.

use crate::models::{
    Comic, ComicCreator, ComicSource, ComicTag, Creator, DownloadSource, Engine, EngineHistory,
    OverlayBox, Page, Source, Tag, TagGroup, TextStyle,
};
use crate::store::{Entity, Filter, KeyedEntity, SqliteQuery};

impl Entity for Comic {
    const TABLE: &'static str = "comic";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "title",
        "alternative_title",
        "description",
        "managed_path",
        "cover_image_path",
        "cover_page_id",
        "status",
        "rating",
        "created_at",
        "updated_at",
    ];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.title.as_str())
            .bind(self.alternative_title.as_deref())
            .bind(self.description.as_deref())
            .bind(self.managed_path.as_str())
            .bind(self.cover_image_path.as_deref())
            .bind(self.cover_page_id)
            .bind(self.status.as_str())
            .bind(self.rating)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.comic_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.comic_id = id;
    }
}

impl KeyedEntity for Comic {
    const ID_COLUMN: &'static str = "comic_id";

    fn id(&self) -> i64 {
        self.comic_id
    }
}

impl Entity for Page {
    const TABLE: &'static str = "page";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "comic_id",
        "page_number",
        "storage_path",
        "file_name",
        "file_extension",
        "file_size_bytes",
        "width",
        "height",
        "dpi",
        "color_profile",
        "image_hash",
        "thumbnail_path",
        "created_at",
    ];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.comic_id)
            .bind(self.page_number)
            .bind(self.storage_path.as_str())
            .bind(self.file_name.as_str())
            .bind(self.file_extension.as_deref())
            .bind(self.file_size_bytes)
            .bind(self.width)
            .bind(self.height)
            .bind(self.dpi)
            .bind(self.color_profile.as_deref())
            .bind(self.image_hash.as_deref())
            .bind(self.thumbnail_path.as_deref())
            .bind(self.created_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.page_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.page_id = id;
    }
}

impl KeyedEntity for Page {
    const ID_COLUMN: &'static str = "page_id";

    fn id(&self) -> i64 {
        self.page_id
    }
}

impl Entity for OverlayBox {
    const TABLE: &'static str = "overlay_box";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "page_id",
        "x",
        "y",
        "width",
        "height",
        "rotation",
        "z_index",
        "original_text",
        "translated_text",
        "is_verified",
        "created_at",
        "updated_at",
    ];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.page_id)
            .bind(self.x)
            .bind(self.y)
            .bind(self.width)
            .bind(self.height)
            .bind(self.rotation)
            .bind(self.z_index)
            .bind(self.original_text.as_deref())
            .bind(self.translated_text.as_deref())
            .bind(self.is_verified)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.overlay_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.overlay_id = id;
    }
}

impl KeyedEntity for OverlayBox {
    const ID_COLUMN: &'static str = "overlay_id";

    fn id(&self) -> i64 {
        self.overlay_id
    }
}

impl Entity for Tag {
    const TABLE: &'static str = "tag";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "group_id",
        "name",
        "description",
        "is_sensitive",
        "created_at",
    ];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.group_id)
            .bind(self.name.as_str())
            .bind(self.description.as_deref())
            .bind(self.is_sensitive)
            .bind(self.created_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.tag_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.tag_id = id;
    }
}

impl KeyedEntity for Tag {
    const ID_COLUMN: &'static str = "tag_id";

    fn id(&self) -> i64 {
        self.tag_id
    }
}

impl Entity for TagGroup {
    const TABLE: &'static str = "tag_group";
    const INSERT_COLUMNS: &'static [&'static str] = &["name", "created_at"];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.name.as_str()).bind(self.created_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.group_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.group_id = id;
    }
}

impl KeyedEntity for TagGroup {
    const ID_COLUMN: &'static str = "group_id";

    fn id(&self) -> i64 {
        self.group_id
    }
}

impl Entity for Creator {
    const TABLE: &'static str = "creator";
    const INSERT_COLUMNS: &'static [&'static str] =
        &["name", "role", "website_url", "social_link", "created_at"];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.name.as_str())
            .bind(self.role.as_deref())
            .bind(self.website_url.as_deref())
            .bind(self.social_link.as_deref())
            .bind(self.created_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.creator_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.creator_id = id;
    }
}

impl KeyedEntity for Creator {
    const ID_COLUMN: &'static str = "creator_id";

    fn id(&self) -> i64 {
        self.creator_id
    }
}

impl Entity for Source {
    const TABLE: &'static str = "source";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "platform",
        "source_url",
        "author_handle",
        "post_id",
        "description",
        "discovered_at",
        "is_primary",
        "created_at",
    ];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.platform.as_deref())
            .bind(self.source_url.as_deref())
            .bind(self.author_handle.as_deref())
            .bind(self.post_id.as_deref())
            .bind(self.description.as_deref())
            .bind(self.discovered_at)
            .bind(self.is_primary)
            .bind(self.created_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.source_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.source_id = id;
    }
}

impl KeyedEntity for Source {
    const ID_COLUMN: &'static str = "source_id";

    fn id(&self) -> i64 {
        self.source_id
    }
}

impl Entity for DownloadSource {
    const TABLE: &'static str = "download_source";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "platform",
        "source_url",
        "author_handle",
        "post_id",
        "description",
        "discovered_at",
        "is_primary",
        "created_at",
    ];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.platform.as_deref())
            .bind(self.source_url.as_deref())
            .bind(self.author_handle.as_deref())
            .bind(self.post_id.as_deref())
            .bind(self.description.as_deref())
            .bind(self.discovered_at)
            .bind(self.is_primary)
            .bind(self.created_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.download_source_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.download_source_id = id;
    }
}

impl KeyedEntity for DownloadSource {
    const ID_COLUMN: &'static str = "download_source_id";

    fn id(&self) -> i64 {
        self.download_source_id
    }
}

impl Entity for TextStyle {
    const TABLE: &'static str = "text_style";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "font_family",
        "font_size",
        "font_weight",
        "font_style",
        "color",
        "background_color",
        "letter_spacing",
        "line_height",
        "text_align",
        "created_at",
    ];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.font_family.as_str())
            .bind(self.font_size)
            .bind(self.font_weight.as_str())
            .bind(self.font_style.as_str())
            .bind(self.color.as_deref())
            .bind(self.background_color.as_deref())
            .bind(self.letter_spacing)
            .bind(self.line_height)
            .bind(self.text_align.as_deref())
            .bind(self.created_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.text_style_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.text_style_id = id;
    }
}

impl KeyedEntity for TextStyle {
    const ID_COLUMN: &'static str = "text_style_id";

    fn id(&self) -> i64 {
        self.text_style_id
    }
}

impl Entity for Engine {
    const TABLE: &'static str = "engine";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "name",
        "type",
        "api_endpoint",
        "api_key",
        "configuration",
        "is_active",
        "created_at",
        "updated_at",
    ];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.name.as_str())
            .bind(self.engine_type.as_str())
            .bind(self.api_endpoint.as_deref())
            .bind(self.api_key.as_deref())
            .bind(self.configuration.as_deref())
            .bind(self.is_active)
            .bind(self.created_at)
            .bind(self.updated_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.engine_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.engine_id = id;
    }
}

impl KeyedEntity for Engine {
    const ID_COLUMN: &'static str = "engine_id";

    fn id(&self) -> i64 {
        self.engine_id
    }
}

impl Entity for EngineHistory {
    const TABLE: &'static str = "engine_history";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "engine_id",
        "overlay_box_id",
        "original_text",
        "translated_text",
        "status",
        "error_message",
        "processed_at",
        "created_at",
    ];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query
            .bind(self.engine_id)
            .bind(self.overlay_box_id)
            .bind(self.original_text.as_deref())
            .bind(self.translated_text.as_deref())
            .bind(self.status.as_deref())
            .bind(self.error_message.as_deref())
            .bind(self.processed_at)
            .bind(self.created_at)
    }

    fn key_filter(&self) -> Filter {
        Filter::new().eq(Self::ID_COLUMN, self.history_id)
    }

    fn set_generated_key(&mut self, id: i64) {
        self.history_id = id;
    }
}

impl KeyedEntity for EngineHistory {
    const ID_COLUMN: &'static str = "history_id";

    fn id(&self) -> i64 {
        self.history_id
    }
}

impl Entity for ComicTag {
    const TABLE: &'static str = "comic_tag";
    const INSERT_COLUMNS: &'static [&'static str] = &["comic_id", "tag_id"];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.comic_id).bind(self.tag_id)
    }

    fn key_filter(&self) -> Filter {
        Filter::new()
            .eq("comic_id", self.comic_id)
            .eq("tag_id", self.tag_id)
    }
}

impl Entity for ComicCreator {
    const TABLE: &'static str = "comic_creator";
    const INSERT_COLUMNS: &'static [&'static str] = &["comic_id", "creator_id"];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.comic_id).bind(self.creator_id)
    }

    fn key_filter(&self) -> Filter {
        Filter::new()
            .eq("comic_id", self.comic_id)
            .eq("creator_id", self.creator_id)
    }
}

impl Entity for ComicSource {
    const TABLE: &'static str = "comic_source";
    const INSERT_COLUMNS: &'static [&'static str] = &["comic_id", "source_id"];

    fn bind_insert<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.comic_id).bind(self.source_id)
    }

    fn key_filter(&self) -> Filter {
        Filter::new()
            .eq("comic_id", self.comic_id)
            .eq("source_id", self.source_id)
    }
}
