use anyhow::Result;
use sqlx::Connection;

use crate::config::Config;
use crate::db;

/// Creates the full 14-table schema. Idempotent: every statement is
/// `IF NOT EXISTS`, so `init` can be re-run safely.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let mut conn = db::connect(config).await?;

    // comic references page(cover_page_id) and page references comic; SQLite
    // resolves foreign keys at DML time, so creation order does not matter.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comic (
            comic_id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            alternative_title TEXT,
            description TEXT,
            managed_path TEXT NOT NULL,
            cover_image_path TEXT,
            cover_page_id INTEGER REFERENCES page(page_id) ON DELETE SET NULL,
            status TEXT NOT NULL DEFAULT 'active',
            rating INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS page (
            page_id INTEGER PRIMARY KEY,
            comic_id INTEGER NOT NULL REFERENCES comic(comic_id) ON DELETE CASCADE,
            page_number INTEGER NOT NULL,
            storage_path TEXT NOT NULL,
            file_name TEXT NOT NULL,
            file_extension TEXT,
            file_size_bytes INTEGER,
            width INTEGER,
            height INTEGER,
            dpi INTEGER,
            color_profile TEXT,
            image_hash TEXT,
            thumbnail_path TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS overlay_box (
            overlay_id INTEGER PRIMARY KEY,
            page_id INTEGER NOT NULL REFERENCES page(page_id) ON DELETE CASCADE,
            x REAL NOT NULL,
            y REAL NOT NULL,
            width REAL NOT NULL,
            height REAL NOT NULL,
            rotation REAL NOT NULL DEFAULT 0,
            z_index INTEGER NOT NULL DEFAULT 0,
            original_text TEXT,
            translated_text TEXT,
            is_verified INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tag_group (
            group_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tag (
            tag_id INTEGER PRIMARY KEY,
            group_id INTEGER REFERENCES tag_group(group_id) ON DELETE SET NULL,
            name TEXT NOT NULL,
            description TEXT,
            is_sensitive INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS creator (
            creator_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            role TEXT,
            website_url TEXT,
            social_link TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS source (
            source_id INTEGER PRIMARY KEY,
            platform TEXT,
            source_url TEXT,
            author_handle TEXT,
            post_id TEXT,
            description TEXT,
            discovered_at TEXT NOT NULL,
            is_primary INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comic_tag (
            comic_id INTEGER NOT NULL REFERENCES comic(comic_id) ON DELETE CASCADE,
            tag_id INTEGER NOT NULL REFERENCES tag(tag_id) ON DELETE CASCADE,
            PRIMARY KEY (comic_id, tag_id)
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comic_creator (
            comic_id INTEGER NOT NULL REFERENCES comic(comic_id) ON DELETE CASCADE,
            creator_id INTEGER NOT NULL REFERENCES creator(creator_id) ON DELETE CASCADE,
            PRIMARY KEY (comic_id, creator_id)
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS comic_source (
            comic_id INTEGER NOT NULL REFERENCES comic(comic_id) ON DELETE CASCADE,
            source_id INTEGER NOT NULL REFERENCES source(source_id) ON DELETE CASCADE,
            PRIMARY KEY (comic_id, source_id)
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS text_style (
            text_style_id INTEGER PRIMARY KEY,
            font_family TEXT NOT NULL,
            font_size REAL NOT NULL,
            font_weight TEXT NOT NULL DEFAULT 'normal',
            font_style TEXT NOT NULL DEFAULT 'normal',
            color TEXT,
            background_color TEXT,
            letter_spacing REAL,
            line_height REAL,
            text_align TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS engine (
            engine_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            api_endpoint TEXT,
            api_key TEXT,
            configuration TEXT,
            is_active INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS engine_history (
            history_id INTEGER PRIMARY KEY,
            engine_id INTEGER NOT NULL REFERENCES engine(engine_id) ON DELETE CASCADE,
            overlay_box_id INTEGER REFERENCES overlay_box(overlay_id) ON DELETE SET NULL,
            original_text TEXT,
            translated_text TEXT,
            status TEXT,
            error_message TEXT,
            processed_at TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS download_source (
            download_source_id INTEGER PRIMARY KEY,
            platform TEXT,
            source_url TEXT,
            author_handle TEXT,
            post_id TEXT,
            description TEXT,
            discovered_at TEXT NOT NULL,
            is_primary INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut conn)
    .await?;

    // Create indexes
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_page_comic_id ON page(comic_id)")
        .execute(&mut conn)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_overlay_box_page_id ON overlay_box(page_id)")
        .execute(&mut conn)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tag_group_id ON tag(group_id)")
        .execute(&mut conn)
        .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_engine_history_engine_id ON engine_history(engine_id)",
    )
    .execute(&mut conn)
    .await?;

    conn.close().await?;
    Ok(())
}
