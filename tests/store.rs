//! Store-layer tests: repository contracts, staged-write visibility,
//! cascade and nullify behavior, and transaction boundaries, all against a
//! real SQLite database in a temp directory.

use chrono::{Duration, Utc};
use tempfile::TempDir;

use qrganize::config::{Config, CorsConfig, DbConfig, ServerConfig};
use qrganize::migrate::run_migrations;
use qrganize::models::{
    Comic, ComicCreator, ComicSource, ComicTag, Creator, DownloadSource, Engine, EngineHistory,
    OverlayBox, Page, Source, Tag, TagGroup, TextStyle,
};
use qrganize::store::{Filter, UnitOfWorkFactory};

async fn setup() -> (TempDir, UnitOfWorkFactory) {
    let tmp = TempDir::new().unwrap();
    let config = Config {
        db: DbConfig {
            path: tmp.path().join("qrganize.sqlite"),
        },
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
        },
        cors: CorsConfig::default(),
    };
    run_migrations(&config).await.unwrap();
    let factory = UnitOfWorkFactory::from_config(&config).unwrap();
    (tmp, factory)
}

fn sample_comic(title: &str) -> Comic {
    let now = Utc::now();
    Comic {
        comic_id: 0,
        title: title.to_string(),
        alternative_title: None,
        description: Some("a test title".to_string()),
        managed_path: format!("/data/{}", title),
        cover_image_path: None,
        cover_page_id: None,
        status: "active".to_string(),
        rating: None,
        created_at: now,
        updated_at: now,
    }
}

fn sample_page(comic_id: i64, page_number: i64) -> Page {
    Page {
        page_id: 0,
        comic_id,
        page_number,
        storage_path: format!("/data/pages/{}", page_number),
        file_name: format!("{:03}.png", page_number),
        file_extension: Some("png".to_string()),
        file_size_bytes: Some(1024),
        width: Some(1200),
        height: Some(1800),
        dpi: None,
        color_profile: None,
        image_hash: None,
        thumbnail_path: None,
        created_at: Utc::now(),
    }
}

fn sample_overlay_box(page_id: i64) -> OverlayBox {
    let now = Utc::now();
    OverlayBox {
        overlay_id: 0,
        page_id,
        x: 10.0,
        y: 20.0,
        width: 100.0,
        height: 40.0,
        rotation: 0.0,
        z_index: 0,
        original_text: Some("こんにちは".to_string()),
        translated_text: None,
        is_verified: false,
        created_at: now,
        updated_at: now,
    }
}

fn sample_tag(name: &str, group_id: Option<i64>) -> Tag {
    Tag {
        tag_id: 0,
        group_id,
        name: name.to_string(),
        description: None,
        is_sensitive: false,
        created_at: Utc::now(),
    }
}

fn sample_engine(name: &str) -> Engine {
    let now = Utc::now();
    Engine {
        engine_id: 0,
        name: name.to_string(),
        engine_type: "ocr".to_string(),
        api_endpoint: None,
        api_key: None,
        configuration: None,
        is_active: false,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn add_save_get_roundtrip_populates_key() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let before = Utc::now();
    let comic = uow.comics().add(sample_comic("Example")).await.unwrap();
    uow.save_changes().await.unwrap();

    assert!(comic.comic_id > 0);

    let mut uow = factory.create().await.unwrap();
    let fetched = uow
        .comics()
        .get_by_id(comic.comic_id)
        .await
        .unwrap()
        .expect("comic should exist after save");

    assert_eq!(fetched.comic_id, comic.comic_id);
    assert_eq!(fetched.title, "Example");
    assert_eq!(fetched.description.as_deref(), Some("a test title"));
    assert_eq!(fetched.managed_path, "/data/Example");
    assert_eq!(fetched.status, "active");
    assert_eq!(fetched.rating, None);
    // Server-assigned timestamps are populated, not defaulted.
    assert!((fetched.created_at - before).abs() < Duration::seconds(5));
}

#[tokio::test]
async fn staged_writes_invisible_until_save_changes() {
    let (_tmp, factory) = setup().await;

    let mut staging = factory.create().await.unwrap();
    staging.comics().add(sample_comic("Unsaved")).await.unwrap();

    // A fresh unit of work must not observe the staged insert.
    let mut reader = factory.create().await.unwrap();
    assert!(reader.comics().get_all().await.unwrap().is_empty());

    // Dropping the staging unit of work rolls everything back.
    drop(staging);

    let mut reader = factory.create().await.unwrap();
    assert!(reader.comics().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn save_changes_reports_affected_rows() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    uow.comics().add(sample_comic("One")).await.unwrap();
    uow.comics().add(sample_comic("Two")).await.unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 2);

    // Nothing staged: a no-op returning zero.
    assert_eq!(uow.save_changes().await.unwrap(), 0);
}

#[tokio::test]
async fn writes_across_entity_types_commit_together() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let comic = uow.comics().add(sample_comic("Linked")).await.unwrap();
    let tag = uow.tags().add(sample_tag("action", None)).await.unwrap();
    uow.comic_tags()
        .add(ComicTag {
            comic_id: comic.comic_id,
            tag_id: tag.tag_id,
        })
        .await
        .unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 3);

    let mut uow = factory.create().await.unwrap();
    assert_eq!(uow.comic_tags().count(Filter::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_comic_cascades_to_dependents() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let comic = uow.comics().add(sample_comic("Doomed")).await.unwrap();
    let page = uow
        .pages()
        .add(sample_page(comic.comic_id, 1))
        .await
        .unwrap();
    uow.overlay_boxes()
        .add(sample_overlay_box(page.page_id))
        .await
        .unwrap();

    let tag = uow.tags().add(sample_tag("drama", None)).await.unwrap();
    let creator = uow
        .creators()
        .add(Creator {
            creator_id: 0,
            name: "Aoi".to_string(),
            role: Some("artist".to_string()),
            website_url: None,
            social_link: None,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    let source = uow
        .sources()
        .add(Source {
            source_id: 0,
            platform: Some("pixiv".to_string()),
            source_url: None,
            author_handle: None,
            post_id: None,
            description: None,
            discovered_at: Utc::now(),
            is_primary: true,
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    uow.comic_tags()
        .add(ComicTag {
            comic_id: comic.comic_id,
            tag_id: tag.tag_id,
        })
        .await
        .unwrap();
    uow.comic_creators()
        .add(ComicCreator {
            comic_id: comic.comic_id,
            creator_id: creator.creator_id,
        })
        .await
        .unwrap();
    uow.comic_sources()
        .add(ComicSource {
            comic_id: comic.comic_id,
            source_id: source.source_id,
        })
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    let comic = uow.comics().get_by_id(comic.comic_id).await.unwrap().unwrap();
    uow.comics().delete(&comic).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    assert!(uow.pages().get_all().await.unwrap().is_empty());
    assert!(uow.overlay_boxes().get_all().await.unwrap().is_empty());
    assert!(uow.comic_tags().get_all().await.unwrap().is_empty());
    assert!(uow.comic_creators().get_all().await.unwrap().is_empty());
    assert!(uow.comic_sources().get_all().await.unwrap().is_empty());
    // The linked records themselves survive; only the links die.
    assert_eq!(uow.tags().count(Filter::new()).await.unwrap(), 1);
    assert_eq!(uow.creators().count(Filter::new()).await.unwrap(), 1);
    assert_eq!(uow.sources().count(Filter::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_tag_group_nullifies_member_tags() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let group = uow
        .tag_groups()
        .add(TagGroup {
            group_id: 0,
            name: "genre".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    let tag = uow
        .tags()
        .add(sample_tag("romance", Some(group.group_id)))
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    let group = uow
        .tag_groups()
        .get_by_id(group.group_id)
        .await
        .unwrap()
        .unwrap();
    uow.tag_groups().delete(&group).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    let orphan = uow.tags().get_by_id(tag.tag_id).await.unwrap().unwrap();
    assert_eq!(orphan.group_id, None);
    assert_eq!(orphan.name, "romance");
}

#[tokio::test]
async fn deleting_engine_cascades_history_and_overlay_delete_nullifies() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let comic = uow.comics().add(sample_comic("Inked")).await.unwrap();
    let page = uow
        .pages()
        .add(sample_page(comic.comic_id, 1))
        .await
        .unwrap();
    let overlay = uow
        .overlay_boxes()
        .add(sample_overlay_box(page.page_id))
        .await
        .unwrap();

    let engine = uow.engines().add(sample_engine("tesseract")).await.unwrap();
    let history = uow
        .engine_histories()
        .add(EngineHistory {
            history_id: 0,
            engine_id: engine.engine_id,
            overlay_box_id: Some(overlay.overlay_id),
            original_text: Some("こんにちは".to_string()),
            translated_text: Some("hello".to_string()),
            status: Some("ok".to_string()),
            error_message: None,
            processed_at: Utc::now(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    // Deleting the overlay box clears the optional reference.
    let mut uow = factory.create().await.unwrap();
    let overlay = uow
        .overlay_boxes()
        .get_by_id(overlay.overlay_id)
        .await
        .unwrap()
        .unwrap();
    uow.overlay_boxes().delete(&overlay).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    let orphaned = uow
        .engine_histories()
        .get_by_id(history.history_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(orphaned.overlay_box_id, None);

    // Deleting the engine removes its history.
    let engine = uow.engines().get_by_id(engine.engine_id).await.unwrap().unwrap();
    uow.engines().delete(&engine).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    assert!(uow.engine_histories().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn find_any_count_agree() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let mut archived = sample_comic("Old");
    archived.status = "archived".to_string();
    uow.comics().add(sample_comic("A")).await.unwrap();
    uow.comics().add(sample_comic("B")).await.unwrap();
    uow.comics().add(archived).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    let filter = Filter::new().eq("status", "active");

    let found = uow.comics().find(filter.clone()).await.unwrap();
    let count = uow.comics().count(filter.clone()).await.unwrap();
    let any = uow.comics().any(filter.clone()).await.unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(count, 2);
    assert!(found.iter().all(|c| c.status == "active"));
    assert_eq!(any, count > 0);

    let none = Filter::new().eq("status", "missing");
    assert!(!uow.comics().any(none.clone()).await.unwrap());
    assert_eq!(uow.comics().count(none).await.unwrap(), 0);
}

#[tokio::test]
async fn first_returns_at_most_one_match() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    uow.comics().add(sample_comic("X")).await.unwrap();
    uow.comics().add(sample_comic("Y")).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    let one = uow
        .comics()
        .first(Filter::new().eq("status", "active"))
        .await
        .unwrap();
    assert!(one.is_some());

    let missing = uow
        .comics()
        .first(Filter::new().eq("status", "missing"))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn independent_units_of_work_do_not_interfere() {
    let (_tmp, factory) = setup().await;

    let mut uow_a = factory.create().await.unwrap();
    let a = uow_a.comics().add(sample_comic("First")).await.unwrap();
    uow_a.save_changes().await.unwrap();

    let mut uow_b = factory.create().await.unwrap();
    let b = uow_b.comics().add(sample_comic("Second")).await.unwrap();
    uow_b.save_changes().await.unwrap();

    assert_ne!(a.comic_id, b.comic_id);

    let mut reader = factory.create().await.unwrap();
    assert_eq!(reader.comics().count(Filter::new()).await.unwrap(), 2);
}

#[tokio::test]
async fn update_rewrites_full_row() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let mut comic = uow.comics().add(sample_comic("Draft")).await.unwrap();
    uow.save_changes().await.unwrap();

    comic.title = "Final".to_string();
    comic.rating = Some(5);
    comic.updated_at = Utc::now();

    let mut uow = factory.create().await.unwrap();
    uow.comics().update(&comic).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    let fetched = uow.comics().get_by_id(comic.comic_id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Final");
    assert_eq!(fetched.rating, Some(5));
    assert_eq!(fetched.managed_path, comic.managed_path);
}

#[tokio::test]
async fn add_range_and_delete_range() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let comic = uow.comics().add(sample_comic("Paged")).await.unwrap();
    let pages = uow
        .pages()
        .add_range(vec![
            sample_page(comic.comic_id, 1),
            sample_page(comic.comic_id, 2),
            sample_page(comic.comic_id, 3),
        ])
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    assert!(pages.iter().all(|p| p.page_id > 0));

    let mut uow = factory.create().await.unwrap();
    let stored = uow
        .pages()
        .find(Filter::new().eq("comic_id", comic.comic_id))
        .await
        .unwrap();
    uow.pages().delete_range(&stored).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    assert_eq!(uow.pages().count(Filter::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_page_numbers_are_permitted() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let comic = uow.comics().add(sample_comic("Scanlation")).await.unwrap();
    uow.pages().add(sample_page(comic.comic_id, 1)).await.unwrap();
    uow.pages().add(sample_page(comic.comic_id, 1)).await.unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    let count = uow
        .pages()
        .count(Filter::new().eq("comic_id", comic.comic_id).eq("page_number", 1))
        .await
        .unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn foreign_key_violation_fails_the_whole_batch() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    uow.comics().add(sample_comic("Valid")).await.unwrap();
    // Page referencing a comic that does not exist.
    let err = uow.pages().add(sample_page(9999, 1)).await;
    assert!(err.is_err());

    // The failed batch was discarded: nothing from it commits.
    uow.save_changes().await.unwrap();

    let mut reader = factory.create().await.unwrap();
    assert!(reader.comics().get_all().await.unwrap().is_empty());
    assert!(reader.pages().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn explicit_transaction_rollback_discards_saved_batches() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    uow.begin_transaction().await.unwrap();
    uow.comics().add(sample_comic("Batch1")).await.unwrap();
    uow.save_changes().await.unwrap();
    uow.comics().add(sample_comic("Batch2")).await.unwrap();
    uow.save_changes().await.unwrap();
    uow.rollback_transaction().await.unwrap();
    uow.close().await.unwrap();

    let mut reader = factory.create().await.unwrap();
    assert!(reader.comics().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn explicit_transaction_commit_makes_batches_durable() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    uow.begin_transaction().await.unwrap();
    uow.comics().add(sample_comic("Batch1")).await.unwrap();
    uow.save_changes().await.unwrap();
    uow.comics().add(sample_comic("Batch2")).await.unwrap();
    uow.save_changes().await.unwrap();

    // Saved-but-uncommitted batches stay invisible to other sessions.
    let mut reader = factory.create().await.unwrap();
    assert!(reader.comics().get_all().await.unwrap().is_empty());

    uow.commit_transaction().await.unwrap();

    let mut reader = factory.create().await.unwrap();
    assert_eq!(reader.comics().count(Filter::new()).await.unwrap(), 2);
}

#[tokio::test]
async fn commit_and_rollback_without_transaction_are_noops() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    uow.commit_transaction().await.unwrap();
    uow.rollback_transaction().await.unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 0);
}

#[tokio::test]
async fn unreferenced_entities_roundtrip() {
    let (_tmp, factory) = setup().await;
    let mut uow = factory.create().await.unwrap();

    let style = uow
        .text_styles()
        .add(TextStyle {
            text_style_id: 0,
            font_family: "Noto Sans".to_string(),
            font_size: 14.0,
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            color: Some("#222222".to_string()),
            background_color: None,
            letter_spacing: None,
            line_height: Some(1.4),
            text_align: Some("center".to_string()),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    let download = uow
        .download_sources()
        .add(DownloadSource {
            download_source_id: 0,
            platform: Some("twitter".to_string()),
            source_url: Some("https://example.com/post/1".to_string()),
            author_handle: Some("@artist".to_string()),
            post_id: Some("1".to_string()),
            description: None,
            discovered_at: Utc::now(),
            is_primary: false,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    let mut uow = factory.create().await.unwrap();
    let style = uow
        .text_styles()
        .get_by_id(style.text_style_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(style.font_family, "Noto Sans");
    assert_eq!(style.font_size, 14.0);

    let download = uow
        .download_sources()
        .get_by_id(download.download_source_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(download.platform.as_deref(), Some("twitter"));
}
