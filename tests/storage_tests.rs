//! Storage backend tests
//!
//! Tests for AnalyticsStorage using temporary SQLite databases.

use sea_orm::ConnectionTrait;
use tempfile::TempDir;
use tourstats::storage::{
    AgeBracket, AnalyticsStorage, InterestType, PageCategory, StayDuration, VisitorFilter,
    VisitorProfile, VisitorType,
};

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_storage() -> (AnalyticsStorage, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let storage = AnalyticsStorage::new(&db_url)
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

fn profile(
    visitor_type: VisitorType,
    stay_duration: StayDuration,
    age_bracket: AgeBracket,
    interest_type: InterestType,
) -> VisitorProfile {
    VisitorProfile {
        visitor_type,
        stay_duration,
        age_bracket,
        interest_type,
    }
}

fn family_hiker() -> VisitorProfile {
    profile(
        VisitorType::Family,
        StayDuration::OneToTwoWeeks,
        AgeBracket::From36To45,
        InterestType::Hiking,
    )
}

fn solo_foodie() -> VisitorProfile {
    profile(
        VisitorType::Solo,
        StayDuration::UnderOneWeek,
        AgeBracket::From18To25,
        InterestType::Food,
    )
}

// =============================================================================
// 初始化与计数器
// =============================================================================

#[tokio::test]
async fn test_fresh_database_is_empty() {
    let (storage, _dir) = create_temp_storage().await;

    assert_eq!(storage.get_total_views().await.unwrap(), 0);
    assert!(storage.list_visitors().await.unwrap().is_empty());
    assert!(storage.list_page_views().await.unwrap().is_empty());

    let summary = storage.summary().await.unwrap();
    assert_eq!(summary.visitor_count, 0);
    assert_eq!(summary.page_count, 0);
    assert!(summary.last_activity.is_none());
}

#[tokio::test]
async fn test_increment_total_views() {
    let (storage, _dir) = create_temp_storage().await;

    storage.increment_total_views().await.unwrap();
    storage.increment_total_views().await.unwrap();
    storage.increment_total_views().await.unwrap();

    assert_eq!(storage.get_total_views().await.unwrap(), 3);
}

#[tokio::test]
async fn test_add_total_views_ignores_non_positive() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_total_views(40).await.unwrap();
    storage.add_total_views(0).await.unwrap();
    storage.add_total_views(-5).await.unwrap();

    assert_eq!(storage.get_total_views().await.unwrap(), 40);
}

#[tokio::test]
async fn test_reopen_keeps_counter() {
    let temp_dir = TempDir::new().unwrap();
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("reopen.db").display()
    );

    let storage = AnalyticsStorage::new(&db_url).await.unwrap();
    storage.add_total_views(7).await.unwrap();
    storage.close().await.unwrap();

    let reopened = AnalyticsStorage::new(&db_url).await.unwrap();
    assert_eq!(reopened.get_total_views().await.unwrap(), 7);
}

#[tokio::test]
async fn test_negative_stored_counter_reads_as_zero() {
    let (storage, _temp_dir) = create_temp_storage().await;

    storage
        .get_db()
        .execute_unprepared("UPDATE total_views SET view_count = -5 WHERE id = 1")
        .await
        .unwrap();

    assert_eq!(storage.get_total_views().await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_database_url_is_rejected() {
    assert!(AnalyticsStorage::new("").await.is_err());
}

// =============================================================================
// 页面浏览
// =============================================================================

#[tokio::test]
async fn test_add_page_view_upserts_same_pair() {
    let (storage, _dir) = create_temp_storage().await;

    storage
        .add_page_view("Old Town Walk", PageCategory::Culture)
        .await
        .unwrap();
    storage
        .add_page_view("Old Town Walk", PageCategory::Culture)
        .await
        .unwrap();

    let pages = storage.list_page_views().await.unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].page_name, "Old Town Walk");
    assert_eq!(pages[0].category, "Culture");
    assert_eq!(pages[0].view_count, 2);
}

#[tokio::test]
async fn test_same_name_different_category_is_separate_row() {
    let (storage, _dir) = create_temp_storage().await;

    storage
        .add_page_view("Harbour", PageCategory::Nature)
        .await
        .unwrap();
    storage
        .add_page_view("Harbour", PageCategory::Dining)
        .await
        .unwrap();

    assert_eq!(storage.list_page_views().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_page_views_ordered_by_count() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_page_view("Home", PageCategory::Home).await.unwrap();
    for _ in 0..3 {
        storage
            .add_page_view("Hiking trails", PageCategory::Activities)
            .await
            .unwrap();
    }
    storage
        .add_page_view("Campsites", PageCategory::Lodging)
        .await
        .unwrap();
    storage
        .add_page_view("Campsites", PageCategory::Lodging)
        .await
        .unwrap();

    let names: Vec<String> = storage
        .list_page_views()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.page_name)
        .collect();
    assert_eq!(names, vec!["Hiking trails", "Campsites", "Home"]);
}

#[tokio::test]
async fn test_update_and_get_page() {
    let (storage, _dir) = create_temp_storage().await;

    storage
        .add_page_view("Markets", PageCategory::Dining)
        .await
        .unwrap();
    let id = storage.list_page_views_with_id().await.unwrap()[0].id;

    assert!(
        storage
            .update_page(id, "Weekly markets", PageCategory::Events)
            .await
            .unwrap()
    );

    let page = storage.get_page(id).await.unwrap().expect("page exists");
    assert_eq!(page.page_name, "Weekly markets");
    assert_eq!(page.category, "Events");
    assert_eq!(page.view_count, 1);

    assert!(
        !storage
            .update_page(id + 100, "Nowhere", PageCategory::Home)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_update_page_onto_existing_pair_fails() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_page_view("A", PageCategory::Home).await.unwrap();
    storage.add_page_view("B", PageCategory::Home).await.unwrap();
    let pages = storage.list_page_views_with_id().await.unwrap();
    let b = pages.iter().find(|p| p.page_name == "B").unwrap();

    assert!(storage.update_page(b.id, "A", PageCategory::Home).await.is_err());
}

#[tokio::test]
async fn test_delete_page_unknown_id_is_noop() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_page_view("Home", PageCategory::Home).await.unwrap();
    let before = storage.list_page_views().await.unwrap();

    assert!(!storage.delete_page(9999).await.unwrap());
    assert_eq!(storage.list_page_views().await.unwrap(), before);
}

#[tokio::test]
async fn test_delete_page_existing() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_page_view("Home", PageCategory::Home).await.unwrap();
    let id = storage.list_page_views_with_id().await.unwrap()[0].id;

    assert!(storage.delete_page(id).await.unwrap());
    assert!(storage.get_page(id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_pages_by_categories() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_page_view("Home", PageCategory::Home).await.unwrap();
    storage.add_page_view("Museum", PageCategory::Culture).await.unwrap();
    storage.add_page_view("Castle", PageCategory::Culture).await.unwrap();
    storage.add_page_view("Lake", PageCategory::Nature).await.unwrap();

    let deleted = storage
        .delete_pages_by_categories(&[PageCategory::Culture, PageCategory::Nature])
        .await
        .unwrap();
    assert_eq!(deleted, 3);

    let remaining = storage.list_page_views().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].category, "Home");

    assert_eq!(storage.delete_pages_by_categories(&[]).await.unwrap(), 0);
}

// =============================================================================
// 访客
// =============================================================================

#[tokio::test]
async fn test_list_visitors_newest_first() {
    let (storage, _dir) = create_temp_storage().await;

    let first = storage.add_visitor(&family_hiker()).await.unwrap();
    let second = storage.add_visitor(&solo_foodie()).await.unwrap();

    let visitors = storage.list_visitors().await.unwrap();
    assert_eq!(visitors.len(), 2);
    assert_eq!(visitors[0].id, second.id);
    assert_eq!(visitors[1].id, first.id);
    assert_eq!(visitors[0].visitor_type, "Solo");
    assert_eq!(visitors[1].stay_duration, "1-2 weeks");
}

#[tokio::test]
async fn test_update_visitor_changes_all_fields() {
    let (storage, _dir) = create_temp_storage().await;

    let visitor = storage.add_visitor(&family_hiker()).await.unwrap();
    let before = storage.get_visitor(visitor.id).await.unwrap().unwrap();
    let updated = profile(
        VisitorType::Couple,
        StayDuration::OverThreeMonths,
        AgeBracket::Over65,
        InterestType::CultureHeritage,
    );

    assert!(storage.update_visitor(visitor.id, &updated).await.unwrap());

    let stored = storage.get_visitor(visitor.id).await.unwrap().unwrap();
    assert_eq!(stored.visitor_type, "Couple");
    assert_eq!(stored.stay_duration, ">3 months");
    assert_eq!(stored.age_bracket, "65+");
    assert_eq!(stored.interest_type, "Culture/Heritage");
    assert_eq!(stored.visited_at, before.visited_at);
}

#[tokio::test]
async fn test_update_visitor_unknown_id() {
    let (storage, _dir) = create_temp_storage().await;
    assert!(!storage.update_visitor(42, &solo_foodie()).await.unwrap());
}

#[tokio::test]
async fn test_delete_visitor() {
    let (storage, _dir) = create_temp_storage().await;

    let visitor = storage.add_visitor(&solo_foodie()).await.unwrap();
    assert!(storage.delete_visitor(visitor.id).await.unwrap());
    assert!(!storage.delete_visitor(visitor.id).await.unwrap());
    assert!(storage.get_visitor(visitor.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_visitors_by_criteria_conjunction() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_visitor(&family_hiker()).await.unwrap();
    storage.add_visitor(&family_hiker()).await.unwrap();
    storage
        .add_visitor(&profile(
            VisitorType::Family,
            StayDuration::UnderOneWeek,
            AgeBracket::From36To45,
            InterestType::Hiking,
        ))
        .await
        .unwrap();
    storage.add_visitor(&solo_foodie()).await.unwrap();

    let filter = VisitorFilter {
        visitor_type: Some(VisitorType::Family),
        stay_duration: Some(StayDuration::OneToTwoWeeks),
        ..Default::default()
    };
    assert_eq!(storage.delete_visitors_by_criteria(&filter).await.unwrap(), 2);

    let remaining = storage.list_visitors().await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(
        remaining
            .iter()
            .all(|v| !(v.visitor_type == "Family" && v.stay_duration == "1-2 weeks"))
    );
}

#[tokio::test]
async fn test_delete_visitors_empty_filter_removes_all() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_visitor(&family_hiker()).await.unwrap();
    storage.add_visitor(&solo_foodie()).await.unwrap();

    let deleted = storage
        .delete_visitors_by_criteria(&VisitorFilter::default())
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert!(storage.list_visitors().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_visitor_stats_breakdown() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_visitor(&family_hiker()).await.unwrap();
    storage.add_visitor(&family_hiker()).await.unwrap();
    storage.add_visitor(&solo_foodie()).await.unwrap();

    let stats = storage.get_visitor_stats().await.unwrap();

    assert_eq!(stats.visitor_types.len(), 2);
    assert_eq!(stats.visitor_types[0].value, "Family");
    assert_eq!(stats.visitor_types[0].count, 2);
    assert_eq!(stats.visitor_types[1].value, "Solo");
    assert_eq!(stats.visitor_types[1].count, 1);

    let total: i64 = stats.interest_types.iter().map(|c| c.count).sum();
    assert_eq!(total, 3);
    assert_eq!(stats.age_brackets[0].value, "36-45");
}

#[tokio::test]
async fn test_summary_counts() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_visitor(&family_hiker()).await.unwrap();
    storage.add_visitor(&solo_foodie()).await.unwrap();
    storage.add_page_view("Home", PageCategory::Home).await.unwrap();
    storage.add_total_views(12).await.unwrap();

    let summary = storage.summary().await.unwrap();
    assert_eq!(summary.total_views, 12);
    assert_eq!(summary.visitor_count, 2);
    assert_eq!(summary.page_count, 1);
    let newest = storage.list_visitors().await.unwrap()[0].visited_at;
    assert_eq!(summary.last_activity, Some(newest));
}

// =============================================================================
// 重置
// =============================================================================

#[tokio::test]
async fn test_reset_all_data_is_idempotent() {
    let (storage, _dir) = create_temp_storage().await;

    storage.add_visitor(&family_hiker()).await.unwrap();
    storage.add_page_view("Home", PageCategory::Home).await.unwrap();
    storage.add_total_views(5).await.unwrap();

    for _ in 0..2 {
        assert!(storage.reset_all_data().await.unwrap());

        let summary = storage.summary().await.unwrap();
        assert_eq!(summary.total_views, 0);
        assert_eq!(summary.visitor_count, 0);
        assert_eq!(summary.page_count, 0);
    }

    // 计数器在重置后仍可继续使用
    storage.increment_total_views().await.unwrap();
    assert_eq!(storage.get_total_views().await.unwrap(), 1);
}

#[tokio::test]
async fn test_fresh_schema_has_no_legacy_constraints() {
    let (storage, _dir) = create_temp_storage().await;
    assert!(!storage.has_legacy_constraints().await.unwrap());
}
