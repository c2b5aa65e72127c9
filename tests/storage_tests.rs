//! Storage backend tests
//!
//! Tests for SeaOrmStorage using temporary SQLite databases.

mod common;

use chrono::{Duration, Utc};
use linktracker::errors::LinkTrackerError;
use linktracker::storage::{Link, NewVisit};

use common::create_temp_storage;

fn test_link(id: &str) -> Link {
    Link {
        id: id.to_string(),
        target_url: format!("https://{}.example.com", id),
        created_at: Utc::now(),
    }
}

fn test_visit(link_id: &str, ip: &str, country: &str) -> NewVisit {
    NewVisit {
        link_id: link_id.to_string(),
        ip: Some(ip.to_string()),
        country: country.to_string(),
        platform: "Linux".to_string(),
        browser: "Firefox".to_string(),
        referrer: None,
        timestamp: Utc::now(),
    }
}

#[tokio::test]
async fn test_insert_and_get_link() {
    let (storage, _dir) = create_temp_storage().await;

    let link = test_link("0a1b2c3d");
    storage.insert_link(&link).await.unwrap();

    let loaded = storage.get_link("0a1b2c3d").await.unwrap().unwrap();
    assert_eq!(loaded.id, link.id);
    assert_eq!(loaded.target_url, link.target_url);
    assert!(storage.link_exists("0a1b2c3d").await.unwrap());

    assert!(storage.get_link("ffffffff").await.unwrap().is_none());
    assert!(!storage.link_exists("ffffffff").await.unwrap());
    assert_eq!(storage.count_links().await.unwrap(), 1);
}

#[tokio::test]
async fn test_duplicate_link_id_is_rejected() {
    let (storage, _dir) = create_temp_storage().await;

    storage.insert_link(&test_link("0a1b2c3d")).await.unwrap();
    let err = storage.insert_link(&test_link("0a1b2c3d")).await.unwrap_err();
    assert!(matches!(err, LinkTrackerError::DatabaseOperation(_)));
}

#[tokio::test]
async fn test_visit_ids_increase() {
    let (storage, _dir) = create_temp_storage().await;

    let first = storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.1", "DE"))
        .await
        .unwrap();
    let second = storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.2", "DE"))
        .await
        .unwrap();

    assert!(second > first);
    assert_eq!(storage.count_visits("0a1b2c3d").await.unwrap(), 2);
}

#[tokio::test]
async fn test_new_visit_has_no_coordinates() {
    let (storage, _dir) = create_temp_storage().await;

    storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.1", "DE"))
        .await
        .unwrap();

    let visits = storage.all_visits("0a1b2c3d").await.unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].latitude, None);
    assert_eq!(visits[0].longitude, None);
    assert_eq!(visits[0].country.as_deref(), Some("DE"));
}

#[tokio::test]
async fn test_update_coordinates_overwrites() {
    let (storage, _dir) = create_temp_storage().await;

    let id = storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.1", "DE"))
        .await
        .unwrap();

    storage
        .update_visit_coordinates("0a1b2c3d", id, 12.3, 45.6)
        .await
        .unwrap();
    let visit = &storage.all_visits("0a1b2c3d").await.unwrap()[0];
    assert_eq!((visit.latitude, visit.longitude), (Some(12.3), Some(45.6)));

    // 相同值再写一次也算成功
    storage
        .update_visit_coordinates("0a1b2c3d", id, 12.3, 45.6)
        .await
        .unwrap();

    storage
        .update_visit_coordinates("0a1b2c3d", id, 1.0, 2.0)
        .await
        .unwrap();
    let visit = &storage.all_visits("0a1b2c3d").await.unwrap()[0];
    assert_eq!((visit.latitude, visit.longitude), (Some(1.0), Some(2.0)));
}

#[tokio::test]
async fn test_update_coordinates_requires_matching_link() {
    let (storage, _dir) = create_temp_storage().await;

    let id = storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.1", "DE"))
        .await
        .unwrap();

    let err = storage
        .update_visit_coordinates("ffffffff", id, 1.0, 2.0)
        .await
        .unwrap_err();
    assert!(matches!(err, LinkTrackerError::VisitNotFound(_)));

    let err = storage
        .update_visit_coordinates("0a1b2c3d", id + 100, 1.0, 2.0)
        .await
        .unwrap_err();
    assert!(matches!(err, LinkTrackerError::VisitNotFound(_)));

    let visit = &storage.all_visits("0a1b2c3d").await.unwrap()[0];
    assert_eq!(visit.latitude, None);
}

#[tokio::test]
async fn test_grouped_stats_counts_and_order() {
    let (storage, _dir) = create_temp_storage().await;

    // 组 A：3 次访问，2 个不同 IP
    for ip in ["203.0.113.1", "203.0.113.1", "203.0.113.2"] {
        storage
            .insert_visit(&test_visit("0a1b2c3d", ip, "DE"))
            .await
            .unwrap();
    }
    // 组 B、C：各 1 次，B 先插入
    storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.3", "FR"))
        .await
        .unwrap();
    storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.4", "US"))
        .await
        .unwrap();
    // 其他链接不计入
    storage
        .insert_visit(&test_visit("ffffffff", "203.0.113.9", "DE"))
        .await
        .unwrap();

    let groups = storage.grouped_stats("0a1b2c3d").await.unwrap();
    assert_eq!(groups.len(), 3);

    assert_eq!(groups[0].country.as_deref(), Some("DE"));
    assert_eq!(groups[0].total_clicks, 3);
    assert_eq!(groups[0].unique_visitors, 2);

    assert_eq!(groups[1].country.as_deref(), Some("FR"));
    assert_eq!(groups[2].country.as_deref(), Some("US"));
    assert_eq!(groups[1].total_clicks, 1);
}

#[tokio::test]
async fn test_coordinates_split_groups() {
    let (storage, _dir) = create_temp_storage().await;

    let a = storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.1", "DE"))
        .await
        .unwrap();
    storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.2", "DE"))
        .await
        .unwrap();
    storage
        .update_visit_coordinates("0a1b2c3d", a, 52.5, 13.4)
        .await
        .unwrap();

    let groups = storage.grouped_stats("0a1b2c3d").await.unwrap();
    assert_eq!(groups.len(), 2);
    // 同为 1 次点击时按最早的 id 排序
    assert_eq!(groups[0].latitude, Some(52.5));
    assert_eq!(groups[1].latitude, None);
}

#[tokio::test]
async fn test_recent_visits_newest_first_with_limit() {
    let (storage, _dir) = create_temp_storage().await;

    let base = Utc::now() - Duration::hours(1);
    for minutes in [10, 30, 20] {
        let mut visit = test_visit("0a1b2c3d", "203.0.113.1", "DE");
        visit.timestamp = base + Duration::minutes(minutes);
        visit.referrer = Some(format!("https://ref.example/{}", minutes));
        storage.insert_visit(&visit).await.unwrap();
    }

    let recent = storage.recent_visits("0a1b2c3d", 2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].referrer.as_deref(), Some("https://ref.example/30"));
    assert_eq!(recent[1].referrer.as_deref(), Some("https://ref.example/20"));

    // all_visits 按 id 升序，不受时间影响
    let all = storage.all_visits("0a1b2c3d").await.unwrap();
    let refs: Vec<_> = all.iter().map(|v| v.referrer.clone().unwrap()).collect();
    assert_eq!(
        refs,
        vec![
            "https://ref.example/10",
            "https://ref.example/30",
            "https://ref.example/20"
        ]
    );
}

#[tokio::test]
async fn test_latest_location() {
    let (storage, _dir) = create_temp_storage().await;

    assert!(storage.latest_location("0a1b2c3d").await.unwrap().is_none());

    let first = storage
        .insert_visit(&test_visit("0a1b2c3d", "203.0.113.1", "DE"))
        .await
        .unwrap();
    storage
        .update_visit_coordinates("0a1b2c3d", first, 48.85, 2.35)
        .await
        .unwrap();

    let location = storage.latest_location("0a1b2c3d").await.unwrap().unwrap();
    assert_eq!(location.latitude, Some(48.85));
    assert_eq!(location.longitude, Some(2.35));

    // 更新的访问尚未上报坐标
    let mut later = test_visit("0a1b2c3d", "203.0.113.2", "DE");
    later.timestamp = Utc::now() + Duration::seconds(5);
    storage.insert_visit(&later).await.unwrap();

    let location = storage.latest_location("0a1b2c3d").await.unwrap().unwrap();
    assert_eq!(location.latitude, None);
    assert_eq!(location.longitude, None);
}

#[tokio::test]
async fn test_backend_config_and_ping() {
    let (storage, _dir) = create_temp_storage().await;
    assert_eq!(storage.get_backend_config().storage_type, "sqlite");
    storage.ping().await.unwrap();
}
