// SPDX-License-Identifier: Apache-2.0

//! The SQLite entity store against a seeded on-disk fixture.

mod support;

use rusqlite::Connection;
use support::*;
use vecino_geo::BoundingBox;
use vecino_model::UserLocation;
use vecino_server::{EntityStore, SqliteStore};

fn seeded_store(dir: &tempfile::TempDir) -> SqliteStore {
    let path = dir.path().join("vecino.sqlite");
    let store = SqliteStore::open(&path).expect("open store");
    let conn = Connection::open(&path).expect("open seeding connection");
    conn.execute_batch(
        "INSERT INTO listings(id, title, description, latitude, longitude, price_cents, is_free, category, condition, images, author_id, neighborhood_id, sold)
         VALUES ('l-in', 'Bookshelf', 'Solid pine', -1.2921, 36.8219, 1500, 0, 'furniture', 'good', '[\"a.jpg\"]', 'u-1', NULL, 0),
                ('l-out', 'Kayak', 'Barely used', -1.9000, 36.8219, 9000, 0, 'sports', 'good', '[]', 'u-2', NULL, 0),
                ('l-sold', 'Lamp', 'Gone', -1.2921, 36.8219, 500, 0, 'furniture', 'fair', '[]', 'u-1', NULL, 1);
         INSERT INTO alerts(id, title, description, latitude, longitude, alert_type, urgent, verified, expires_at)
         VALUES ('a-live', 'Water outage', '', -1.2921, 36.8219, 'utility', 0, 1, NULL),
                ('a-expired', 'Old news', '', -1.2921, 36.8219, 'utility', 0, 0, 1000);
         INSERT INTO events(id, title, description, latitude, longitude, category, starts_at, ends_at, rsvp_count)
         VALUES ('e-future', 'Street clean-up', '', -1.2921, 36.8219, 'community', 4102444800, NULL, 7),
                ('e-past', 'Last year', '', -1.2921, 36.8219, 'community', 1000, NULL, 3);
         INSERT INTO posts(id, kind, title, description, category, contact, author_id, neighborhood_id)
         VALUES ('s-1', 'service', 'Bike repair', '', 'repairs', 'ring twice', 'u-1', 'n-1'),
                ('p-1', 'general', 'Hello neighbors', '', NULL, NULL, 'u-2', NULL);
         INSERT INTO neighborhoods(id, name, description, center_lat, center_lon, member_count, post_count)
         VALUES ('n-1', 'Kilimani', NULL, -1.2900, 36.7870, 230, 54);",
    )
    .expect("seed rows");
    store
}

#[tokio::test]
async fn listings_respect_box_sold_flag_and_category() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = seeded_store(&dir);
    let bbox = BoundingBox::around(center(), 5.0);

    let all = store.listings_in(bbox, None).await.expect("query");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id.as_str(), "l-in");
    assert_eq!(all[0].images, vec!["a.jpg".to_string()]);

    let furniture = store
        .listings_in(bbox, Some("furniture"))
        .await
        .expect("query");
    assert_eq!(furniture.len(), 1);
    let sports = store.listings_in(bbox, Some("sports")).await.expect("query");
    assert!(sports.is_empty());
}

#[tokio::test]
async fn listing_across_the_antimeridian_is_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = seeded_store(&dir);
    let conn = Connection::open(dir.path().join("vecino.sqlite")).expect("open connection");
    conn.execute_batch(
        "INSERT INTO listings(id, title, description, latitude, longitude, price_cents, is_free, category, condition, images, author_id, neighborhood_id, sold)
         VALUES ('l-wrap', 'Outrigger canoe', '', 0.0, -179.98, 20000, 0, 'boats', 'good', '[]', 'u-3', NULL, 0);",
    )
    .expect("seed row");

    // Query centered just west of the date line; the listing sits just east.
    let bbox = BoundingBox::around(point(0.0, 179.98), 5.0);
    let rows = store.listings_in(bbox, None).await.expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id.as_str(), "l-wrap");
}

#[tokio::test]
async fn alerts_exclude_expired_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = seeded_store(&dir);
    let bbox = BoundingBox::around(center(), 5.0);

    let alerts = store.alerts_in(bbox, 2000).await.expect("query");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id.as_str(), "a-live");
    assert!(alerts[0].verified);
}

#[tokio::test]
async fn events_only_return_upcoming_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = seeded_store(&dir);
    let bbox = BoundingBox::around(center(), 5.0);

    let events = store.events_in(bbox, 2000).await.expect("query");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id.as_str(), "e-future");
    assert_eq!(events[0].rsvp_count, 7);
}

#[tokio::test]
async fn only_service_kind_posts_are_returned() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = seeded_store(&dir);

    let posts = store.service_posts().await.expect("query");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id.as_str(), "s-1");
    assert_eq!(
        posts[0].neighborhood_id.as_ref().map(|n| n.as_str()),
        Some("n-1")
    );
}

#[tokio::test]
async fn user_location_upsert_is_last_write_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = seeded_store(&dir);
    let user = user_id("u-9");

    assert!(store.user_location(&user).await.expect("read").is_none());

    store
        .upsert_user_location(UserLocation {
            user_id: user.clone(),
            location: point(-1.30, 36.80),
            verified: false,
            updated_at: 100,
        })
        .await
        .expect("first write");
    store
        .upsert_user_location(UserLocation {
            user_id: user.clone(),
            location: point(-1.28, 36.82),
            verified: true,
            updated_at: 200,
        })
        .await
        .expect("second write");

    let row = store
        .user_location(&user)
        .await
        .expect("read")
        .expect("row present");
    assert_eq!(row.location, point(-1.28, 36.82));
    assert!(row.verified);
    assert_eq!(row.updated_at, 200);
}

#[tokio::test]
async fn neighborhood_lookups_cover_center_and_box_scan() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = seeded_store(&dir);

    let hood = neighborhood_id("n-1");
    let found = store
        .neighborhood_center(&hood)
        .await
        .expect("read")
        .expect("center present");
    assert_eq!(found, point(-1.2900, 36.7870));
    assert!(store
        .neighborhood_center(&neighborhood_id("n-404"))
        .await
        .expect("read")
        .is_none());

    let bbox = BoundingBox::around(center(), 10.0);
    let hoods = store.neighborhoods_in(bbox).await.expect("scan");
    assert_eq!(hoods.len(), 1);
    assert_eq!(hoods[0].member_count, 230);
    assert_eq!(hoods[0].post_count, 54);
}
