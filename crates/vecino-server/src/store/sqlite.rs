// SPDX-License-Identifier: Apache-2.0

use crate::store::{
    AlertRecord, EntityStore, EventRecord, ListingRecord, ServicePostRecord, StoreError,
};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use vecino_geo::{BoundingBox, Point};
use vecino_model::{EntityId, NeighborhoodId, NeighborhoodSummary, UserId, UserLocation};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS listings(
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    price_cents INTEGER,
    is_free INTEGER NOT NULL DEFAULT 0,
    category TEXT,
    condition TEXT,
    images TEXT NOT NULL DEFAULT '[]',
    author_id TEXT NOT NULL,
    neighborhood_id TEXT,
    sold INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_listings_coords ON listings(latitude, longitude);
CREATE TABLE IF NOT EXISTS alerts(
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    alert_type TEXT NOT NULL,
    urgent INTEGER NOT NULL DEFAULT 0,
    verified INTEGER NOT NULL DEFAULT 0,
    expires_at INTEGER
);
CREATE INDEX IF NOT EXISTS idx_alerts_coords ON alerts(latitude, longitude);
CREATE TABLE IF NOT EXISTS events(
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    category TEXT,
    starts_at INTEGER NOT NULL,
    ends_at INTEGER,
    rsvp_count INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_events_coords ON events(latitude, longitude);
CREATE TABLE IF NOT EXISTS posts(
    id TEXT PRIMARY KEY,
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category TEXT,
    contact TEXT,
    author_id TEXT NOT NULL,
    neighborhood_id TEXT
);
CREATE INDEX IF NOT EXISTS idx_posts_kind ON posts(kind);
CREATE TABLE IF NOT EXISTS user_locations(
    user_id TEXT PRIMARY KEY,
    latitude REAL NOT NULL,
    longitude REAL NOT NULL,
    verified INTEGER NOT NULL DEFAULT 0,
    updated_at INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS neighborhoods(
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    center_lat REAL NOT NULL,
    center_lon REAL NOT NULL,
    member_count INTEGER NOT NULL DEFAULT 0,
    post_count INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_neighborhoods_center ON neighborhoods(center_lat, center_lon);
";

/// Row store over a conventional SQLite file with range indexes on the
/// latitude/longitude columns of every geotagged table. Intentionally not a
/// spatial index; the coarse box predicate is enough at neighborhood scale.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|e| StoreError(e.to_string()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| StoreError(e.to_string()))?;
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| StoreError(e.to_string()))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError("store connection poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| StoreError(e.to_string()))?
    }
}

// A box that crosses the antimeridian arrives with min_lon > max_lon and
// covers [min_lon, 180] plus [-180, max_lon].
const LON_PREDICATE: &str = "(longitude BETWEEN ?3 AND ?4 \
     OR (?3 > ?4 AND (longitude >= ?3 OR longitude <= ?4)))";

fn sql_err(e: rusqlite::Error) -> StoreError {
    StoreError(e.to_string())
}

fn decode_entity_id(raw: String) -> Result<EntityId, StoreError> {
    EntityId::parse(&raw).map_err(|e| StoreError(e.to_string()))
}

fn decode_user_id(raw: String) -> Result<UserId, StoreError> {
    UserId::parse(&raw).map_err(|e| StoreError(e.to_string()))
}

fn decode_neighborhood_id(raw: Option<String>) -> Result<Option<NeighborhoodId>, StoreError> {
    raw.map(|r| NeighborhoodId::parse(&r).map_err(|e| StoreError(e.to_string())))
        .transpose()
}

fn decode_point(latitude: f64, longitude: f64) -> Result<Point, StoreError> {
    Point::new(latitude, longitude).map_err(|e| StoreError(e.to_string()))
}

fn decode_images(raw: String) -> Result<Vec<String>, StoreError> {
    serde_json::from_str(&raw).map_err(|e| StoreError(format!("bad images column: {e}")))
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn listings_in(
        &self,
        bbox: BoundingBox,
        category: Option<&str>,
    ) -> Result<Vec<ListingRecord>, StoreError> {
        let category = category.map(str::to_string);
        self.with_conn(move |conn| {
            let mut sql = format!(
                "SELECT id, title, description, latitude, longitude, price_cents, is_free, \
                 category, condition, images, author_id, neighborhood_id \
                 FROM listings WHERE sold = 0 \
                 AND latitude BETWEEN ?1 AND ?2 AND {LON_PREDICATE}",
            );
            if category.is_some() {
                sql.push_str(" AND category = ?5");
            }
            let mut stmt = conn.prepare(&sql).map_err(sql_err)?;
            let map_row = |row: &rusqlite::Row<'_>| -> Result<ListingRecord, StoreError> {
                Ok(ListingRecord {
                    id: decode_entity_id(row.get(0).map_err(sql_err)?)?,
                    title: row.get(1).map_err(sql_err)?,
                    description: row.get(2).map_err(sql_err)?,
                    location: decode_point(
                        row.get(3).map_err(sql_err)?,
                        row.get(4).map_err(sql_err)?,
                    )?,
                    price_cents: row.get(5).map_err(sql_err)?,
                    is_free: row.get::<_, i64>(6).map_err(sql_err)? != 0,
                    category: row.get(7).map_err(sql_err)?,
                    condition: row.get(8).map_err(sql_err)?,
                    images: decode_images(row.get(9).map_err(sql_err)?)?,
                    author_id: decode_user_id(row.get(10).map_err(sql_err)?)?,
                    neighborhood_id: decode_neighborhood_id(row.get(11).map_err(sql_err)?)?,
                })
            };
            let mut out = Vec::new();
            let mut rows = match &category {
                Some(c) => stmt
                    .query(params![bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon, c])
                    .map_err(sql_err)?,
                None => stmt
                    .query(params![bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon])
                    .map_err(sql_err)?,
            };
            while let Some(row) = rows.next().map_err(sql_err)? {
                out.push(map_row(row)?);
            }
            Ok(out)
        })
        .await
    }

    async fn alerts_in(&self, bbox: BoundingBox, now: i64) -> Result<Vec<AlertRecord>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT id, title, description, latitude, longitude, alert_type, urgent, \
                     verified, expires_at FROM alerts \
                     WHERE (expires_at IS NULL OR expires_at > ?5) \
                     AND latitude BETWEEN ?1 AND ?2 AND {LON_PREDICATE}",
                ))
                .map_err(sql_err)?;
            let mut rows = stmt
                .query(params![bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon, now])
                .map_err(sql_err)?;
            let mut out = Vec::new();
            while let Some(row) = rows.next().map_err(sql_err)? {
                out.push(AlertRecord {
                    id: decode_entity_id(row.get(0).map_err(sql_err)?)?,
                    title: row.get(1).map_err(sql_err)?,
                    description: row.get(2).map_err(sql_err)?,
                    location: decode_point(
                        row.get(3).map_err(sql_err)?,
                        row.get(4).map_err(sql_err)?,
                    )?,
                    alert_type: row.get(5).map_err(sql_err)?,
                    urgent: row.get::<_, i64>(6).map_err(sql_err)? != 0,
                    verified: row.get::<_, i64>(7).map_err(sql_err)? != 0,
                    expires_at: row.get(8).map_err(sql_err)?,
                });
            }
            Ok(out)
        })
        .await
    }

    async fn events_in(&self, bbox: BoundingBox, now: i64) -> Result<Vec<EventRecord>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT id, title, description, latitude, longitude, category, starts_at, \
                     ends_at, rsvp_count FROM events WHERE starts_at > ?5 \
                     AND latitude BETWEEN ?1 AND ?2 AND {LON_PREDICATE}",
                ))
                .map_err(sql_err)?;
            let mut rows = stmt
                .query(params![bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon, now])
                .map_err(sql_err)?;
            let mut out = Vec::new();
            while let Some(row) = rows.next().map_err(sql_err)? {
                out.push(EventRecord {
                    id: decode_entity_id(row.get(0).map_err(sql_err)?)?,
                    title: row.get(1).map_err(sql_err)?,
                    description: row.get(2).map_err(sql_err)?,
                    location: decode_point(
                        row.get(3).map_err(sql_err)?,
                        row.get(4).map_err(sql_err)?,
                    )?,
                    category: row.get(5).map_err(sql_err)?,
                    starts_at: row.get(6).map_err(sql_err)?,
                    ends_at: row.get(7).map_err(sql_err)?,
                    rsvp_count: row.get::<_, i64>(8).map_err(sql_err)?.max(0) as u64,
                });
            }
            Ok(out)
        })
        .await
    }

    async fn service_posts(&self) -> Result<Vec<ServicePostRecord>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, title, description, category, contact, author_id, \
                     neighborhood_id FROM posts WHERE kind = 'service'",
                )
                .map_err(sql_err)?;
            let mut rows = stmt.query([]).map_err(sql_err)?;
            let mut out = Vec::new();
            while let Some(row) = rows.next().map_err(sql_err)? {
                out.push(ServicePostRecord {
                    id: decode_entity_id(row.get(0).map_err(sql_err)?)?,
                    title: row.get(1).map_err(sql_err)?,
                    description: row.get(2).map_err(sql_err)?,
                    category: row.get(3).map_err(sql_err)?,
                    contact: row.get(4).map_err(sql_err)?,
                    author_id: decode_user_id(row.get(5).map_err(sql_err)?)?,
                    neighborhood_id: decode_neighborhood_id(row.get(6).map_err(sql_err)?)?,
                });
            }
            Ok(out)
        })
        .await
    }

    async fn user_location(&self, user: &UserId) -> Result<Option<UserLocation>, StoreError> {
        let user = user.clone();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT latitude, longitude, verified, updated_at FROM user_locations \
                     WHERE user_id = ?1",
                    params![user.as_str()],
                    |row| {
                        Ok((
                            row.get::<_, f64>(0)?,
                            row.get::<_, f64>(1)?,
                            row.get::<_, i64>(2)?,
                            row.get::<_, i64>(3)?,
                        ))
                    },
                )
                .optional()
                .map_err(sql_err)?;
            row.map(|(lat, lon, verified, updated_at)| {
                Ok(UserLocation {
                    user_id: user.clone(),
                    location: decode_point(lat, lon)?,
                    verified: verified != 0,
                    updated_at,
                })
            })
            .transpose()
        })
        .await
    }

    async fn neighborhood_center(
        &self,
        id: &NeighborhoodId,
    ) -> Result<Option<Point>, StoreError> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let row = conn
                .query_row(
                    "SELECT center_lat, center_lon FROM neighborhoods WHERE id = ?1",
                    params![id.as_str()],
                    |row| Ok((row.get::<_, f64>(0)?, row.get::<_, f64>(1)?)),
                )
                .optional()
                .map_err(sql_err)?;
            row.map(|(lat, lon)| decode_point(lat, lon)).transpose()
        })
        .await
    }

    async fn neighborhoods_in(
        &self,
        bbox: BoundingBox,
    ) -> Result<Vec<NeighborhoodSummary>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, name, description, center_lat, center_lon, member_count, \
                     post_count FROM neighborhoods \
                     WHERE center_lat BETWEEN ?1 AND ?2 \
                     AND (center_lon BETWEEN ?3 AND ?4 \
                     OR (?3 > ?4 AND (center_lon >= ?3 OR center_lon <= ?4)))",
                )
                .map_err(sql_err)?;
            let mut rows = stmt
                .query(params![bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon])
                .map_err(sql_err)?;
            let mut out = Vec::new();
            while let Some(row) = rows.next().map_err(sql_err)? {
                let id: String = row.get(0).map_err(sql_err)?;
                out.push(NeighborhoodSummary {
                    id: NeighborhoodId::parse(&id).map_err(|e| StoreError(e.to_string()))?,
                    name: row.get(1).map_err(sql_err)?,
                    description: row.get(2).map_err(sql_err)?,
                    center: decode_point(
                        row.get(3).map_err(sql_err)?,
                        row.get(4).map_err(sql_err)?,
                    )?,
                    member_count: row.get::<_, i64>(5).map_err(sql_err)?.max(0) as u64,
                    post_count: row.get::<_, i64>(6).map_err(sql_err)?.max(0) as u64,
                });
            }
            Ok(out)
        })
        .await
    }

    async fn upsert_user_location(&self, location: UserLocation) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO user_locations(user_id, latitude, longitude, verified, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5) \
                 ON CONFLICT(user_id) DO UPDATE SET \
                 latitude = excluded.latitude, longitude = excluded.longitude, \
                 verified = excluded.verified, updated_at = excluded.updated_at",
                params![
                    location.user_id.as_str(),
                    location.location.latitude,
                    location.location.longitude,
                    i64::from(location.verified),
                    location.updated_at,
                ],
            )
            .map_err(sql_err)?;
            Ok(())
        })
        .await
    }
}
