//! Report repository
//!
//! Read-side fetches feeding the sales aggregation. Only COMPLETED orders
//! contribute to any aggregate; the windowed scans lean on the
//! `order_created_at` index.

use super::{BaseRepository, RepoResult};
use crate::db::models::Order;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct ReportRepository {
    base: BaseRepository,
}

impl ReportRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All completed orders
    pub async fn completed_orders(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE payment_status = 'COMPLETED' ORDER BY created_at")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Completed orders created at or after `start` (epoch millis)
    pub async fn completed_orders_since(&self, start: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE payment_status = 'COMPLETED' AND created_at >= $start \
                 ORDER BY created_at",
            )
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Completed orders containing at least one line for `event_id`
    pub async fn completed_orders_for_event(&self, event_id: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order \
                 WHERE payment_status = 'COMPLETED' AND items.event_id CONTAINS $eid \
                 ORDER BY created_at",
            )
            .bind(("eid", event_id))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Row count of a table, for the admin dashboard
    pub async fn count_table(&self, table: &str) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(format!("SELECT count() FROM {table} GROUP ALL"))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}
