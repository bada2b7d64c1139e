//! Order repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, PaymentStatus};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, order_id: i64) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self
            .base
            .db()
            .select(RecordId::from_table_key(TABLE, order_id))
            .await?;
        Ok(order)
    }

    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self
            .base
            .db()
            .create(RecordId::from_table_key(TABLE, order.order_id))
            .content(order)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn set_payment_status(
        &self,
        order_id: i64,
        status: PaymentStatus,
        completed_at: Option<i64>,
    ) -> RepoResult<Order> {
        self.base
            .db()
            .query("UPDATE $thing SET payment_status = $status, completed_at = $completed_at")
            .bind(("thing", RecordId::from_table_key(TABLE, order_id)))
            .bind(("status", status))
            .bind(("completed_at", completed_at))
            .await?;

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("order {} not found", order_id)))
    }

    pub async fn list_by_account(&self, account_id: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE account_id = $aid ORDER BY created_at DESC")
            .bind(("aid", account_id))
            .await?
            .take(0)?;
        Ok(orders)
    }
}
