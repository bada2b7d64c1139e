//! Order handlers
//!
//! Checkout and payment confirmation delegate to the issuance manager;
//! reads are scoped to the purchasing account.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, Ticket};
use crate::db::repository::{OrderRepository, TicketRepository};
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// POST /api/orders - turn a cart into a pending order
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    user.require_user()?;
    let order = state.issuance.create_order(user.account_id, payload).await?;
    Ok(ok_with_message(order, "Order created"))
}

/// GET /api/orders - the account's orders
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = OrderRepository::new(state.db.clone())
        .list_by_account(user.account_id)
        .await?;
    Ok(ok(orders))
}

/// Order with its issued tickets
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub tickets: Vec<Ticket>,
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(order_id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let order = OrderRepository::new(state.db.clone())
        .find_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("order {order_id} not found")))?;

    if order.account_id != user.account_id && !user.is_admin() {
        return Err(AppError::forbidden("order belongs to another account"));
    }

    let tickets = TicketRepository::new(state.db.clone())
        .list_by_order(order_id)
        .await?;

    Ok(ok(OrderDetail { order, tickets }))
}

/// Payment outcome: the completed order and its materialized tickets
#[derive(Debug, Serialize)]
pub struct PaymentResult {
    #[serde(flatten)]
    pub order: Order,
    pub tickets: Vec<Ticket>,
}

/// POST /api/orders/{id}/payment/complete
///
/// Called when the external payment collaborator reports success.
/// Re-verifies inventory and materializes tickets atomically.
pub async fn complete_payment(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(order_id): Path<i64>,
) -> AppResult<Json<AppResponse<PaymentResult>>> {
    let (order, tickets) = state
        .issuance
        .confirm_payment(order_id, Some(user.account_id))
        .await?;
    Ok(ok_with_message(
        PaymentResult { order, tickets },
        "Payment completed, tickets issued",
    ))
}

/// POST /api/orders/{id}/payment/fail
pub async fn fail_payment(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(order_id): Path<i64>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state
        .issuance
        .fail_payment(order_id, Some(user.account_id))
        .await?;
    Ok(ok_with_message(order, "Payment marked failed"))
}

/// GET /api/orders/tickets - every ticket the account has purchased
pub async fn my_tickets(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<AppResponse<Vec<Ticket>>>> {
    let orders = OrderRepository::new(state.db.clone())
        .list_by_account(user.account_id)
        .await?;
    let tickets_repo = TicketRepository::new(state.db.clone());

    let mut tickets = Vec::new();
    for order in orders {
        tickets.extend(tickets_repo.list_by_order(order.order_id).await?);
    }
    Ok(ok(tickets))
}
