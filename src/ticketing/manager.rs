//! Order and ticket issuance
//!
//! [`IssuanceManager`] turns a cart into an order, and on payment
//! confirmation decrements ticket-type availability and materializes one
//! ticket per purchased unit.
//!
//! The store is embedded and single-process, so per-event async locks are
//! the concurrency safeguard: confirmation re-verifies availability, then
//! decrements and issues while holding the lock of every event in the
//! order (acquired in ascending id order). Either every ticket for the
//! order is issued, or none are.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::db::models::{
    Event, Order, OrderCreate, OrderItem, OrderItemInput, PaymentStatus, Ticket,
};
use crate::db::repository::{EventRepository, OrderRepository, TicketRepository};
use crate::db::sequence::{SequenceService, sequences};
use crate::ticketing::money;
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

/// Requested units per (event_id, ticket_type_id), summed across lines
fn requested_quantities(items: &[OrderItemInput]) -> BTreeMap<(i64, i64), i64> {
    let mut wanted: BTreeMap<(i64, i64), i64> = BTreeMap::new();
    for item in items {
        *wanted.entry((item.event_id, item.ticket_type_id)).or_insert(0) += item.quantity;
    }
    wanted
}

/// Checkout and issuance workflows
pub struct IssuanceManager {
    db: Surreal<Db>,
    events: EventRepository,
    orders: OrderRepository,
    tickets: TicketRepository,
    sequences: SequenceService,
    /// Per-event issuance locks
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl IssuanceManager {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            events: EventRepository::new(db.clone()),
            orders: OrderRepository::new(db.clone()),
            tickets: TicketRepository::new(db.clone()),
            sequences: SequenceService::new(db.clone()),
            db,
            locks: DashMap::new(),
        }
    }

    pub fn db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    fn event_lock(&self, event_id: i64) -> Arc<Mutex<()>> {
        self.locks.entry(event_id).or_default().clone()
    }

    /// Acquire the issuance locks for all events of an order, in ascending
    /// id order so concurrent multi-event checkouts cannot deadlock.
    async fn lock_events(&self, event_ids: &[i64]) -> Vec<OwnedMutexGuard<()>> {
        let mut guards = Vec::with_capacity(event_ids.len());
        for &event_id in event_ids {
            let lock = self.event_lock(event_id);
            guards.push(lock.lock_owned().await);
        }
        guards
    }

    /// Convert a cart into a PENDING order with a server-computed total.
    ///
    /// Availability is checked here for early feedback, but the binding
    /// check happens again at payment confirmation.
    pub async fn create_order(&self, account_id: i64, input: OrderCreate) -> AppResult<Order> {
        if input.items.is_empty() {
            return Err(AppError::validation("order must contain at least one item"));
        }

        let now = now_millis();
        let mut items: Vec<OrderItem> = Vec::with_capacity(input.items.len());

        for line in &input.items {
            money::validate_quantity(line.quantity)?;
            crate::utils::validation::validate_required_text(
                &line.attendee.name,
                "attendee name",
                crate::utils::validation::MAX_NAME_LEN,
            )?;
            crate::utils::validation::validate_required_text(
                &line.attendee.email,
                "attendee email",
                crate::utils::validation::MAX_EMAIL_LEN,
            )?;

            let event = self
                .events
                .find_by_id(line.event_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("event {} not found", line.event_id)))?;

            if !event.status.is_public() {
                return Err(AppError::business_rule(format!(
                    "event '{}' is not on sale ({})",
                    event.title,
                    event.status.as_str()
                )));
            }
            if now < event.sale_starts_at || now > event.sale_ends_at {
                return Err(AppError::business_rule(format!(
                    "ticket sales for '{}' are closed",
                    event.title
                )));
            }

            let (category, ticket_type) = event.ticket_type(line.ticket_type_id).ok_or_else(|| {
                AppError::not_found(format!(
                    "ticket type {} not found on event {}",
                    line.ticket_type_id, line.event_id
                ))
            })?;

            if line.quantity > ticket_type.max_per_order {
                return Err(AppError::business_rule(format!(
                    "at most {} '{}' tickets per order",
                    ticket_type.max_per_order, ticket_type.name
                )));
            }
            if line.quantity > ticket_type.quantity_available {
                return Err(AppError::business_rule(format!(
                    "only {} '{}' tickets remaining",
                    ticket_type.quantity_available, ticket_type.name
                )));
            }

            let unit_price = ticket_type.price;
            items.push(OrderItem {
                event: RecordId::from_table_key("event", event.event_id),
                event_id: event.event_id,
                event_title: event.title.clone(),
                ticket_type_id: ticket_type.ticket_type_id,
                ticket_type_name: ticket_type.name.clone(),
                category_name: category.name.clone(),
                quantity: line.quantity,
                unit_price,
                line_total: money::line_total(unit_price, line.quantity),
                attendee: line.attendee.clone(),
            });
        }

        let order_id = self.sequences.next_value(sequences::ORDERS).await?;
        let order = Order {
            id: None,
            order_id,
            account: RecordId::from_table_key("account", account_id),
            account_id,
            total_amount: money::order_total(&items),
            items,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            completed_at: None,
        };

        let created = self.orders.create(order).await?;
        tracing::info!(
            order_id = created.order_id,
            account_id,
            total = %created.total_amount,
            "order created"
        );
        Ok(created)
    }

    /// Confirm payment of a pending order: re-verify inventory, decrement
    /// availability, and materialize one ticket per unit.
    ///
    /// `account_id` restricts confirmation to the purchasing account; pass
    /// None for trusted callers (the payment collaborator's webhook path).
    pub async fn confirm_payment(
        &self,
        order_id: i64,
        account_id: Option<i64>,
    ) -> AppResult<(Order, Vec<Ticket>)> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("order {} not found", order_id)))?;

        if let Some(account_id) = account_id
            && order.account_id != account_id
        {
            return Err(AppError::forbidden("order belongs to another account"));
        }

        match order.payment_status {
            PaymentStatus::Pending => {}
            PaymentStatus::Completed => {
                return Err(AppError::conflict(format!(
                    "payment for order {} is already completed",
                    order_id
                )));
            }
            other => {
                return Err(AppError::conflict(format!(
                    "order {} payment is {}, cannot complete",
                    order_id,
                    other.as_str()
                )));
            }
        }

        let wanted = requested_quantities(
            &order
                .items
                .iter()
                .map(|i| OrderItemInput {
                    event_id: i.event_id,
                    ticket_type_id: i.ticket_type_id,
                    quantity: i.quantity,
                    attendee: i.attendee.clone(),
                })
                .collect::<Vec<_>>(),
        );
        let event_ids: Vec<i64> = {
            let mut ids: Vec<i64> = wanted.keys().map(|(event_id, _)| *event_id).collect();
            ids.dedup();
            ids
        };

        // Everything from re-verification to ticket creation happens under
        // the per-event locks; concurrent confirmations against the same
        // inventory serialize here.
        let _guards = self.lock_events(&event_ids).await;

        // Re-check the order under the lock: a concurrent confirmation of
        // the same order may have won while we waited.
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("order {} not found", order_id)))?;
        if order.payment_status != PaymentStatus::Pending {
            return Err(AppError::conflict(format!(
                "payment for order {} is already {}",
                order_id,
                order.payment_status.as_str()
            )));
        }

        let mut events: BTreeMap<i64, Event> = BTreeMap::new();
        for &event_id in &event_ids {
            let event = self
                .events
                .find_by_id(event_id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("event {} not found", event_id)))?;
            events.insert(event_id, event);
        }

        // Binding availability check at confirmation time
        for (&(event_id, ticket_type_id), &quantity) in &wanted {
            let event = events
                .get(&event_id)
                .ok_or_else(|| AppError::internal("event map out of sync"))?;
            let (_, ticket_type) = event.ticket_type(ticket_type_id).ok_or_else(|| {
                AppError::not_found(format!(
                    "ticket type {} not found on event {}",
                    ticket_type_id, event_id
                ))
            })?;

            if quantity > ticket_type.quantity_available {
                self.orders
                    .set_payment_status(order_id, PaymentStatus::Failed, None)
                    .await?;
                return Err(AppError::business_rule(format!(
                    "inventory exceeded: {} '{}' tickets requested, {} remaining",
                    quantity, ticket_type.name, ticket_type.quantity_available
                )));
            }
        }

        // Decrement and persist. Originals are kept for compensation if a
        // later write fails, so a half-issued order never survives.
        let originals: Vec<Event> = events.values().cloned().collect();
        for (&(event_id, ticket_type_id), &quantity) in &wanted {
            let event = events
                .get_mut(&event_id)
                .ok_or_else(|| AppError::internal("event map out of sync"))?;
            let ticket_type = event
                .ticket_type_mut(ticket_type_id)
                .ok_or_else(|| AppError::internal("ticket type disappeared"))?;
            ticket_type.quantity_available -= quantity;
        }
        for event in events.values() {
            self.events.save(event).await?;
        }

        match self.issue_tickets(&order).await {
            Ok(tickets) => {
                let now = now_millis();
                let completed = self
                    .orders
                    .set_payment_status(order_id, PaymentStatus::Completed, Some(now))
                    .await?;
                tracing::info!(
                    order_id,
                    tickets = tickets.len(),
                    total = %completed.total_amount,
                    "payment completed, tickets issued"
                );
                Ok((completed, tickets))
            }
            Err(e) => {
                // Roll availability back and fail the order
                for event in &originals {
                    if let Err(restore_err) = self.events.save(event).await {
                        tracing::error!(
                            event_id = event.event_id,
                            error = %restore_err,
                            "failed to restore inventory after issuance error"
                        );
                    }
                }
                self.orders
                    .set_payment_status(order_id, PaymentStatus::Failed, None)
                    .await?;
                Err(e)
            }
        }
    }

    /// Mark a pending order's payment as failed
    pub async fn fail_payment(&self, order_id: i64, account_id: Option<i64>) -> AppResult<Order> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("order {} not found", order_id)))?;

        if let Some(account_id) = account_id
            && order.account_id != account_id
        {
            return Err(AppError::forbidden("order belongs to another account"));
        }

        if order.payment_status != PaymentStatus::Pending {
            return Err(AppError::conflict(format!(
                "order {} payment is {}, cannot fail",
                order_id,
                order.payment_status.as_str()
            )));
        }

        Ok(self
            .orders
            .set_payment_status(order_id, PaymentStatus::Failed, None)
            .await?)
    }

    /// Materialize one ticket per purchased unit, each with a fresh pass id
    /// and QR payload. Cleans up already-created tickets on failure.
    async fn issue_tickets(&self, order: &Order) -> AppResult<Vec<Ticket>> {
        let now = now_millis();
        let mut issued: Vec<Ticket> = Vec::new();

        for item in &order.items {
            for _ in 0..item.quantity {
                let result = self.issue_one(order, item, now).await;
                match result {
                    Ok(ticket) => issued.push(ticket),
                    Err(e) => {
                        for ticket in &issued {
                            let _ = self
                                .db
                                .delete::<Option<Ticket>>(RecordId::from_table_key(
                                    "ticket",
                                    ticket.ticket_id,
                                ))
                                .await;
                        }
                        return Err(e);
                    }
                }
            }
        }

        Ok(issued)
    }

    async fn issue_one(&self, order: &Order, item: &OrderItem, now: i64) -> AppResult<Ticket> {
        let ticket_id = self.sequences.next_value(sequences::TICKETS).await?;
        let pass_id = format!("GP-{}", Uuid::new_v4().simple());
        let qr_code = format!("GATEPASS|{}|{}", item.event_id, pass_id);

        let ticket = Ticket {
            id: None,
            ticket_id,
            order: RecordId::from_table_key("order", order.order_id),
            order_id: order.order_id,
            event: item.event.clone(),
            event_id: item.event_id,
            ticket_type_id: item.ticket_type_id,
            ticket_type_name: item.ticket_type_name.clone(),
            pass_id,
            qr_code,
            is_validated: false,
            validation_time: None,
            attendee_name: item.attendee.name.clone(),
            attendee_email: item.attendee.email.clone(),
            attendee_phone: item.attendee.phone.clone(),
            document: None,
            created_at: now,
        };

        Ok(self.tickets.create(ticket).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::AttendeeInfo;

    fn line(event_id: i64, ticket_type_id: i64, quantity: i64) -> OrderItemInput {
        OrderItemInput {
            event_id,
            ticket_type_id,
            quantity,
            attendee: AttendeeInfo {
                name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
                phone: None,
            },
        }
    }

    #[test]
    fn test_requested_quantities_sums_duplicate_lines() {
        let wanted = requested_quantities(&[line(1, 10, 2), line(1, 10, 3), line(2, 20, 1)]);
        assert_eq!(wanted.get(&(1, 10)), Some(&5));
        assert_eq!(wanted.get(&(2, 20)), Some(&1));
        assert_eq!(wanted.len(), 2);
    }

    #[test]
    fn test_requested_quantities_orders_event_ids() {
        let wanted = requested_quantities(&[line(9, 1, 1), line(3, 1, 1), line(7, 2, 1)]);
        let ids: Vec<i64> = wanted.keys().map(|(event_id, _)| *event_id).collect();
        assert_eq!(ids, vec![3, 7, 9]);
    }
}
