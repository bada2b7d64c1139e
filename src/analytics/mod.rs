//! Sales aggregation
//!
//! On-demand rollups over completed orders' line items; nothing here is
//! materialized. Callers fetch the relevant orders (see
//! `db::repository::report`) and aggregate with exact decimal arithmetic;
//! values are rounded to 2 decimal places only where an average or
//! percentage is produced for output.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::db::models::Order;
use crate::ticketing::money::round_money;
use crate::utils::time::{month_key, trailing_month_keys};

/// Per-event sales rollup
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventSales {
    pub tickets_sold: i64,
    pub revenue: Decimal,
    /// Distinct completed orders containing the event
    pub order_count: i64,
}

/// Per-ticket-type rollup within one event
#[derive(Debug, Clone, Serialize)]
pub struct TicketTypeSales {
    pub ticket_type_id: i64,
    pub name: String,
    pub tickets_sold: i64,
    pub revenue: Decimal,
}

/// Revenue grouped by genre name
#[derive(Debug, Clone, Serialize)]
pub struct GenreRevenue {
    pub genre: String,
    pub revenue: Decimal,
    pub tickets_sold: i64,
}

/// One month of the trailing aggregation window
#[derive(Debug, Clone, Serialize)]
pub struct MonthBucket {
    /// "YYYY-MM"
    pub month: String,
    pub revenue: Decimal,
    pub tickets_sold: i64,
    pub order_count: i64,
}

/// Organizer-level totals derived from per-event rollups
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerSummary {
    pub total_revenue: Decimal,
    pub total_tickets: i64,
    pub order_count: i64,
    /// 0 when no tickets have been sold
    pub average_revenue_per_ticket: Decimal,
    /// Event id of the top seller by revenue
    pub top_event_id: Option<i64>,
}

/// Roll completed orders up per event
pub fn aggregate_by_event(orders: &[Order]) -> BTreeMap<i64, EventSales> {
    let mut by_event: BTreeMap<i64, EventSales> = BTreeMap::new();

    for order in orders {
        let mut seen_events: Vec<i64> = Vec::new();
        for item in &order.items {
            let entry = by_event.entry(item.event_id).or_default();
            entry.tickets_sold += item.quantity;
            entry.revenue += item.line_total;
            if !seen_events.contains(&item.event_id) {
                entry.order_count += 1;
                seen_events.push(item.event_id);
            }
        }
    }

    by_event
}

/// Rollup for a single event
pub fn sales_for_event(orders: &[Order], event_id: i64) -> EventSales {
    aggregate_by_event(orders).remove(&event_id).unwrap_or_default()
}

/// Per-ticket-type breakdown for one event
pub fn ticket_type_breakdown(orders: &[Order], event_id: i64) -> Vec<TicketTypeSales> {
    let mut by_type: BTreeMap<i64, TicketTypeSales> = BTreeMap::new();

    for order in orders {
        for item in &order.items {
            if item.event_id != event_id {
                continue;
            }
            let entry = by_type
                .entry(item.ticket_type_id)
                .or_insert_with(|| TicketTypeSales {
                    ticket_type_id: item.ticket_type_id,
                    name: item.ticket_type_name.clone(),
                    tickets_sold: 0,
                    revenue: Decimal::ZERO,
                });
            entry.tickets_sold += item.quantity;
            entry.revenue += item.line_total;
        }
    }

    by_type.into_values().collect()
}

/// Revenue grouped by each event's genre.
///
/// `event_genres` maps event id to genre name; events without a genre fall
/// into "Uncategorized".
pub fn aggregate_by_genre(
    orders: &[Order],
    event_genres: &HashMap<i64, String>,
) -> Vec<GenreRevenue> {
    let mut by_genre: BTreeMap<String, GenreRevenue> = BTreeMap::new();

    for order in orders {
        for item in &order.items {
            let genre = event_genres
                .get(&item.event_id)
                .cloned()
                .unwrap_or_else(|| "Uncategorized".to_string());
            let entry = by_genre
                .entry(genre.clone())
                .or_insert_with(|| GenreRevenue {
                    genre,
                    revenue: Decimal::ZERO,
                    tickets_sold: 0,
                });
            entry.revenue += item.line_total;
            entry.tickets_sold += item.quantity;
        }
    }

    let mut out: Vec<GenreRevenue> = by_genre.into_values().collect();
    out.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    out
}

/// Bucket completed orders by creation month over the trailing window.
///
/// Every month of the window is present in the output even when zero,
/// oldest first. Orders outside the window are ignored.
pub fn monthly_buckets(orders: &[Order], now: DateTime<Utc>, months: u32) -> Vec<MonthBucket> {
    let keys = trailing_month_keys(now, months);
    let mut buckets: BTreeMap<String, MonthBucket> = keys
        .iter()
        .map(|k| {
            (
                k.clone(),
                MonthBucket {
                    month: k.clone(),
                    revenue: Decimal::ZERO,
                    tickets_sold: 0,
                    order_count: 0,
                },
            )
        })
        .collect();

    for order in orders {
        let key = month_key(order.created_at);
        if let Some(bucket) = buckets.get_mut(&key) {
            bucket.revenue += order.total_amount;
            bucket.tickets_sold += order.items.iter().map(|i| i.quantity).sum::<i64>();
            bucket.order_count += 1;
        }
    }

    keys.into_iter()
        .filter_map(|k| buckets.remove(&k))
        .collect()
}

/// Organizer totals from per-event rollups
pub fn organizer_summary(by_event: &BTreeMap<i64, EventSales>) -> OrganizerSummary {
    let total_revenue: Decimal = by_event.values().map(|s| s.revenue).sum();
    let total_tickets: i64 = by_event.values().map(|s| s.tickets_sold).sum();
    let order_count: i64 = by_event.values().map(|s| s.order_count).sum();

    let average_revenue_per_ticket = if total_tickets > 0 {
        round_money(total_revenue / Decimal::from(total_tickets))
    } else {
        Decimal::ZERO
    };

    let top_event_id = by_event
        .iter()
        .max_by(|a, b| a.1.revenue.cmp(&b.1.revenue))
        .map(|(event_id, _)| *event_id);

    OrganizerSummary {
        total_revenue,
        total_tickets,
        order_count,
        average_revenue_per_ticket,
        top_event_id,
    }
}

/// Restrict orders to line items of the given events, recomputing each
/// order's total from the kept lines. Orders left with no items are
/// dropped.
///
/// Used for organizer-scoped rollups: an order may mix events owned by
/// different organizers, and only the owned lines may count.
pub fn filter_orders_to_events(
    orders: &[Order],
    event_ids: &std::collections::HashSet<i64>,
) -> Vec<Order> {
    orders
        .iter()
        .filter_map(|order| {
            let items: Vec<_> = order
                .items
                .iter()
                .filter(|i| event_ids.contains(&i.event_id))
                .cloned()
                .collect();
            if items.is_empty() {
                return None;
            }
            let total_amount = items.iter().map(|i| i.line_total).sum();
            Some(Order {
                items,
                total_amount,
                ..order.clone()
            })
        })
        .collect()
}

/// Percentage change between two periods, rounded to 2 decimal places.
///
/// Defined as 0 when both are zero and 100 when growing from zero.
pub fn change_percentage(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        if current.is_zero() {
            Decimal::ZERO
        } else {
            Decimal::ONE_HUNDRED
        }
    } else {
        round_money((current - previous) / previous * Decimal::ONE_HUNDRED)
    }
}

/// Tickets sold as a percentage of capacity, rounded to 2 decimal places.
///
/// 0 when capacity is 0.
pub fn sold_percentage(sold: i64, capacity: i64) -> Decimal {
    if capacity <= 0 {
        Decimal::ZERO
    } else {
        round_money(Decimal::from(sold) / Decimal::from(capacity) * Decimal::ONE_HUNDRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{AttendeeInfo, OrderItem, PaymentStatus};
    use crate::ticketing::money::line_total;
    use chrono::TimeZone;
    use surrealdb::RecordId;

    fn item(event_id: i64, ticket_type_id: i64, unit_price: &str, quantity: i64) -> OrderItem {
        let price: Decimal = unit_price.parse().expect("test price");
        OrderItem {
            event: RecordId::from_table_key("event", event_id),
            event_id,
            event_title: format!("Event {event_id}"),
            ticket_type_id,
            ticket_type_name: format!("Type {ticket_type_id}"),
            category_name: "Standard".to_string(),
            quantity,
            unit_price: price,
            line_total: line_total(price, quantity),
            attendee: AttendeeInfo {
                name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
                phone: None,
            },
        }
    }

    fn order(order_id: i64, created_at: i64, items: Vec<OrderItem>) -> Order {
        let total_amount = items.iter().map(|i| i.line_total).sum();
        Order {
            id: None,
            order_id,
            account: RecordId::from_table_key("account", 1),
            account_id: 1,
            items,
            total_amount,
            payment_status: PaymentStatus::Completed,
            created_at,
            completed_at: Some(created_at),
        }
    }

    #[test]
    fn test_change_percentage_edge_cases() {
        let d = |s: &str| s.parse::<Decimal>().expect("decimal");
        assert_eq!(change_percentage(d("0"), d("0")), d("0"));
        assert_eq!(change_percentage(d("5"), d("0")), d("100"));
        assert_eq!(change_percentage(d("0"), d("5")), d("-100"));
        assert_eq!(change_percentage(d("15"), d("10")), d("50.00"));
    }

    #[test]
    fn test_revenue_identity_between_event_and_order_totals() {
        // Sum of per-event revenue must equal both the item-level sum and
        // the order-level total_amount sum.
        let orders = vec![
            order(1, 1000, vec![item(1, 10, "100.00", 2), item(2, 20, "49.95", 1)]),
            order(2, 2000, vec![item(1, 10, "100.00", 1)]),
            order(3, 3000, vec![item(2, 21, "0.01", 300)]),
        ];

        let by_event = aggregate_by_event(&orders);
        let per_event_sum: Decimal = by_event.values().map(|s| s.revenue).sum();

        let item_sum: Decimal = orders
            .iter()
            .flat_map(|o| o.items.iter())
            .map(|i| i.line_total)
            .sum();
        let order_sum: Decimal = orders.iter().map(|o| o.total_amount).sum();

        assert_eq!(per_event_sum, item_sum);
        assert_eq!(per_event_sum, order_sum);
        assert_eq!(per_event_sum.to_string(), "352.95");
    }

    #[test]
    fn test_aggregate_by_event_counts_distinct_orders() {
        let orders = vec![
            // Two lines of the same event in one order: one distinct order
            order(1, 1000, vec![item(1, 10, "10", 1), item(1, 11, "20", 1)]),
            order(2, 2000, vec![item(1, 10, "10", 2)]),
        ];

        let by_event = aggregate_by_event(&orders);
        let sales = by_event.get(&1).expect("event 1 present");
        assert_eq!(sales.order_count, 2);
        assert_eq!(sales.tickets_sold, 4);
        assert_eq!(sales.revenue.to_string(), "50");
    }

    #[test]
    fn test_ticket_type_breakdown_filters_event() {
        let orders = vec![order(
            1,
            1000,
            vec![
                item(1, 10, "10", 2),
                item(1, 11, "5", 1),
                item(2, 30, "99", 4),
            ],
        )];

        let breakdown = ticket_type_breakdown(&orders, 1);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].ticket_type_id, 10);
        assert_eq!(breakdown[0].tickets_sold, 2);
        assert_eq!(breakdown[1].revenue.to_string(), "5");
    }

    #[test]
    fn test_genre_rollup_with_uncategorized_fallback() {
        let mut genres = HashMap::new();
        genres.insert(1, "Rock".to_string());

        let orders = vec![order(
            1,
            1000,
            vec![item(1, 10, "10", 1), item(2, 20, "30", 1)],
        )];

        let rollup = aggregate_by_genre(&orders, &genres);
        assert_eq!(rollup.len(), 2);
        // Sorted by revenue descending
        assert_eq!(rollup[0].genre, "Uncategorized");
        assert_eq!(rollup[0].revenue.to_string(), "30");
        assert_eq!(rollup[1].genre, "Rock");
    }

    #[test]
    fn test_monthly_buckets_zero_fill() {
        let now = Utc.with_ymd_and_hms(2026, 4, 20, 12, 0, 0).unwrap();
        let march = Utc
            .with_ymd_and_hms(2026, 3, 5, 9, 0, 0)
            .unwrap()
            .timestamp_millis();

        let orders = vec![order(1, march, vec![item(1, 10, "25.50", 2)])];
        let buckets = monthly_buckets(&orders, now, 6);

        assert_eq!(buckets.len(), 6);
        assert_eq!(buckets[0].month, "2025-11");
        assert_eq!(buckets[5].month, "2026-04");

        let march_bucket = buckets.iter().find(|b| b.month == "2026-03").expect("march");
        assert_eq!(march_bucket.revenue.to_string(), "51.00");
        assert_eq!(march_bucket.tickets_sold, 2);
        assert_eq!(march_bucket.order_count, 1);

        // Every other month present and zero
        let zeroes = buckets.iter().filter(|b| b.revenue.is_zero()).count();
        assert_eq!(zeroes, 5);
    }

    #[test]
    fn test_monthly_buckets_ignores_orders_outside_window() {
        let now = Utc.with_ymd_and_hms(2026, 4, 20, 12, 0, 0).unwrap();
        let ancient = Utc
            .with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
            .unwrap()
            .timestamp_millis();

        let orders = vec![order(1, ancient, vec![item(1, 10, "25.50", 2)])];
        let buckets = monthly_buckets(&orders, now, 6);
        assert!(buckets.iter().all(|b| b.revenue.is_zero()));
    }

    #[test]
    fn test_organizer_summary_average_and_top_event() {
        let orders = vec![
            order(1, 1000, vec![item(1, 10, "100.00", 2)]),
            order(2, 2000, vec![item(2, 20, "50.00", 1)]),
        ];
        let by_event = aggregate_by_event(&orders);
        let summary = organizer_summary(&by_event);

        assert_eq!(summary.total_revenue.to_string(), "250.00");
        assert_eq!(summary.total_tickets, 3);
        assert_eq!(summary.average_revenue_per_ticket.to_string(), "83.33");
        assert_eq!(summary.top_event_id, Some(1));
    }

    #[test]
    fn test_organizer_summary_zero_tickets() {
        let by_event = BTreeMap::new();
        let summary = organizer_summary(&by_event);
        assert_eq!(summary.average_revenue_per_ticket, Decimal::ZERO);
        assert_eq!(summary.top_event_id, None);
    }

    #[test]
    fn test_filter_orders_to_events_recomputes_totals() {
        use std::collections::HashSet;

        let orders = vec![
            order(1, 1000, vec![item(1, 10, "10", 1), item(2, 20, "90", 1)]),
            order(2, 2000, vec![item(2, 20, "90", 2)]),
        ];
        let owned: HashSet<i64> = [1].into_iter().collect();

        let filtered = filter_orders_to_events(&orders, &owned);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].items.len(), 1);
        assert_eq!(filtered[0].total_amount.to_string(), "10");
    }

    #[test]
    fn test_sold_percentage() {
        let d = |s: &str| s.parse::<Decimal>().expect("decimal");
        assert_eq!(sold_percentage(0, 0), Decimal::ZERO);
        assert_eq!(sold_percentage(5, 0), Decimal::ZERO);
        assert_eq!(sold_percentage(1, 2), d("50.00"));
        assert_eq!(sold_percentage(2, 2), d("100.00"));
        assert_eq!(sold_percentage(1, 3), d("33.33"));
    }
}
