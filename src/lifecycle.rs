//! Order lifecycle manager.
//!
//! Stateless functions over plain [`Order`] values. Callers decide which order is
//! being worked on and pass it in; nothing here remembers a selection between calls.
//! Every mutating operation validates first and writes second, so a rejected call
//! leaves the order untouched.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use std::str::FromStr;
use tracing::info;

use crate::domain::aggregates::{LifecycleError, Order, OrderStatus};

/// Moves `order` to the status named by `new_status`.
///
/// Moving to `completed` also marks the order paid.
pub fn transition_status<'a>(order: &'a mut Order, new_status: &str) -> Result<&'a Order, LifecycleError> {
    let to = OrderStatus::from_str(new_status)?;
    let from = order.status();
    order.transition_to(to)?;
    info!(order_id = order.id(), %from, %to, "order status updated");
    Ok(&*order)
}

pub fn cancel_order<'a>(order: &'a mut Order, reason: &str) -> Result<&'a Order, LifecycleError> {
    cancel_order_at(order, reason, Utc::now())
}

/// [`cancel_order`] with an explicit cancellation time.
pub fn cancel_order_at<'a>(order: &'a mut Order, reason: &str, at: DateTime<Utc>) -> Result<&'a Order, LifecycleError> {
    order.cancel(reason, at)?;
    info!(order_id = order.id(), reason = order.cancel_reason().unwrap_or_default(), "order cancelled");
    Ok(&*order)
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderStatistics {
    pub pending: usize,
    pub preparing: usize,
    pub ready: usize,
    /// Completed orders placed on the current local calendar day.
    pub completed_today: usize,
}

pub fn compute_statistics(orders: &[Order]) -> OrderStatistics {
    compute_statistics_on(orders, Local::now().date_naive(), &Local)
}

/// Counts against an explicit `today`, with order times converted into `tz` before
/// their calendar day is taken.
pub fn compute_statistics_on<Tz: TimeZone>(orders: &[Order], today: NaiveDate, tz: &Tz) -> OrderStatistics {
    orders.iter().fold(OrderStatistics::default(), |mut stats, order| {
        match order.status() {
            OrderStatus::Pending => stats.pending += 1,
            OrderStatus::Preparing => stats.preparing += 1,
            OrderStatus::Ready => stats.ready += 1,
            OrderStatus::Completed if order.order_time().with_timezone(tz).date_naive() == today => {
                stats.completed_today += 1
            }
            OrderStatus::Completed | OrderStatus::Cancelled => {}
        }
        stats
    })
}

/// Status filter with an explicit "show everything" value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl FromStr for StatusFilter {
    type Err = LifecycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Orders whose id, customer name or student id contains `term`, ignoring case.
/// An empty term matches everything.
pub fn search_orders<'a, I>(orders: I, term: &str) -> Vec<&'a Order>
where
    I: IntoIterator<Item = &'a Order>,
{
    let needle = term.to_lowercase();
    orders.into_iter().filter(|o| o.matches_lowercase(&needle)).collect()
}

pub fn filter_by_status<'a, I>(orders: I, filter: StatusFilter) -> Vec<&'a Order>
where
    I: IntoIterator<Item = &'a Order>,
{
    match filter {
        StatusFilter::All => orders.into_iter().collect(),
        StatusFilter::Only(status) => orders.into_iter().filter(|o| o.status() == status).collect(),
    }
}

/// Newest first. Orders placed at the same instant keep their input order.
pub fn sort_by_recency<'a, I>(orders: I) -> Vec<&'a Order>
where
    I: IntoIterator<Item = &'a Order>,
{
    let mut sorted: Vec<&Order> = orders.into_iter().collect();
    sorted.sort_by(|a, b| b.order_time().cmp(&a.order_time()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Customer, LineItem, PaymentMethod, PaymentStatus};
    use crate::domain::value_objects::{Price, Quantity};
    use chrono::{Duration, FixedOffset};
    use rust_decimal::Decimal;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, h, m, 0).unwrap()
    }

    fn order(id: &str, name: &str, student_id: &str, time: DateTime<Utc>) -> Order {
        let items = vec![LineItem::new("Cheese Pizza", Quantity::new(1).unwrap(), Price::new(Decimal::new(450, 0)).unwrap())];
        let customer = Customer { name: name.into(), student_id: student_id.into(), ..Default::default() };
        Order::new(id, customer, items, PaymentMethod::Online, time)
    }

    fn with_status(mut o: Order, status: OrderStatus) -> Order {
        if status == OrderStatus::Cancelled {
            o.cancel("test", o.order_time()).unwrap();
        } else if status != OrderStatus::Pending {
            o.transition_to(status).unwrap();
        }
        o
    }

    #[test]
    fn test_terminal_orders_are_frozen() {
        for terminal in [OrderStatus::Completed, OrderStatus::Cancelled] {
            let mut o = with_status(order("ORD-1", "Ali Hassan", "STU001", at(9, 0)), terminal);
            let before = o.clone();
            for target in ["pending", "preparing", "ready", "completed"] {
                assert!(matches!(transition_status(&mut o, target), Err(LifecycleError::InvalidTransition { .. })));
            }
            assert_eq!(cancel_order(&mut o, "Changed mind").unwrap_err(), LifecycleError::AlreadyTerminal(terminal));
            assert_eq!(o, before);
        }
    }

    #[test]
    fn test_completing_marks_paid() {
        let mut o = order("ORD-1", "Ali Hassan", "STU001", at(9, 0));
        assert_eq!(o.payment_status(), PaymentStatus::Pending);
        let updated = transition_status(&mut o, "completed").unwrap();
        assert_eq!(updated.status(), OrderStatus::Completed);
        assert_eq!(updated.payment_status(), PaymentStatus::Paid);
    }

    #[test]
    fn test_skipping_states_allowed() {
        let mut o = order("ORD-1", "Ali Hassan", "STU001", at(9, 0));
        transition_status(&mut o, "ready").unwrap();
        transition_status(&mut o, "pending").unwrap();
        assert_eq!(o.status(), OrderStatus::Pending);
    }

    #[test]
    fn test_unknown_status() {
        let mut o = order("ORD-1", "Ali Hassan", "STU001", at(9, 0));
        let before = o.clone();
        assert_eq!(transition_status(&mut o, "shipped").unwrap_err(), LifecycleError::UnknownStatus("shipped".into()));
        assert_eq!(o, before);
    }

    #[test]
    fn test_blank_reason_rejected() {
        let mut o = with_status(order("ORD-1", "Ali Hassan", "STU001", at(9, 0)), OrderStatus::Preparing);
        let before = o.clone();
        assert_eq!(cancel_order(&mut o, "").unwrap_err(), LifecycleError::EmptyReason);
        assert_eq!(cancel_order(&mut o, "   ").unwrap_err(), LifecycleError::EmptyReason);
        assert_eq!(o, before);
    }

    #[test]
    fn test_cancel_then_cancel_again() {
        let mut o = with_status(order("ORD-1", "Ali Hassan", "STU001", at(9, 0)), OrderStatus::Preparing);
        let now = at(9, 30);
        let cancelled = cancel_order_at(&mut o, "Out of stock", now).unwrap();
        assert_eq!(cancelled.status(), OrderStatus::Cancelled);
        assert_eq!(cancelled.cancel_reason(), Some("Out of stock"));
        assert_eq!(cancelled.cancel_time(), Some(now));
        assert_eq!(cancel_order_at(&mut o, "Again", at(10, 0)).unwrap_err(), LifecycleError::AlreadyTerminal(OrderStatus::Cancelled));
        assert_eq!(o.cancel_time(), Some(now));
    }

    #[test]
    fn test_statistics_empty() {
        let today = at(12, 0).date_naive();
        assert_eq!(compute_statistics_on(&[], today, &Utc), OrderStatistics::default());
    }

    #[test]
    fn test_statistics_counts() {
        let today = at(12, 0).date_naive();
        let orders = vec![
            order("A", "a", "1", at(8, 0)),
            with_status(order("B", "b", "2", at(8, 0)), OrderStatus::Preparing),
            with_status(order("C", "c", "3", at(8, 0)), OrderStatus::Ready),
            with_status(order("D", "d", "4", at(8, 0)), OrderStatus::Completed),
            with_status(order("E", "e", "5", at(8, 0) - Duration::days(1)), OrderStatus::Completed),
            with_status(order("F", "f", "6", at(8, 0)), OrderStatus::Cancelled),
        ];
        let stats = compute_statistics_on(&orders, today, &Utc);
        assert_eq!(stats, OrderStatistics { pending: 1, preparing: 1, ready: 1, completed_today: 1 });
    }

    #[test]
    fn test_statistics_use_local_day_boundary() {
        // 23:30 UTC on the 10th is already the 11th at UTC+5.
        let orders = vec![with_status(order("A", "a", "1", at(23, 30)), OrderStatus::Completed)];
        let plus_five = FixedOffset::east_opt(5 * 3600).unwrap();
        let the_11th = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        assert_eq!(compute_statistics_on(&orders, the_11th, &plus_five).completed_today, 1);
        assert_eq!(compute_statistics_on(&orders, the_11th, &Utc).completed_today, 0);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let orders = vec![
            order("ORD-1", "Ali Hassan", "STU001", at(9, 0)),
            order("ORD-2", "Fatima Khan", "STU002", at(9, 5)),
            order("ORD-3", "Ahmed Malik", "stu-ali", at(9, 10)),
        ];
        let ids: Vec<&str> = search_orders(&orders, "ALI").into_iter().map(Order::id).collect();
        assert_eq!(ids, vec!["ORD-1", "ORD-3"]);
        assert_eq!(search_orders(&orders, "ord-2")[0].id(), "ORD-2");
        assert_eq!(search_orders(&orders, "").len(), 3);
        assert!(search_orders(&orders, "zzz").is_empty());
    }

    #[test]
    fn test_filter_by_status() {
        let orders = vec![
            order("A", "a", "1", at(9, 0)),
            with_status(order("B", "b", "2", at(9, 0)), OrderStatus::Ready),
            order("C", "c", "3", at(9, 0)),
        ];
        let pending: Vec<&str> = filter_by_status(&orders, StatusFilter::Only(OrderStatus::Pending)).into_iter().map(Order::id).collect();
        assert_eq!(pending, vec!["A", "C"]);
        assert_eq!(filter_by_status(&orders, "all".parse().unwrap()).len(), 3);
        assert!(filter_by_status(&orders, StatusFilter::Only(OrderStatus::Completed)).is_empty());
    }

    #[test]
    fn test_sort_by_recency_is_stable() {
        let orders = vec![
            order("T1", "a", "1", at(9, 0)),
            order("T3", "b", "2", at(11, 0)),
            order("T2a", "c", "3", at(10, 0)),
            order("T2b", "d", "4", at(10, 0)),
        ];
        let ids: Vec<&str> = sort_by_recency(&orders).into_iter().map(Order::id).collect();
        assert_eq!(ids, vec!["T3", "T2a", "T2b", "T1"]);
    }

    #[test]
    fn test_composes_filter_and_search() {
        let orders = vec![
            order("A", "Ali Hassan", "1", at(9, 0)),
            with_status(order("B", "Ali Raza", "2", at(9, 5)), OrderStatus::Ready),
        ];
        let ready = filter_by_status(&orders, StatusFilter::Only(OrderStatus::Ready));
        let hits = search_orders(ready, "ali");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id(), "B");
    }
}
