//! Single-pass aggregations over a borrowed slice of orders.
//!
//! Every function here is total: an empty slice yields zeroed or empty
//! results, and the input is never modified.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use utoipa::ToSchema;

use super::order::{Order, OrderStatus, TRACKING};

/// Order counts per status, in enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSummary(Vec<(OrderStatus, usize)>);

impl StatusSummary {
    pub fn count(&self, status: &OrderStatus) -> usize {
        self.0
            .iter()
            .find(|(s, _)| s == status)
            .map_or(0, |(_, n)| *n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OrderStatus, usize)> {
        self.0.iter().map(|(s, n)| (s, *n))
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, n)| n).sum()
    }
}

impl Serialize for StatusSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (status, count) in &self.0 {
            map.serialize_entry(status.as_str(), count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CustomerTotal {
    pub customer: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductSales {
    pub product: String,
    pub qty: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderMetrics {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub avg_order_value: f64,
    pub completed_orders: usize,
    pub pending_orders: usize,
    /// Percentage of orders completed, 0 to 100.
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
}

/// Everything the analytics page renders, computed in one call.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub metrics: OrderMetrics,
    #[schema(value_type = Object)]
    pub status_summary: StatusSummary,
    pub top_customers: Vec<CustomerTotal>,
    pub best_selling_products: Vec<ProductSales>,
    pub sales_trends: Vec<MonthlyTotal>,
    pub recommendation: String,
}

pub fn status_summary(orders: &[Order]) -> StatusSummary {
    StatusSummary(
        TRACKING
            .statuses
            .iter()
            .map(|status| {
                let n = orders.iter().filter(|o| &o.status == status).count();
                (status.clone(), n)
            })
            .collect(),
    )
}

/// Customers ranked by summed order total, highest first. Equal totals keep
/// the order in which the customers first appear.
pub fn top_customers(orders: &[Order], limit: usize) -> Vec<CustomerTotal> {
    let mut groups: Vec<CustomerTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for order in orders {
        let slot = *index.entry(order.customer.as_str()).or_insert_with(|| {
            groups.push(CustomerTotal {
                customer: order.customer.clone(),
                total: 0.0,
                count: 0,
            });
            groups.len() - 1
        });
        groups[slot].total += order.total;
        groups[slot].count += 1;
    }

    groups.sort_by(|a, b| descending(a.total, b.total));
    groups.truncate(limit);
    groups
}

/// Products ranked by summed quantity, highest first.
pub fn best_selling_products(orders: &[Order], top_n: usize) -> Vec<ProductSales> {
    let mut groups: Vec<ProductSales> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for order in orders {
        let slot = *index.entry(order.product.as_str()).or_insert_with(|| {
            groups.push(ProductSales {
                product: order.product.clone(),
                qty: 0,
            });
            groups.len() - 1
        });
        groups[slot].qty += order.quantity;
    }

    groups.sort_by(|a, b| b.qty.cmp(&a.qty));
    groups.truncate(top_n);
    groups
}

pub fn order_metrics(orders: &[Order]) -> OrderMetrics {
    let total_orders = orders.len();
    let total_revenue: f64 = orders.iter().map(|o| o.total).sum();
    let completed_orders = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Completed)
        .count();
    let pending_orders = orders.iter().filter(|o| o.status.is_pending()).count();

    let (avg_order_value, completion_rate) = if total_orders > 0 {
        (
            total_revenue / total_orders as f64,
            completed_orders as f64 / total_orders as f64 * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    OrderMetrics {
        total_orders,
        total_revenue,
        avg_order_value,
        completed_orders,
        pending_orders,
        completion_rate,
    }
}

/// Revenue bucketed by the `YYYY-MM` prefix of each order's date text,
/// ascending. Orders without a date land in `"Unknown"`.
pub fn sales_trends(orders: &[Order]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for order in orders {
        let month = match order.date.as_deref() {
            Some(date) if !date.is_empty() => date.chars().take(7).collect(),
            _ => "Unknown".to_string(),
        };
        *months.entry(month).or_insert(0.0) += order.total;
    }
    months
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

pub fn recommendation(orders: &[Order]) -> String {
    if let Some(best) = best_selling_products(orders, 1).first() {
        if best.qty > TRACKING.restock_threshold {
            return format!(
                "Consider stocking up on \"{}\". It's selling fast!",
                best.product
            );
        }
    }
    if orders.is_empty() {
        return "No sales data yet. Start recording orders!".to_string();
    }
    "Keep tracking your sales for more insights.".to_string()
}

/// Orders whose date lies within `[start, end]`. Orders without a usable
/// date never match.
pub fn orders_in_date_range(
    orders: &[Order],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Order> {
    orders
        .iter()
        .filter(|o| o.order_date().is_some_and(|d| start <= d && d <= end))
        .cloned()
        .collect()
}

pub fn dashboard(orders: &[Order]) -> Dashboard {
    Dashboard {
        metrics: order_metrics(orders),
        status_summary: status_summary(orders),
        top_customers: top_customers(orders, TRACKING.top_customers_limit),
        best_selling_products: best_selling_products(orders, TRACKING.best_sellers_limit),
        sales_trends: sales_trends(orders),
        recommendation: recommendation(orders),
    }
}

/// Plain-text report of the orders placed on `day` (UTC).
pub fn daily_report(orders: &[Order], day: NaiveDate) -> String {
    let rule = "-".repeat(40);
    let sold: Vec<&Order> = orders
        .iter()
        .filter(|o| o.order_date().is_some_and(|d| d.date_naive() == day))
        .collect();

    let mut report = format!("Sales Report - {}, {}\n", day.format("%A"), day);
    report.push_str(&rule);
    report.push('\n');
    for order in &sold {
        report.push_str(&format!("{}: R{:.2}\n", order.product, order.total));
    }
    report.push_str(&rule);
    report.push('\n');
    report.push_str(&format!("Total Items Sold: {}\n", sold.len()));
    report
}

/// File name the daily report is offered under.
pub fn daily_report_filename(day: NaiveDate) -> String {
    format!("sales_{}_{}.txt", day, day.format("%A"))
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn order(customer: &str, product: &str, quantity: i64, total: f64, status: &str) -> Order {
        Order {
            order_number: 0,
            customer: customer.to_string(),
            product: product.to_string(),
            quantity,
            price: if quantity > 0 { total / quantity as f64 } else { 0.0 },
            total,
            status: OrderStatus::from(status),
            priority: None,
            status_history: vec![],
            date: None,
            created_at: None,
            updated_at: None,
            username: None,
        }
    }

    fn dated(mut o: Order, date: &str) -> Order {
        o.date = Some(date.to_string());
        o
    }

    fn pen_orders() -> Vec<Order> {
        vec![
            order("Amy", "Pen", 3, 30.0, "Completed"),
            order("Bo", "Pen", 6, 60.0, "Pending"),
        ]
    }

    // ── status_summary ────────────────────────────────────────────────────────

    #[test]
    fn status_summary_counts_every_status() {
        let summary = status_summary(&pen_orders());
        assert_eq!(summary.count(&OrderStatus::Completed), 1);
        assert_eq!(summary.count(&OrderStatus::Pending), 1);
        for status in [
            OrderStatus::AwaitingPayment,
            OrderStatus::InProgress,
            OrderStatus::BackOrder,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(summary.count(&status), 0);
        }
        assert_eq!(summary.iter().count(), 6);
    }

    #[test]
    fn status_summary_ignores_unknown_statuses() {
        let mut orders = pen_orders();
        orders.push(order("Cy", "Ink", 1, 5.0, "Shipped"));
        let summary = status_summary(&orders);
        assert_eq!(summary.total(), 2);
        assert!(summary.total() <= orders.len());
    }

    #[test]
    fn status_summary_serializes_as_ordered_map() {
        let json = serde_json::to_string(&status_summary(&pen_orders())).expect("serializable");
        assert_eq!(
            json,
            r#"{"Awaiting Payment":0,"Pending":1,"In Progress":0,"Completed":1,"Back Order":0,"Cancelled":0}"#
        );
    }

    // ── rankings ──────────────────────────────────────────────────────────────

    #[test]
    fn top_customers_groups_and_ranks() {
        let orders = vec![
            order("Amy", "Pen", 1, 10.0, "Pending"),
            order("Bo", "Ink", 1, 50.0, "Pending"),
            order("Amy", "Pad", 1, 15.0, "Pending"),
            order("Cy", "Pen", 1, 5.0, "Pending"),
        ];
        let ranked = top_customers(&orders, 2);
        assert_eq!(
            ranked,
            vec![
                CustomerTotal { customer: "Bo".to_string(), total: 50.0, count: 1 },
                CustomerTotal { customer: "Amy".to_string(), total: 25.0, count: 2 },
            ]
        );
    }

    #[test]
    fn top_customers_ties_keep_first_seen_order() {
        let orders = vec![
            order("Zed", "Pen", 1, 10.0, "Pending"),
            order("Amy", "Pen", 1, 10.0, "Pending"),
        ];
        let names: Vec<_> = top_customers(&orders, 5)
            .into_iter()
            .map(|c| c.customer)
            .collect();
        assert_eq!(names, ["Zed", "Amy"]);
    }

    #[test]
    fn best_selling_products_sums_quantity() {
        assert_eq!(
            best_selling_products(&pen_orders(), 1),
            vec![ProductSales { product: "Pen".to_string(), qty: 9 }]
        );
    }

    #[test]
    fn rankings_are_sorted_and_bounded() {
        let orders: Vec<Order> = (1..=8)
            .map(|i| order(&format!("c{i}"), &format!("p{}", i % 4), i, i as f64, "Pending"))
            .collect();

        let customers = top_customers(&orders, 5);
        assert_eq!(customers.len(), 5);
        assert!(customers.windows(2).all(|w| w[0].total >= w[1].total));

        let products = best_selling_products(&orders, 3);
        assert_eq!(products.len(), 3);
        assert!(products.windows(2).all(|w| w[0].qty >= w[1].qty));
    }

    // ── order_metrics ─────────────────────────────────────────────────────────

    #[test]
    fn metrics_of_empty_input_are_zero() {
        assert_eq!(
            order_metrics(&[]),
            OrderMetrics {
                total_orders: 0,
                total_revenue: 0.0,
                avg_order_value: 0.0,
                completed_orders: 0,
                pending_orders: 0,
                completion_rate: 0.0,
            }
        );
    }

    #[test]
    fn metrics_count_in_progress_as_pending() {
        let orders = vec![
            order("Amy", "Pen", 1, 10.0, "Completed"),
            order("Bo", "Pen", 1, 20.0, "In Progress"),
            order("Cy", "Pen", 1, 30.0, "Pending"),
            order("Di", "Pen", 1, 40.0, "Cancelled"),
        ];
        let metrics = order_metrics(&orders);
        assert_eq!(metrics.total_orders, 4);
        assert_eq!(metrics.total_revenue, 100.0);
        assert_eq!(metrics.avg_order_value, 25.0);
        assert_eq!(metrics.completed_orders, 1);
        assert_eq!(metrics.pending_orders, 2);
        assert_eq!(metrics.completion_rate, 25.0);
    }

    // ── sales_trends ──────────────────────────────────────────────────────────

    #[test]
    fn sales_trends_bucket_by_month_ascending() {
        let orders = vec![
            dated(order("Amy", "Pen", 1, 10.0, "Pending"), "2024-03-02T09:00:00Z"),
            dated(order("Bo", "Pen", 1, 5.0, "Pending"), "2024-01-20"),
            dated(order("Cy", "Pen", 1, 7.5, "Pending"), "2024-03-28T18:30:00Z"),
            order("Di", "Pen", 1, 1.0, "Pending"),
        ];
        assert_eq!(
            sales_trends(&orders),
            vec![
                MonthlyTotal { month: "2024-01".to_string(), total: 5.0 },
                MonthlyTotal { month: "2024-03".to_string(), total: 17.5 },
                MonthlyTotal { month: "Unknown".to_string(), total: 1.0 },
            ]
        );
    }

    // ── recommendation ────────────────────────────────────────────────────────

    #[test]
    fn recommends_restocking_a_fast_seller() {
        let text = recommendation(&pen_orders());
        assert!(text.contains("\"Pen\""), "got: {text}");
    }

    #[test]
    fn threshold_must_be_exceeded() {
        let orders = vec![order("Amy", "Pen", 5, 50.0, "Pending")];
        assert_eq!(
            recommendation(&orders),
            "Keep tracking your sales for more insights."
        );
    }

    #[test]
    fn empty_input_asks_for_data() {
        assert_eq!(
            recommendation(&[]),
            "No sales data yet. Start recording orders!"
        );
    }

    // ── orders_in_date_range ──────────────────────────────────────────────────

    #[test]
    fn date_range_is_inclusive_and_skips_undated() {
        let orders = vec![
            dated(order("Amy", "Pen", 1, 1.0, "Pending"), "2024-01-01"),
            dated(order("Bo", "Pen", 1, 1.0, "Pending"), "2024-01-15T12:00:00Z"),
            dated(order("Cy", "Pen", 1, 1.0, "Pending"), "2024-02-01T00:00:01Z"),
            order("Di", "Pen", 1, 1.0, "Pending"),
        ];
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        let customers: Vec<_> = orders_in_date_range(&orders, start, end)
            .into_iter()
            .map(|o| o.customer)
            .collect();
        assert_eq!(customers, ["Amy", "Bo"]);
    }

    // ── daily_report ──────────────────────────────────────────────────────────

    #[test]
    fn daily_report_lists_only_that_day() {
        let orders = vec![
            dated(order("Amy", "Pen", 2, 20.0, "Pending"), "2024-01-15T08:00:00Z"),
            dated(order("Bo", "Ink", 1, 4.5, "Pending"), "2024-01-15T17:45:00Z"),
            dated(order("Cy", "Pad", 1, 3.0, "Pending"), "2024-01-16T09:00:00Z"),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let rule = "-".repeat(40);

        let expected = format!(
            "Sales Report - Monday, 2024-01-15\n{rule}\nPen: R20.00\nInk: R4.50\n{rule}\nTotal Items Sold: 2\n"
        );
        assert_eq!(daily_report(&orders, day), expected);
        assert_eq!(daily_report_filename(day), "sales_2024-01-15_Monday.txt");
    }

    #[test]
    fn dashboard_uses_tracking_limits() {
        let orders: Vec<Order> = (1..=10)
            .map(|i| order(&format!("c{i}"), &format!("p{i}"), 1, i as f64, "Pending"))
            .collect();
        let board = dashboard(&orders);
        assert_eq!(board.top_customers.len(), TRACKING.top_customers_limit);
        assert_eq!(board.best_selling_products.len(), TRACKING.best_sellers_limit);
        assert_eq!(board.metrics.total_orders, 10);
    }
}
