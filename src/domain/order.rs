use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of an order.
///
/// Stored on disk as its human-readable label. Labels outside the fixed
/// enumeration survive a load/save cycle as [`OrderStatus::Unrecognized`] so
/// hand-edited data files are never rewritten, but they are rejected when
/// supplied through the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    AwaitingPayment,
    Pending,
    InProgress,
    Completed,
    BackOrder,
    Cancelled,
    Unrecognized(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::AwaitingPayment => "Awaiting Payment",
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Completed => "Completed",
            OrderStatus::BackOrder => "Back Order",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Unrecognized(label) => label,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, OrderStatus::Unrecognized(_))
    }

    /// Statuses counted as open work by the dashboard metrics.
    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::InProgress)
    }
}

impl From<String> for OrderStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Awaiting Payment" => OrderStatus::AwaitingPayment,
            "Pending" => OrderStatus::Pending,
            "In Progress" => OrderStatus::InProgress,
            "Completed" => OrderStatus::Completed,
            "Back Order" => OrderStatus::BackOrder,
            "Cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Unrecognized(label),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(label: &str) -> Self {
        OrderStatus::from(label.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Unrecognized(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }

    /// Looks `label` up among the configured priority levels.
    pub fn from_label(label: &str) -> Option<Priority> {
        TRACKING
            .priority_levels
            .iter()
            .copied()
            .find(|p| p.as_str() == label)
    }
}

/// Process-wide tracking settings. Never mutated after start-up.
#[derive(Debug)]
pub struct TrackingConfig {
    pub statuses: [OrderStatus; 6],
    pub priority_levels: [Priority; 4],
    pub default_status: OrderStatus,
    /// Number of customers ranked on the dashboard.
    pub top_customers_limit: usize,
    /// Number of products ranked on the dashboard.
    pub best_sellers_limit: usize,
    /// Quantity a best seller must exceed before a restock is suggested.
    pub restock_threshold: i64,
}

pub static TRACKING: TrackingConfig = TrackingConfig {
    statuses: [
        OrderStatus::AwaitingPayment,
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::BackOrder,
        OrderStatus::Cancelled,
    ],
    priority_levels: [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent],
    default_status: OrderStatus::AwaitingPayment,
    top_customers_limit: 5,
    best_sellers_limit: 3,
    restock_threshold: 5,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusHistoryEntry {
    #[schema(value_type = String)]
    pub status: OrderStatus,
    pub timestamp: DateTime<Utc>,
    pub updated_by: String,
}

/// One sales transaction.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_number: u64,
    pub customer: String,
    pub product: String,
    pub quantity: i64,
    /// Unit price.
    pub price: f64,
    /// `quantity * price`, fixed at creation.
    pub total: f64,
    #[schema(value_type = String)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status_history: Vec<StatusHistoryEntry>,
    /// Creation time as ISO 8601 text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// An order as found on disk. Older files key the order by `id`, and some
/// records carry both `id` and `orderNumber`; `orderNumber` wins when present.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOrder {
    order_number: Option<u64>,
    #[serde(rename = "id")]
    legacy_id: Option<u64>,
    customer: String,
    product: String,
    quantity: i64,
    price: f64,
    total: Option<f64>,
    status: OrderStatus,
    #[serde(default)]
    priority: Option<Priority>,
    #[serde(default)]
    status_history: Vec<StatusHistoryEntry>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    username: Option<String>,
}

impl<'de> Deserialize<'de> for Order {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = StoredOrder::deserialize(deserializer)?;
        let order_number = stored
            .order_number
            .or(stored.legacy_id)
            .ok_or_else(|| <D::Error as de::Error>::missing_field("orderNumber"))?;
        Ok(Order {
            order_number,
            customer: stored.customer,
            product: stored.product,
            quantity: stored.quantity,
            price: stored.price,
            // Absent or null in legacy records; counts as no revenue.
            total: stored.total.unwrap_or(0.0),
            status: stored.status,
            priority: stored.priority,
            status_history: stored.status_history,
            date: stored.date,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
            username: stored.username,
        })
    }
}

impl Order {
    /// The instant used for date-range filtering: `createdAt`, falling back
    /// to the parsed `date` text. `None` when neither yields a valid date.
    pub fn order_date(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .or_else(|| self.date.as_deref().and_then(parse_date))
    }
}

/// Unvalidated order data as submitted by a client.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub customer: Option<String>,
    pub product: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub status: Option<String>,
    /// One of the configured priority levels.
    pub priority: Option<String>,
    pub username: Option<String>,
}

/// Parses the date formats found in order data: RFC 3339 timestamps,
/// naive `YYYY-MM-DDTHH:MM:SS` timestamps and bare `YYYY-MM-DD` dates, all
/// taken as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
