use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;

use super::order::{parse_date, Order};

/// Optional criteria combined with AND. Absent or empty fields do not
/// constrain the result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilters {
    /// Case-insensitive match on customer, product or order number.
    pub query: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive match on customer only.
    pub customer: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Returns the orders matching every present filter, in input order.
///
/// A date bound that cannot be parsed matches nothing.
pub fn apply_filters(orders: &[Order], filters: &OrderFilters) -> Vec<Order> {
    let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

    let query = present(&filters.query).map(|q| q.to_lowercase());
    let status = present(&filters.status);
    let customer = present(&filters.customer).map(|c| c.to_lowercase());
    let start = present(&filters.start_date).map(|s| parse_date(&s));
    let end = present(&filters.end_date).map(|s| parse_date(&s));

    orders
        .iter()
        .filter(|o| {
            query.as_deref().map_or(true, |q| {
                o.customer.to_lowercase().contains(q)
                    || o.product.to_lowercase().contains(q)
                    || o.order_number.to_string().contains(q)
            })
        })
        .filter(|o| status.as_deref().map_or(true, |s| o.status.as_str() == s))
        .filter(|o| {
            customer
                .as_deref()
                .map_or(true, |c| o.customer.to_lowercase().contains(c))
        })
        .filter(|o| {
            start.map_or(true, |bound| {
                matches!((o.order_date(), bound), (Some(d), Some(b)) if d >= b)
            })
        })
        .filter(|o| {
            end.map_or(true, |bound| {
                matches!((o.order_date(), bound), (Some(d), Some(b)) if d <= b)
            })
        })
        .cloned()
        .collect()
}

/// Orders owned by `username`.
pub fn scoped_to_user(orders: Vec<Order>, username: &str) -> Vec<Order> {
    orders
        .into_iter()
        .filter(|o| o.username.as_deref() == Some(username))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    OrderNumber,
    Customer,
    Product,
    Quantity,
    Price,
    Total,
    Status,
    Date,
    CreatedAt,
    UpdatedAt,
    Username,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "orderNumber" | "id" => SortField::OrderNumber,
            "customer" => SortField::Customer,
            "product" => SortField::Product,
            "quantity" => SortField::Quantity,
            "price" => SortField::Price,
            "total" => SortField::Total,
            "status" => SortField::Status,
            "date" => SortField::Date,
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "username" => SortField::Username,
            other => return Err(format!("Cannot sort by '{}'", other)),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// `"asc"` sorts ascending; anything else sorts descending.
    pub fn parse(s: &str) -> Self {
        if s == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Sorts `orders` in place. Ties keep their relative order. Orders without
/// a value for the field sort before those with one.
pub fn sort_orders(orders: &mut [Order], field: SortField, direction: SortDirection) {
    orders.sort_by(|a, b| {
        let ord = compare_by(a, b, field);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare_by(a: &Order, b: &Order, field: SortField) -> Ordering {
    match field {
        SortField::OrderNumber => a.order_number.cmp(&b.order_number),
        SortField::Customer => a.customer.cmp(&b.customer),
        SortField::Product => a.product.cmp(&b.product),
        SortField::Quantity => a.quantity.cmp(&b.quantity),
        SortField::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        SortField::Total => a.total.partial_cmp(&b.total).unwrap_or(Ordering::Equal),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::Date => {
            let parsed = |o: &Order| o.date.as_deref().and_then(parse_date);
            parsed(a).cmp(&parsed(b))
        }
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Username => a.username.cmp(&b.username),
    }
}
