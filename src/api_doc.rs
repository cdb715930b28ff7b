use utoipa::OpenApi;

use crate::domain::analytics::{
    CustomerTotal, Dashboard, MonthlyTotal, OrderMetrics, ProductSales,
};
use crate::domain::order::{Order, OrderInput, Priority, StatusHistoryEntry};
use crate::domain::user::UserView;
use crate::handlers::orders::UpdateStatusRequest;
use crate::handlers::users::{OrderCountsRequest, RegisterRequest};
use crate::handlers::{orders, users};

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        orders::analytics,
        orders::daily_report,
        users::register,
        users::list_users,
        users::user_order_counts,
        users::delete_user,
    ),
    components(schemas(
        Order,
        OrderInput,
        Priority,
        StatusHistoryEntry,
        UpdateStatusRequest,
        Dashboard,
        OrderMetrics,
        CustomerTotal,
        ProductSales,
        MonthlyTotal,
        UserView,
        RegisterRequest,
        OrderCountsRequest,
    )),
    tags(
        (name = "orders", description = "Order recording and lifecycle"),
        (name = "analytics", description = "Dashboard figures and reports"),
        (name = "users", description = "Registration"),
        (name = "admin", description = "User administration"),
    )
)]
pub struct ApiDoc;
