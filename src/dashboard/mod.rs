//! The dashboard page: aggregation of sales into summary tables, chart
//! construction and the page handler.

mod aggregation;
mod charts;
mod handlers;
mod metrics;

pub use handlers::get_dashboard_page;
