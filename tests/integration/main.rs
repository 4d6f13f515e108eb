//! Integration tests: the engine end to end, and the HTTP surface driven
//! the way the dashboard page drives it.

mod dashboard_flow;
mod pricing_flow;
