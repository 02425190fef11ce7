//! Integration test harness.

mod helpers;

mod lifecycle_test;
mod plugin_api_test;
