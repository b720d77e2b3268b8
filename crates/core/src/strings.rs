//! Label helpers.

use convert_case::{Case, Casing};

/// Turn a machine name (`created_at`, `firstName`, `order-items`) into a
/// human label (`Created At`, `First Name`, `Order Items`).
pub fn user_friendly_case(name: &str) -> String {
    name.to_case(Case::Title)
}
