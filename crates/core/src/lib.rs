//! Core business logic for Comptoir.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and user roles
//! - `inventory` - Stock positions, weighted-average cost, movements
//! - `partners` - Suppliers, clients and field commercials
//! - `purchasing` - Purchase order lifecycle and receiving
//! - `sales` - Sales orders, totals and payments
//! - `van_sales` - Door-to-door loading and returns reconciliation
//! - `hr` - Attendance and payroll computation
//! - `expenses` - Expense categories and summaries
//! - `manufacturing` - Bills of materials and production orders
//! - `dashboard` - Business overview figures

pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod hr;
pub mod inventory;
pub mod manufacturing;
pub mod partners;
pub mod purchasing;
pub mod sales;
pub mod van_sales;

mod status;

pub use status::InvalidTransition;
