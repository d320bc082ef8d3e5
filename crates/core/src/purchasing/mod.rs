//! Purchase order lifecycle and receiving.
//!
//! # Modules
//!
//! - `types` - Purchase status and line types
//! - `error` - Purchasing rule errors
//! - `service` - Transitions, totals and receipt planning

pub mod error;
pub mod service;
pub mod types;

pub use error::PurchaseRuleError;
pub use service::PurchaseService;
pub use types::{PurchaseLine, PurchaseStatus, ReceiptLine, ReceiptOverride, ReceivableItem};
