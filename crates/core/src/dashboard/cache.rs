//! Short-lived cache for the dashboard summary.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use super::types::DashboardSummary;

/// Default time-to-live in seconds.
const DEFAULT_TTL_SECS: u64 = 30;

/// There is one summary for the whole business, so the key is unit.
#[derive(Clone)]
pub struct DashboardCache {
    cache: Cache<(), Arc<DashboardSummary>>,
}

impl DashboardCache {
    /// Creates a cache keeping the summary for `ttl_secs` seconds.
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();
        Self { cache }
    }

    /// Cached summary, if still fresh.
    #[must_use]
    pub fn get(&self) -> Option<Arc<DashboardSummary>> {
        self.cache.get(&())
    }

    /// Stores a freshly computed summary and returns it shared.
    pub fn store(&self, summary: DashboardSummary) -> Arc<DashboardSummary> {
        let summary = Arc::new(summary);
        self.cache.insert((), Arc::clone(&summary));
        summary
    }

    /// Drops the cached summary.
    pub fn invalidate(&self) {
        self.cache.invalidate(&());
    }
}

impl Default for DashboardCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}

impl std::fmt::Debug for DashboardCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardCache")
            .field("cached", &self.cache.contains_key(&()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{InventorySummary, MonthRange};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn summary() -> DashboardSummary {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        DashboardSummary {
            month: MonthRange::containing(today),
            inventory: InventorySummary::default(),
            sales_total: dec!(100),
            expenses_total: dec!(40),
            net: dec!(60),
            open_purchase_orders: 2,
            vans_on_road: 1,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_store_then_get() {
        let cache = DashboardCache::default();
        assert!(cache.get().is_none());

        cache.store(summary());
        assert_eq!(cache.get().unwrap().net, dec!(60));
    }

    #[test]
    fn test_invalidate() {
        let cache = DashboardCache::new(60);
        cache.store(summary());
        cache.invalidate();
        assert!(cache.get().is_none());
    }
}
