use std::sync::{Arc, Mutex};
use std::time::Duration;

use cached::{Cached, TimedSizedCache};
use sea_orm::DatabaseConnection;
use tracing::trace;

use crate::error::Result;
use model::entities::employee;

/// A caching wrapper for the total-overtime aggregation.
///
/// Totals are cached per employee id. There is no dependency tracking behind
/// the cache: every write path that changes an input of the total (sheet
/// creation, archival or amount edits, `initial_overtime`, the start date)
/// must call [`CachedOvertimeCalculator::invalidate`] for the touched
/// employee. The TTL only bounds staleness for writes that bypass the
/// service.
///
/// Features:
/// - Caches total_overtime results with TTL
/// - Per-employee invalidation and full clearing
/// - Thread-safe implementation using Arc<Mutex<>>
pub struct CachedOvertimeCalculator<C: Cached<i32, f64> = TimedSizedCache<i32, f64>> {
    /// Cache for total_overtime results
    total_cache: Arc<Mutex<C>>,
}

impl<C: Cached<i32, f64>> Clone for CachedOvertimeCalculator<C> {
    fn clone(&self) -> Self {
        Self {
            total_cache: Arc::clone(&self.total_cache),
        }
    }
}

impl<C: Cached<i32, f64>> CachedOvertimeCalculator<C> {
    /// Creates a calculator with a custom cache store implementation.
    pub fn new_with_store(cache_store: C) -> Self {
        Self {
            total_cache: Arc::new(Mutex::new(cache_store)),
        }
    }

    /// Total overtime of the employee, from cache when a fresh entry exists.
    pub async fn total_overtime(
        &self,
        db: &DatabaseConnection,
        employee: &employee::Model,
    ) -> Result<f64> {
        if let Ok(mut cache) = self.total_cache.lock() {
            if let Some(total) = cache.cache_get(&employee.id) {
                trace!("Overtime cache hit for employee {}", employee.id);
                return Ok(*total);
            }
        }

        // Not in cache, compute the result
        let total = super::total_overtime(db, employee).await?;

        if let Ok(mut cache) = self.total_cache.lock() {
            cache.cache_set(employee.id, total);
        }

        Ok(total)
    }

    /// Drops the cached total of one employee.
    ///
    /// Callers invoke this after any write that changes an input of the
    /// employee's total, so the next read recomputes.
    pub fn invalidate(&self, employee_id: i32) {
        if let Ok(mut cache) = self.total_cache.lock() {
            cache.cache_remove(&employee_id);
        }
    }

    /// Clears all cached totals, forcing fresh computation on the next reads.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.total_cache.lock() {
            cache.cache_clear();
        }
    }

    /// Returns the current number of cached totals.
    pub fn cache_size(&self) -> usize {
        if let Ok(cache) = self.total_cache.lock() {
            cache.cache_size()
        } else {
            0
        }
    }
}

impl CachedOvertimeCalculator<TimedSizedCache<i32, f64>> {
    /// Creates a calculator with a bounded, TTL-expiring cache.
    ///
    /// # Arguments
    /// * `cache_size` - Maximum number of employees held in the cache
    /// * `ttl` - Time to live for cached entries
    pub fn new(cache_size: usize, ttl: Duration) -> Self {
        Self::new_with_store(TimedSizedCache::with_size_and_lifespan(
            cache_size,
            ttl.as_secs(),
        ))
    }

    /// Creates a calculator with default settings.
    ///
    /// Default settings:
    /// - Cache size: 100 entries
    /// - TTL: 5 minutes
    pub fn with_defaults() -> Self {
        Self::new(100, Duration::from_secs(300))
    }
}
