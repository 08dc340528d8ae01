//! Simple profiling macros using thread-local storage
//!
//! This module provides lightweight profiling without changing function signatures.
//! Enable with environment variable: BATTLESNAKE_PROFILE=1

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

/// Profiled categories, in report order
pub const CATEGORIES: [&str; 6] = [
    "astar",
    "flood_fill",
    "collision",
    "food",
    "portfolio",
    "projection",
];

const NUM_CATEGORIES: usize = CATEGORIES.len();

thread_local! {
    static LOCAL_TIME: RefCell<[u64; NUM_CATEGORIES]> = RefCell::new([0; NUM_CATEGORIES]);
    static LOCAL_COUNT: RefCell<[usize; NUM_CATEGORIES]> = RefCell::new([0; NUM_CATEGORIES]);
}

// Global aggregators
static GLOBAL_TIME: [AtomicU64; NUM_CATEGORIES] = [
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
    AtomicU64::new(0),
];
static GLOBAL_COUNT: [AtomicUsize; NUM_CATEGORIES] = [
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
    AtomicUsize::new(0),
];

#[inline]
pub fn is_profiling_enabled() -> bool {
    std::env::var("BATTLESNAKE_PROFILE").is_ok()
}

fn category_index(category: &str) -> Option<usize> {
    CATEGORIES.iter().position(|c| *c == category)
}

pub struct ProfileGuard {
    start: Instant,
    category: &'static str,
}

impl ProfileGuard {
    pub fn new(category: &'static str) -> Option<Self> {
        if is_profiling_enabled() {
            Some(ProfileGuard {
                start: Instant::now(),
                category,
            })
        } else {
            None
        }
    }
}

impl Drop for ProfileGuard {
    fn drop(&mut self) {
        let elapsed_ns = self.start.elapsed().as_nanos() as u64;

        if let Some(idx) = category_index(self.category) {
            LOCAL_TIME.with(|t| t.borrow_mut()[idx] += elapsed_ns);
            LOCAL_COUNT.with(|c| c.borrow_mut()[idx] += 1);
        }
    }
}

/// Moves this thread's counters into the global totals
pub fn merge_thread_local() {
    if !is_profiling_enabled() {
        return;
    }

    LOCAL_TIME.with(|t| {
        let mut local = t.borrow_mut();
        for (idx, value) in local.iter_mut().enumerate() {
            GLOBAL_TIME[idx].fetch_add(*value, Ordering::Relaxed);
            *value = 0;
        }
    });
    LOCAL_COUNT.with(|c| {
        let mut local = c.borrow_mut();
        for (idx, value) in local.iter_mut().enumerate() {
            GLOBAL_COUNT[idx].fetch_add(*value, Ordering::Relaxed);
            *value = 0;
        }
    });
}

/// Total (nanoseconds, calls) merged so far for `category`
pub fn totals(category: &str) -> (u64, usize) {
    match category_index(category) {
        Some(idx) => (
            GLOBAL_TIME[idx].load(Ordering::Relaxed),
            GLOBAL_COUNT[idx].load(Ordering::Relaxed),
        ),
        None => (0, 0),
    }
}

pub fn print_report(total_time_ms: u64) {
    if !is_profiling_enabled() {
        return;
    }

    let total_ns = total_time_ms * 1_000_000;

    eprintln!("\n═══════════════════════════════════════════════════════════");
    eprintln!("                 PERFORMANCE PROFILE");
    eprintln!("═══════════════════════════════════════════════════════════");
    eprintln!("Total Time: {}ms\n", total_time_ms);

    for category in CATEGORIES.iter() {
        let (time_ns, count) = totals(category);
        let ms = time_ns as f64 / 1_000_000.0;
        let pct = if total_ns > 0 { 100.0 * time_ns as f64 / total_ns as f64 } else { 0.0 };
        let avg_us = if count > 0 { time_ns as f64 / (count * 1000) as f64 } else { 0.0 };

        eprintln!(
            "  {:<12} {:>9.2}ms ({:>5.1}%) - {} calls, {:.2}µs avg",
            category, ms, pct, count, avg_us
        );
    }

    eprintln!("═══════════════════════════════════════════════════════════\n");
}

pub fn reset() {
    for idx in 0..NUM_CATEGORIES {
        GLOBAL_TIME[idx].store(0, Ordering::Relaxed);
        GLOBAL_COUNT[idx].store(0, Ordering::Relaxed);
    }
}

#[macro_export]
macro_rules! profile {
    ($category:expr, $code:block) => {{
        let _guard = $crate::simple_profiler::ProfileGuard::new($category);
        $code
    }};
}
