use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
struct Counters {
    batches: AtomicU64,
    processed: AtomicU64,
    confirmed: AtomicU64,
    errors: AtomicU64,
    escalations: AtomicU64,
    removals: AtomicU64,
    cancelled: AtomicU64,
}

static COUNTERS: Lazy<Counters> = Lazy::new(Counters::default);

fn increment(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
}

pub fn record_batch() {
    increment(&COUNTERS.batches);
}

pub fn record_processed(confirmed: bool) {
    increment(&COUNTERS.processed);
    if confirmed {
        increment(&COUNTERS.confirmed);
    } else {
        increment(&COUNTERS.errors);
    }
}

pub fn record_escalations(count: u32) {
    COUNTERS
        .escalations
        .fetch_add(u64::from(count), Ordering::Relaxed);
}

pub fn record_removal() {
    increment(&COUNTERS.removals);
}

pub fn record_cancelled() {
    increment(&COUNTERS.cancelled);
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchMetricsSnapshot {
    pub batches: u64,
    pub processed: u64,
    pub confirmed: u64,
    pub errors: u64,
    pub escalations: u64,
    pub removals: u64,
    pub cancelled: u64,
}

pub fn snapshot() -> BatchMetricsSnapshot {
    BatchMetricsSnapshot {
        batches: COUNTERS.batches.load(Ordering::Relaxed),
        processed: COUNTERS.processed.load(Ordering::Relaxed),
        confirmed: COUNTERS.confirmed.load(Ordering::Relaxed),
        errors: COUNTERS.errors.load(Ordering::Relaxed),
        escalations: COUNTERS.escalations.load(Ordering::Relaxed),
        removals: COUNTERS.removals.load(Ordering::Relaxed),
        cancelled: COUNTERS.cancelled.load(Ordering::Relaxed),
    }
}
