//! Query timing records ("dev6" lines).
//!
//! Every store operation reports one JSON line: to the `movielite::dev6` log target (off unless
//! `MOVIELITE_DEV6` is set) and, when enabled for the current thread, to a capture buffer that
//! tests can drain without installing a global logger.

use serde::Serialize;
use std::cell::RefCell;
use std::time::Instant;

pub const DEV6_TARGET: &str = "movielite::dev6";

thread_local! {
    static CAPTURE: RefCell<Option<Vec<String>>> = const { RefCell::new(None) };
}

/// One timed store operation.
#[derive(Debug, Clone, Serialize)]
pub struct QueryTiming<'a> {
    pub bench: &'static str,
    pub op: &'a str,
    pub backend: &'static str,
    pub collection: &'a str,
    pub duration_us: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scanned: Option<usize>,
    pub result_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl<'a> QueryTiming<'a> {
    #[must_use]
    pub fn new(op: &'a str, backend: &'static str, collection: &'a str, started: Instant) -> Self {
        Self {
            bench: "query",
            op,
            backend,
            collection,
            duration_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            scanned: None,
            result_count: 0,
            limit: None,
        }
    }

    #[must_use]
    pub fn results(mut self, n: u64) -> Self {
        self.result_count = n;
        self
    }

    #[must_use]
    pub fn scanned(mut self, n: usize) -> Self {
        self.scanned = Some(n);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: Option<i64>) -> Self {
        self.limit = limit;
        self
    }

    /// Emits the record.
    pub fn record(&self) {
        let Ok(line) = serde_json::to_string(self) else {
            return;
        };
        CAPTURE.with(|c| {
            if let Some(buf) = c.borrow_mut().as_mut() {
                buf.push(line.clone());
            }
        });
        log::trace!(target: DEV6_TARGET, "{line}");
    }
}

/// Stops capturing on drop.
pub struct CaptureGuard;

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        CAPTURE.with(|c| *c.borrow_mut() = None);
    }
}

/// Starts capturing timing lines emitted on the current thread.
#[must_use]
pub fn capture() -> CaptureGuard {
    CAPTURE.with(|c| *c.borrow_mut() = Some(Vec::new()));
    CaptureGuard
}

/// Takes the lines captured so far on this thread; empty when capture is off.
pub fn drain() -> Vec<String> {
    CAPTURE.with(|c| c.borrow_mut().as_mut().map(std::mem::take).unwrap_or_default())
}
