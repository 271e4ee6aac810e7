use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use super::domain::LoanId;

/// Source of `created_at` timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that starts at a fixed instant and advances by `step` on every read.
///
/// A zero step pins every reading to the same instant.
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl FixedClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self::stepping(start, Duration::zero())
    }

    pub fn stepping(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let mut current = match self.current.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let reading = *current;
        *current = reading + self.step;
        reading
    }
}

/// Strategy for minting human-readable loan ids.
pub trait LoanIdGenerator: Send + Sync {
    fn next_loan_id(&self) -> LoanId;
}

/// `<prefix><counter>` ids, zero padded to six digits.
#[derive(Debug)]
pub struct SequentialLoanIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialLoanIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(first),
        }
    }
}

impl LoanIdGenerator for SequentialLoanIds {
    fn next_loan_id(&self) -> LoanId {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        LoanId(format!("{}{id:06}", self.prefix))
    }
}

/// `<prefix><unix millis>` ids read from a clock.
///
/// Two ids requested within the same millisecond (or after the clock steps backwards)
/// are bumped forward so the sequence stays strictly increasing.
pub struct TimestampLoanIds {
    prefix: String,
    clock: Arc<dyn Clock>,
    last: AtomicI64,
}

impl TimestampLoanIds {
    pub fn new(prefix: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            prefix: prefix.into(),
            clock,
            last: AtomicI64::new(i64::MIN),
        }
    }
}

impl LoanIdGenerator for TimestampLoanIds {
    fn next_loan_id(&self) -> LoanId {
        let now = self.clock.now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or(now);
        let issued = now.max(previous.saturating_add(1));
        LoanId(format!("{}{issued}", self.prefix))
    }
}

/// Pairs the id strategy with the clock so stores stamp records uniformly.
#[derive(Clone)]
pub struct RecordStamper {
    ids: Arc<dyn LoanIdGenerator>,
    clock: Arc<dyn Clock>,
}

impl RecordStamper {
    pub fn new(ids: Arc<dyn LoanIdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    /// Timestamp-derived ids on the system clock.
    pub fn system(prefix: impl Into<String>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ids = Arc::new(TimestampLoanIds::new(prefix, clock.clone()));
        Self::new(ids, clock)
    }

    pub fn stamp(&self) -> (LoanId, DateTime<Utc>) {
        (self.ids.next_loan_id(), self.clock.now())
    }
}

impl std::fmt::Debug for RecordStamper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStamper").finish_non_exhaustive()
    }
}
