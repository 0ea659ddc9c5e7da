use std::time::{Duration, Instant};

/// A single pending "call me back after `period`" request.
///
/// The deadline is armed after a step completes, so steps never overlap and
/// the period is measured from the end of the previous one.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    deadline: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker { period, deadline: None }
    }

    pub fn arm(&mut self) {
        self.deadline = Some(Instant::now() + self.period);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the deadline, zero once it has passed, `None` when
    /// nothing is pending.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
