//! Frame clock and deferred task queue.
//!
//! Tasks are keyed by a *logical* frame: the wall frame minus the total
//! hit-lag accumulated so far. Freezing pending work for `n` frames is then a
//! single increment of the lag counter, every outstanding task fires `n`
//! frames later, and FIFO order inside a bucket is never touched.
//!
//! [`Scheduler::advance`] hands the due batch back to the caller instead of
//! running it. Anything scheduled while the batch executes lands in the live
//! queue and is not visible until the next advance, which gives the
//! current-frame/next-frame double buffer without any extra bookkeeping.

use std::collections::BTreeMap;

use crate::error::{EngineError, ErrorSeverity};
use crate::types::Frame;

/// Errors raised when registering deferred work.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScheduleError {
    #[error("cannot schedule {delay} frames into the past at {now}")]
    NegativeDelay { delay: i64, now: Frame },

    #[error("scheduler was torn down at {at}")]
    TornDown { at: Frame },
}

impl EngineError for ScheduleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeDelay { .. } => "SCHEDULE_NEGATIVE_DELAY",
            Self::TornDown { .. } => "SCHEDULE_TORN_DOWN",
        }
    }
}

/// Frame clock plus a queue of tasks keyed by logical frame.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Frame,
    lag: u64,
    queue: BTreeMap<i64, Vec<T>>,
    len: usize,
    torn_down: bool,
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Frame::ZERO,
            lag: 0,
            queue: BTreeMap::new(),
            len: 0,
            torn_down: false,
        }
    }

    /// Current wall frame.
    pub fn now(&self) -> Frame {
        self.now
    }

    /// Total frames of hit-lag applied so far.
    pub fn lag(&self) -> u64 {
        self.lag
    }

    /// Wall frame minus accumulated lag. Anything stored against this clock
    /// is shifted by every later freeze.
    pub fn logical_now(&self) -> i64 {
        self.now.0 as i64 - self.lag as i64
    }

    /// Number of tasks still waiting.
    pub fn pending(&self) -> usize {
        self.len
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Registers `task` to run `delay` frames from now.
    ///
    /// A zero delay never runs in the frame that is currently being drained;
    /// it runs on the next advance. Returns the wall frame the task is
    /// expected to fire on if no further hit-lag occurs.
    pub fn schedule(&mut self, delay: i64, task: T) -> Result<Frame, ScheduleError> {
        if self.torn_down {
            return Err(ScheduleError::TornDown { at: self.now });
        }
        if delay < 0 {
            return Err(ScheduleError::NegativeDelay {
                delay,
                now: self.now,
            });
        }

        let key = self.logical_now() + delay;
        self.queue.entry(key).or_default().push(task);
        self.len += 1;

        Ok(self.wall_frame(key))
    }

    /// Moves the clock forward one frame and returns every task now due,
    /// oldest logical frame first, FIFO inside a frame.
    pub fn advance(&mut self) -> Vec<T> {
        self.now += 1;
        let logical = self.logical_now();

        let later = self.queue.split_off(&(logical + 1));
        let due = std::mem::replace(&mut self.queue, later);

        let batch: Vec<T> = due.into_values().flatten().collect();
        self.len -= batch.len();
        batch
    }

    /// Freezes every outstanding task for `frames` additional frames.
    pub fn delay_all(&mut self, frames: u64) {
        self.lag += frames;
    }

    /// Wall frame of the next outstanding task, if any.
    pub fn next_due(&self) -> Option<Frame> {
        self.queue
            .keys()
            .next()
            .map(|&key| self.wall_frame(key))
    }

    /// Drops every outstanding task and rejects any further scheduling.
    pub fn tear_down(&mut self) {
        self.torn_down = true;
        self.queue.clear();
        self.len = 0;
    }

    fn wall_frame(&self, key: i64) -> Frame {
        let wall = key + self.lag as i64;
        Frame((wall.max(self.now.0 as i64 + 1)) as u64)
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until<T>(scheduler: &mut Scheduler<T>, frame: u64) -> Vec<(u64, T)> {
        let mut fired = Vec::new();
        while scheduler.now().0 < frame {
            let batch = scheduler.advance();
            let now = scheduler.now().0;
            fired.extend(batch.into_iter().map(|task| (now, task)));
        }
        fired
    }

    #[test]
    fn fires_in_frame_order_then_fifo() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(5, "b").unwrap();
        scheduler.schedule(2, "a").unwrap();
        scheduler.schedule(5, "c").unwrap();
        scheduler.schedule(5, "d").unwrap();

        let fired = run_until(&mut scheduler, 10);
        assert_eq!(fired, vec![(2, "a"), (5, "b"), (5, "c"), (5, "d")]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn rejects_negative_delay() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        let err = scheduler.schedule(-1, 7).unwrap_err();
        assert!(matches!(err, ScheduleError::NegativeDelay { delay: -1, .. }));
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn rejects_scheduling_after_tear_down() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(3, 1u32).unwrap();
        scheduler.tear_down();

        assert_eq!(scheduler.pending(), 0);
        assert!(matches!(
            scheduler.schedule(1, 2),
            Err(ScheduleError::TornDown { .. })
        ));
    }

    #[test]
    fn zero_delay_during_drain_runs_next_frame() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(1, 1u32).unwrap();

        let batch = scheduler.advance();
        assert_eq!(batch, vec![1]);
        // re-entrant schedule for the frame being drained
        scheduler.schedule(0, 2).unwrap();
        assert_eq!(scheduler.advance(), vec![2]);
        assert_eq!(scheduler.now(), Frame(2));
    }

    #[test]
    fn hitlag_shifts_outstanding_tasks() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(10, "late").unwrap();
        scheduler.schedule(4, "early").unwrap();

        run_until(&mut scheduler, 3);
        scheduler.delay_all(5);

        let fired = run_until(&mut scheduler, 20);
        assert_eq!(fired, vec![(9, "early"), (15, "late")]);
    }

    #[test]
    fn hitlag_is_cumulative_and_commutative() {
        let shifted = |freezes: &[u64]| {
            let mut scheduler = Scheduler::new();
            scheduler.schedule(6, ()).unwrap();
            run_until(&mut scheduler, 1);
            for &n in freezes {
                scheduler.delay_all(n);
            }
            run_until(&mut scheduler, 40)[0].0
        };

        assert_eq!(shifted(&[3, 7]), 16);
        assert_eq!(shifted(&[7, 3]), 16);
        assert_eq!(shifted(&[10]), 16);
    }

    #[test]
    fn tasks_scheduled_after_freeze_use_wall_clock() {
        let mut scheduler = Scheduler::new();
        run_until(&mut scheduler, 2);
        scheduler.delay_all(30);
        let expected = scheduler.schedule(4, ()).unwrap();

        assert_eq!(expected, Frame(6));
        assert_eq!(run_until(&mut scheduler, 10), vec![(6, ())]);
    }

    #[test]
    fn freeze_preserves_relative_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(3, 1).unwrap();
        scheduler.schedule(3, 2).unwrap();
        scheduler.schedule(4, 3).unwrap();
        scheduler.delay_all(2);

        let fired: Vec<_> = run_until(&mut scheduler, 10);
        assert_eq!(fired, vec![(5, 1), (5, 2), (6, 3)]);
    }

    #[test]
    fn next_due_reports_wall_frame() {
        let mut scheduler = Scheduler::new();
        assert_eq!(scheduler.next_due(), None);
        scheduler.schedule(8, ()).unwrap();
        scheduler.delay_all(2);
        assert_eq!(scheduler.next_due(), Some(Frame(10)));
    }
}
