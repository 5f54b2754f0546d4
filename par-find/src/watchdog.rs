//! The monitor that cuts a thresholded search short.

use std::thread;
use std::time::Duration;

use log::trace;

use crate::context::SearchContext;

/// How the watchdog left its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Watch {
    /// The published total passed the threshold; the watchdog raised the
    /// cancellation signal.
    Tripped { seen: usize },
    /// Someone else raised the signal first.
    Released,
}

/// Poll `ctx` every `interval` until the workers' published total exceeds
/// `threshold` or the search is cancelled elsewhere.
///
/// Waits with [`thread::park_timeout`], so unparking the watchdog thread
/// after cancelling makes it exit without sitting out the interval.
pub fn watch(ctx: &SearchContext, threshold: usize, interval: Duration) -> Watch {
    loop {
        thread::park_timeout(interval);

        if ctx.is_cancelled() {
            trace!("watchdog released");
            return Watch::Released;
        }

        let seen = ctx.total();
        if seen > threshold {
            ctx.cancel();
            trace!("watchdog tripped: {seen} matches > {threshold}");
            return Watch::Tripped { seen };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Progress;

    const POLL: Duration = Duration::from_millis(1);

    #[test]
    fn test_trips_above_threshold() {
        let ctx = SearchContext::new(2);
        ctx.probe(0).publish(2);
        ctx.probe(1).publish(1);
        assert_eq!(watch(&ctx, 2, POLL), Watch::Tripped { seen: 3 });
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_zero_threshold_trips_on_first_match() {
        let ctx = SearchContext::new(4);
        ctx.probe(3).publish(1);
        assert_eq!(watch(&ctx, 0, POLL), Watch::Tripped { seen: 1 });
    }

    #[test]
    fn test_released_when_already_cancelled() {
        let ctx = SearchContext::new(1);
        ctx.probe(0).publish(10);
        ctx.cancel();
        assert_eq!(watch(&ctx, 0, POLL), Watch::Released);
    }

    #[test]
    fn test_keeps_waiting_at_threshold() {
        let ctx = SearchContext::new(1);
        ctx.probe(0).publish(5);

        let outcome = thread::scope(|s| {
            let handle = s.spawn(|| watch(&ctx, 5, POLL));
            thread::sleep(Duration::from_millis(20));
            assert!(!ctx.is_cancelled());
            ctx.cancel();
            handle.thread().unpark();
            handle.join().unwrap()
        });
        assert_eq!(outcome, Watch::Released);
    }

    #[test]
    fn test_unpark_cuts_interval_short() {
        let ctx = SearchContext::new(1);
        let started = std::time::Instant::now();

        thread::scope(|s| {
            let handle = s.spawn(|| watch(&ctx, 0, Duration::from_secs(30)));
            ctx.cancel();
            handle.thread().unpark();
            assert_eq!(handle.join().unwrap(), Watch::Released);
        });
        assert!(started.elapsed() < Duration::from_secs(30));
    }
}
