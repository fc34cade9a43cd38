/// Bounded retry: attempt, wait, attempt again until satisfied, told to stop,
/// out of attempts or out of time
use serde::{Deserialize, Serialize};
use std::future::Future;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Offsets from the start, in ms, of the early attempts. An attempt at 0 is
    /// always made first.
    pub ladder_ms: Vec<u32>,
    /// Spacing of the attempts after the ladder; 0 disables that phase
    pub interval_ms: u32,
    pub max_attempts: u32,
    pub timeout_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    Satisfied { attempts: u32 },
    Abandoned { attempts: u32 },
    Exhausted { attempts: u32 },
}

impl RetryPolicy {
    /// Evenly spaced attempts, the first one immediate
    pub fn interval(interval_ms: u32, max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            ladder_ms: Vec::new(),
            interval_ms,
            max_attempts,
            timeout_ms: interval_ms.saturating_mul(max_attempts),
        }
    }

    /// Offsets (ms since start) of every attempt this policy allows
    pub fn offsets(&self) -> Vec<u32> {
        let max = self.max_attempts as usize;
        let mut offsets = vec![0u32];

        for &offset in &self.ladder_ms {
            let last = *offsets.last().unwrap_or(&0);
            if offset > last && offset <= self.timeout_ms {
                offsets.push(offset);
            }
        }

        if self.interval_ms > 0 {
            let mut next = offsets.last().unwrap_or(&0).saturating_add(self.interval_ms);
            while next <= self.timeout_ms && offsets.len() < max {
                offsets.push(next);
                next = next.saturating_add(self.interval_ms);
            }
        }

        offsets.truncate(max);
        offsets
    }
}

/// Drive `attempt` on the schedule of `policy`.
///
/// `sleep(ms)` waits between attempts, `stop()` is checked after every wait and
/// abandons the loop, `attempt(n)` returns true once its condition holds.
pub async fn retry_until<Sl, Fut, St, At>(
    policy: &RetryPolicy,
    mut sleep: Sl,
    mut stop: St,
    mut attempt: At,
) -> RetryOutcome
where
    Sl: FnMut(u32) -> Fut,
    Fut: Future<Output = ()>,
    St: FnMut() -> bool,
    At: FnMut(u32) -> bool,
{
    let mut elapsed = 0u32;
    let mut attempts = 0u32;

    for offset in policy.offsets() {
        if offset > elapsed {
            sleep(offset - elapsed).await;
            elapsed = offset;
        }
        if stop() {
            return RetryOutcome::Abandoned { attempts };
        }
        attempts += 1;
        if attempt(attempts) {
            return RetryOutcome::Satisfied { attempts };
        }
    }

    RetryOutcome::Exhausted { attempts }
}

/// Timer-backed sleep for `retry_until` in the browser
pub fn browser_sleep(ms: u32) -> gloo_timers::future::TimeoutFuture {
    gloo_timers::future::TimeoutFuture::new(ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use std::future::ready;

    fn ladder_policy() -> RetryPolicy {
        RetryPolicy {
            ladder_ms: vec![200, 500, 800],
            interval_ms: 1000,
            max_attempts: 6,
            timeout_ms: 10_000,
        }
    }

    #[test]
    fn test_offsets_ladder_then_interval() {
        assert_eq!(ladder_policy().offsets(), vec![0, 200, 500, 800, 1800, 2800]);
    }

    #[test]
    fn test_offsets_capped_by_timeout() {
        let policy = RetryPolicy {
            ladder_ms: vec![200, 500],
            interval_ms: 1000,
            max_attempts: 100,
            timeout_ms: 2600,
        };

        assert_eq!(policy.offsets(), vec![0, 200, 500, 1500, 2500]);
    }

    #[test]
    fn test_offsets_skip_unordered_ladder_entries() {
        let policy = RetryPolicy {
            ladder_ms: vec![500, 300, 500, 900],
            interval_ms: 0,
            max_attempts: 10,
            timeout_ms: 1000,
        };

        assert_eq!(policy.offsets(), vec![0, 500, 900]);
    }

    #[test]
    fn test_interval_policy() {
        assert_eq!(RetryPolicy::interval(1000, 3).offsets(), vec![0, 1000, 2000]);
        assert!(RetryPolicy::interval(1000, 0).offsets().is_empty());
    }

    #[test]
    fn test_retry_until_satisfied() {
        let sleeps = RefCell::new(Vec::new());

        let outcome = block_on(retry_until(
            &ladder_policy(),
            |ms| {
                sleeps.borrow_mut().push(ms);
                ready(())
            },
            || false,
            |n| n == 3,
        ));

        assert_eq!(outcome, RetryOutcome::Satisfied { attempts: 3 });
        assert_eq!(*sleeps.borrow(), vec![200, 300]);
    }

    #[test]
    fn test_retry_until_exhausted() {
        let sleeps = RefCell::new(Vec::new());

        let outcome = block_on(retry_until(
            &ladder_policy(),
            |ms| {
                sleeps.borrow_mut().push(ms);
                ready(())
            },
            || false,
            |_| false,
        ));

        assert_eq!(outcome, RetryOutcome::Exhausted { attempts: 6 });
        assert_eq!(*sleeps.borrow(), vec![200, 300, 300, 1000, 1000]);
    }

    #[test]
    fn test_retry_until_abandoned_by_stop() {
        let calls = RefCell::new(0);

        let outcome = block_on(retry_until(
            &ladder_policy(),
            |_| ready(()),
            || *calls.borrow() >= 2,
            |_| {
                *calls.borrow_mut() += 1;
                false
            },
        ));

        assert_eq!(outcome, RetryOutcome::Abandoned { attempts: 2 });
    }

    #[test]
    fn test_retry_until_immediate_success_never_sleeps() {
        let sleeps = RefCell::new(0);

        let outcome = block_on(retry_until(
            &ladder_policy(),
            |_| {
                *sleeps.borrow_mut() += 1;
                ready(())
            },
            || false,
            |_| true,
        ));

        assert_eq!(outcome, RetryOutcome::Satisfied { attempts: 1 });
        assert_eq!(*sleeps.borrow(), 0);
    }
}
