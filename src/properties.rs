use std::fmt;
use std::panic;

use data::*;
use fuzzers::*;

const NUM_TESTS: usize = 100;
const MAX_REJECTS: usize = NUM_TESTS * 10;

/// This represents a configuration for a particular test, ie: a fuzzer
/// and a (currently fixed) set of test parameters.
pub struct Property<F> {
    fuzzer: F,
}

/// This represents something that a check can return.
pub trait CheckResult {
    /// Check whether this result witnesses a failure.
    fn is_failure(&self) -> bool;
}

/// This is the main entry point for users of the library.
pub fn property<F>(fuzzer: F) -> Property<F> {
    Property { fuzzer: fuzzer }
}

impl<F: Fuzzer> Property<F>
where
    F::Item: fmt::Debug,
{
    /// Use this function to specify the thing you wish to check. Runs
    /// the subject against freshly generated inputs; on the first
    /// failure, minimizes the recorded run and panics with the
    /// smallest witness found.
    pub fn check<R: CheckResult + fmt::Debug, C: Fn(F::Item) -> R>(self, subject: C) {
        let mut tests_run = 0usize;
        let mut rejected = 0usize;
        let mut seed = 0u32;
        while tests_run < NUM_TESTS {
            let mut prng = Prng::live(seed);
            seed = seed.wrapping_add(1);
            trace!("Tests run: {}; rejected: {}", tests_run, rejected);
            match self.fuzzer.generate(&mut prng) {
                Ok(arg) => {
                    let res = Self::attempt(&subject, arg);
                    tests_run += 1;
                    if res.is_failure() {
                        let minimal = find_minimal(&self.fuzzer, prng.into_run(), |v| {
                            Self::attempt(&subject, v).is_failure()
                        });
                        let witness = self.fuzzer.generate(&mut Prng::replay(minimal));
                        panic!(
                            "Predicate failed for argument {:?}; check returned {:?}",
                            witness, res
                        )
                    }
                }
                Err(reason) => {
                    debug!("Rejected run: {}", reason);
                    rejected += 1;
                    if rejected >= MAX_REJECTS {
                        panic!(
                            "Could not finish on {}/{} tests (rejected {} runs; last reason: {})",
                            tests_run, NUM_TESTS, rejected, reason
                        );
                    }
                }
            }
        }
        trace!("Completing okay");
    }

    fn attempt<R: CheckResult, C: Fn(F::Item) -> R>(subject: &C, arg: F::Item) -> Result<R, String> {
        let res = panic::catch_unwind(panic::AssertUnwindSafe(|| subject(arg)));
        match res {
            Ok(r) => Ok(r),
            Err(err) => {
                let msg = if let Some(s) = err.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = err.downcast_ref::<String>() {
                    s.to_string()
                } else {
                    format!("Unrecognised panic result: {:?}", err)
                };
                Err(msg)
            }
        }
    }
}

impl CheckResult for bool {
    fn is_failure(&self) -> bool {
        !self
    }
}

impl<O: CheckResult, E> CheckResult for Result<O, E> {
    fn is_failure(&self) -> bool {
        self.as_ref().map(|r| r.is_failure()).unwrap_or(true)
    }
}

impl CheckResult for () {
    fn is_failure(&self) -> bool {
        false
    }
}
