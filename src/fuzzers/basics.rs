use std::cmp::Ordering;

use data::*;
use fuzzers::core::*;
use fuzzers::frequency::{one_of_values, IntFrequency};

/// `false` or `true`, uniformly; `false` is the shrink target.
pub fn booleans() -> IntFrequency<bool> {
    one_of_values(vec![false, true])
}

/// See [`weighted_bool`](fn.weighted_bool.html).
#[derive(Debug, Clone, Copy)]
pub struct WeightedBool {
    p: f64,
}

/// `true` with probability `p` (clamped into `[0, 1]`; NaN counts as
/// 0). At the extremes no randomness is involved and the outcome is
/// recorded as a forced choice.
pub fn weighted_bool(p: f64) -> WeightedBool {
    let p = if p.is_nan() { 0.0 } else { p.max(0.0).min(1.0) };
    WeightedBool { p: p }
}

impl Fuzzer for WeightedBool {
    type Item = bool;
    fn generate(&self, prng: &mut Prng) -> Maybe<bool> {
        if self.p <= 0.0 {
            prng.forced_choice(0).map(|_| false)
        } else if self.p >= 1.0 {
            prng.forced_choice(1).map(|_| true)
        } else {
            let v = prng.roll_dice(1, Distribution::Coin(self.p))?;
            Ok(v == 1)
        }
    }
}

/// `Less`, `Equal` or `Greater`, in that shrink order.
pub fn orderings() -> IntFrequency<Ordering> {
    one_of_values(vec![Ordering::Less, Ordering::Equal, Ordering::Greater])
}

/// The unit value, consuming no choices.
pub fn units() -> Const<()> {
    consts(())
}

/// `None` a quarter of the time, `Some` of the inner fuzzer otherwise;
/// `None` is the shrink target.
pub fn options<G>(inner: G) -> IntFrequency<Option<G::Item>>
where
    G: Fuzzer + 'static,
    G::Item: 'static,
{
    IntFrequency::named(
        "fuzzers::options",
        vec![
            (1, units().map(|_| None).boxed()),
            (3, inner.map(|v| Some(v)).boxed()),
        ],
    )
}

/// `Err` of the first fuzzer a quarter of the time, `Ok` of the second
/// otherwise; `Err` is the shrink target.
pub fn results<E, O>(err: E, ok: O) -> IntFrequency<Result<O::Item, E::Item>>
where
    E: Fuzzer + 'static,
    O: Fuzzer + 'static,
    E::Item: 'static,
    O::Item: 'static,
{
    IntFrequency::named(
        "fuzzers::results",
        vec![
            (1, err.map(|e| Err(e)).boxed()),
            (3, ok.map(|v| Ok(v)).boxed()),
        ],
    )
}
