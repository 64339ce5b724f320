use std::marker::PhantomData;

use data::*;
use fuzzers::collections::vecs_of_length;

/// How many candidates [`filter`](trait.Fuzzer.html#method.filter) and
/// [`filter_map`](trait.Fuzzer.html#method.filter_map) will draw before
/// declaring the run unusable.
const MAX_FILTER_TRIES: usize = 16;

/// A reproducible generator of values: a pure function from a
/// [`Prng`](../data/enum.Prng.html) to a generated value or a
/// [`Rejection`](../data/enum.Rejection.html).
///
/// Fuzzers are built once and never mutated; all run state flows
/// through the `Prng`.
pub trait Fuzzer {
    type Item;
    fn generate(&self, prng: &mut Prng) -> Maybe<Self::Item>;

    /// Apply a function to every generated value.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> U,
    {
        Map(self, f)
    }

    /// Generate a value, then run the fuzzer built from it. The
    /// continuation's draws immediately follow this fuzzer's draws in
    /// the recorded run.
    fn and_then<G, F>(self, f: F) -> AndThen<Self, F>
    where
        Self: Sized,
        G: Fuzzer,
        F: Fn(Self::Item) -> G,
    {
        AndThen(self, f)
    }

    /// Discard values that fail the predicate, retrying with fresh
    /// draws. After 16 fruitless candidates the whole run is rejected,
    /// so prefer `map` onto a narrower domain over `filter` whenever
    /// the domain can be expressed directly.
    fn filter<F>(self, pred: F) -> Filtered<Self, F>
    where
        Self: Sized,
        F: Fn(&Self::Item) -> bool,
    {
        Filtered(self, pred)
    }

    /// `map` and `filter` in one step: `None` results are retried on
    /// the same budget as [`filter`](#method.filter).
    fn filter_map<U, F>(self, f: F) -> FilterMapped<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> Option<U>,
    {
        FilterMapped(self, f)
    }

    fn boxed(self) -> BoxedFuzzer<Self::Item>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

pub type BoxedFuzzer<T> = Box<dyn Fuzzer<Item = T>>;

impl<'a, F: Fuzzer + ?Sized> Fuzzer for &'a F {
    type Item = F::Item;
    fn generate(&self, prng: &mut Prng) -> Maybe<Self::Item> {
        (**self).generate(prng)
    }
}

impl<F: Fuzzer + ?Sized> Fuzzer for Box<F> {
    type Item = F::Item;
    fn generate(&self, prng: &mut Prng) -> Maybe<Self::Item> {
        (**self).generate(prng)
    }
}

/// See [`roll_dice`](fn.roll_dice.html).
#[derive(Debug, Clone, Copy)]
pub struct RollDice {
    max: u32,
    dist: Distribution,
}

/// The sole randomness primitive: one draw in `[0, max]`, recorded in
/// the run. Every other fuzzer decodes its values from draws made
/// here, which is what makes the recorded run the unit of shrinking.
pub fn roll_dice(max: u32, dist: Distribution) -> RollDice {
    RollDice {
        max: max,
        dist: dist,
    }
}

impl Fuzzer for RollDice {
    type Item = u32;
    fn generate(&self, prng: &mut Prng) -> Maybe<u32> {
        prng.roll_dice(self.max, self.dist)
    }
}

/// See [`forced_choice`](fn.forced_choice.html).
#[derive(Debug, Clone, Copy)]
pub struct ForcedChoice(u32);

/// Records exactly `n` with no randomness; a replayed run must agree.
pub fn forced_choice(n: u32) -> ForcedChoice {
    ForcedChoice(n)
}

impl Fuzzer for ForcedChoice {
    type Item = u32;
    fn generate(&self, prng: &mut Prng) -> Maybe<u32> {
        prng.forced_choice(self.0)
    }
}

/// See [`consts`](fn.consts.html).
#[derive(Debug, Clone)]
pub struct Const<V>(V);

/// Always generates `val`, consuming no choices.
pub fn consts<V>(val: V) -> Const<V> {
    Const(val)
}

impl<V: Clone> Fuzzer for Const<V> {
    type Item = V;
    fn generate(&self, _: &mut Prng) -> Maybe<V> {
        Ok(self.0.clone())
    }
}

/// See [`invalid`](fn.invalid.html).
#[derive(Debug)]
pub struct Invalid<T> {
    reason: String,
    witness: PhantomData<fn() -> T>,
}

/// A fuzzer that rejects every run with the given reason, verbatim.
/// It never writes to the run. This is the error channel for fuzzers
/// whose construction arguments turn out to be unusable.
pub fn invalid<T>(reason: &str) -> Invalid<T> {
    Invalid {
        reason: reason.to_owned(),
        witness: PhantomData,
    }
}

impl<T> Fuzzer for Invalid<T> {
    type Item = T;
    fn generate(&self, _: &mut Prng) -> Maybe<T> {
        Err(Rejection::invalid(self.reason.clone()))
    }
}

pub struct Map<G, F>(G, F);

impl<G: Fuzzer, U, F: Fn(G::Item) -> U> Fuzzer for Map<G, F> {
    type Item = U;
    fn generate(&self, prng: &mut Prng) -> Maybe<U> {
        let val = self.0.generate(prng)?;
        Ok((self.1)(val))
    }
}

pub struct AndThen<G, F>(G, F);

impl<G: Fuzzer, H: Fuzzer, F: Fn(G::Item) -> H> Fuzzer for AndThen<G, F> {
    type Item = H::Item;
    fn generate(&self, prng: &mut Prng) -> Maybe<H::Item> {
        let val = self.0.generate(prng)?;
        (self.1)(val).generate(prng)
    }
}

pub struct Filtered<G, F>(G, F);

impl<G: Fuzzer, F: Fn(&G::Item) -> bool> Fuzzer for Filtered<G, F> {
    type Item = G::Item;
    fn generate(&self, prng: &mut Prng) -> Maybe<G::Item> {
        for _ in 0..MAX_FILTER_TRIES {
            let val = self.0.generate(prng)?;
            if (self.1)(&val) {
                return Ok(val);
            }
        }
        Err(Rejection::invalid(format!(
            "too many filtered values: no candidate passed in {} tries",
            MAX_FILTER_TRIES
        )))
    }
}

pub struct FilterMapped<G, F>(G, F);

impl<G: Fuzzer, U, F: Fn(G::Item) -> Option<U>> Fuzzer for FilterMapped<G, F> {
    type Item = U;
    fn generate(&self, prng: &mut Prng) -> Maybe<U> {
        for _ in 0..MAX_FILTER_TRIES {
            let val = self.0.generate(prng)?;
            if let Some(out) = (self.1)(val) {
                return Ok(out);
            }
        }
        Err(Rejection::invalid(format!(
            "too many filtered values: no candidate passed in {} tries",
            MAX_FILTER_TRIES
        )))
    }
}

/// See [`lazy`](fn.lazy.html).
pub struct Lazy<F>(F);

/// Defers construction of the inner fuzzer until generation time.
/// Recursive fuzzers are written by parameterizing construction on a
/// decreasing depth and tying the knot with `lazy`:
///
/// ```rust,ignore
/// fn trees(depth: usize) -> BoxedFuzzer<Tree> {
///     if depth == 0 {
///         leaves().boxed()
///     } else {
///         one_of(vec![
///             leaves().boxed(),
///             lazy(move || branches(depth - 1)).boxed(),
///         ]).boxed()
///     }
/// }
/// ```
pub fn lazy<G: Fuzzer, F: Fn() -> G>(f: F) -> Lazy<F> {
    Lazy(f)
}

impl<G: Fuzzer, F: Fn() -> G> Fuzzer for Lazy<F> {
    type Item = G::Item;
    fn generate(&self, prng: &mut Prng) -> Maybe<G::Item> {
        (self.0)().generate(prng)
    }
}

/// One-shot evaluation of a fuzzer against a PRNG.
pub fn generate<F: Fuzzer>(prng: &mut Prng, fuzzer: &F) -> Maybe<F::Item> {
    fuzzer.generate(prng)
}

/// Generate `n` sample values from the fuzzer, deterministically
/// (seed 0). A rejected run is returned as the error value.
pub fn examples<F: Fuzzer>(n: usize, fuzzer: F) -> Maybe<Vec<F::Item>> {
    let mut prng = Prng::live(0);
    vecs_of_length(n, fuzzer).generate(&mut prng)
}

/// Find the smallest recorded run such that the value it decodes to
/// still satisfies `check` (conventionally: still fails the property
/// under test). Candidates that fail to replay are skipped. Returns
/// the original run when nothing smaller works.
pub fn find_minimal<F, C>(fuzzer: &F, run: Choices, check: C) -> Choices
where
    F: Fuzzer,
    C: Fn(F::Item) -> bool,
{
    let minimized = {
        let mut still_failing = |candidate: &Choices| {
            let mut prng = Prng::replay(candidate.clone());
            fuzzer
                .generate(&mut prng)
                .map(|val| check(val))
                .unwrap_or(false)
        };
        minimize(&run, &mut still_failing)
    };
    minimized.unwrap_or(run)
}

/// Minimize a failing run and decode its witness: returns the smallest
/// run for which `still_failing` holds together with the value it
/// generates.
pub fn shrink<F, C>(initial: &Choices, fuzzer: &F, still_failing: C) -> Maybe<(Choices, F::Item)>
where
    F: Fuzzer,
    C: Fn(F::Item) -> bool,
{
    let minimal = find_minimal(fuzzer, initial.clone(), still_failing);
    let mut prng = Prng::replay(minimal.clone());
    let value = fuzzer.generate(&mut prng)?;
    Ok((minimal, value))
}
