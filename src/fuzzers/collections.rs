use std::iter;
use std::marker::PhantomData;

use data::*;
use fuzzers::core::*;

/// Continuation probability for the interleaved length protocol. The
/// target average length is `min + max/2` (note: not the midpoint of
/// the range, which biases toward longer collections).
fn keep_going_probability(min: usize, max: usize) -> f64 {
    let average = min as f64 + max as f64 / 2.0;
    1.0 - 1.0 / (1.0 + average)
}

/// See [`vecs`](fn.vecs.html).
#[derive(Debug, Clone)]
pub struct VecFuzzer<G> {
    inner: G,
    min: usize,
    max: usize,
}

/// Vectors with between `min` and `max` items (both inclusive;
/// reversed bounds are swapped). No length is drawn up front: each
/// element is preceded by a continuation draw, forced to 1 below the
/// minimum and to 0 at the maximum. The interleaving is what lets the
/// shrinker truncate a collection structurally: flipping any
/// continuation 1 to 0 deletes exactly that element and everything
/// after it.
pub fn vecs_of_length_between<G>(min: usize, max: usize, inner: G) -> VecFuzzer<G> {
    let (min, max) = if max < min { (max, min) } else { (min, max) };
    VecFuzzer {
        inner: inner,
        min: min,
        max: max,
    }
}

/// Vectors of exactly `n` items.
pub fn vecs_of_length<G>(n: usize, inner: G) -> VecFuzzer<G> {
    vecs_of_length_between(n, n, inner)
}

/// Vectors of up to 32 items given by `inner`.
pub fn vecs<G>(inner: G) -> VecFuzzer<G> {
    vecs_of_length_between(0, 32, inner)
}

impl<G: Fuzzer> Fuzzer for VecFuzzer<G> {
    type Item = Vec<G::Item>;
    fn generate(&self, prng: &mut Prng) -> Maybe<Vec<G::Item>> {
        let keep_going = keep_going_probability(self.min, self.max);
        let mut acc = Vec::new();
        loop {
            if acc.len() < self.min {
                prng.forced_choice(1)?;
                acc.push(self.inner.generate(prng)?);
                continue;
            }
            if acc.len() >= self.max {
                prng.forced_choice(0)?;
                return Ok(acc);
            }
            if prng.roll_dice(1, Distribution::Coin(keep_going))? == 1 {
                acc.push(self.inner.generate(prng)?);
            } else {
                return Ok(acc);
            }
        }
    }
}

/// See [`collections`](fn.collections.html).
#[derive(Debug, Clone)]
pub struct CollectionFuzzer<C, G> {
    witness: PhantomData<C>,
    inner: G,
    min: usize,
    max: usize,
}

/// A collection of the given type populated with up to 32 items from
/// the item fuzzer, using the same length protocol as
/// [`vecs`](fn.vecs.html). The bound is on *generated* items; for
/// collections with set semantics the final size may be smaller.
///
/// To generate values of `BTreeSet<i64>`:
///
/// ```rust,ignore
/// let gen = collections::<BTreeSet<_>, _>(ints());
/// ```
pub fn collections<C, G: Fuzzer>(inner: G) -> CollectionFuzzer<C, G>
where
    C: Default + Extend<G::Item>,
{
    CollectionFuzzer {
        witness: PhantomData,
        inner: inner,
        min: 0,
        max: 32,
    }
}

impl<C, G> CollectionFuzzer<C, G> {
    /// Adjust the generated-item bounds (inclusive; reversed bounds
    /// are swapped).
    pub fn length_between(mut self, min: usize, max: usize) -> Self {
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        self.min = min;
        self.max = max;
        self
    }
}

impl<C, G> Fuzzer for CollectionFuzzer<C, G>
where
    G: Fuzzer,
    C: Default + Extend<G::Item>,
{
    type Item = C;
    fn generate(&self, prng: &mut Prng) -> Maybe<C> {
        let keep_going = keep_going_probability(self.min, self.max);
        let mut coll: C = Default::default();
        let mut produced = 0;
        loop {
            if produced < self.min {
                prng.forced_choice(1)?;
                coll.extend(iter::once(self.inner.generate(prng)?));
                produced += 1;
                continue;
            }
            if produced >= self.max {
                prng.forced_choice(0)?;
                return Ok(coll);
            }
            if prng.roll_dice(1, Distribution::Coin(keep_going))? == 1 {
                coll.extend(iter::once(self.inner.generate(prng)?));
                produced += 1;
            } else {
                return Ok(coll);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuzzers::ints::uniform_int;
    use std::collections::BTreeSet;

    fn replay(draws: Vec<u32>) -> Prng {
        Prng::replay(Choices::of_vec(draws))
    }

    #[test]
    fn a_zero_continuation_ends_the_vector() {
        let gen = vecs(uniform_int(9));
        assert_eq!(gen.generate(&mut replay(vec![0])), Ok(vec![]));
        assert_eq!(gen.generate(&mut replay(vec![1, 5, 0])), Ok(vec![5]));
        assert_eq!(
            gen.generate(&mut replay(vec![1, 5, 1, 7, 0])),
            Ok(vec![5, 7])
        );
    }

    #[test]
    fn the_minimum_region_is_forced() {
        let gen = vecs_of_length_between(2, 4, uniform_int(9));
        assert_eq!(
            gen.generate(&mut replay(vec![1, 5, 1, 7, 0])),
            Ok(vec![5, 7])
        );
        // Below the minimum the continuation must be a forced 1.
        assert_eq!(
            gen.generate(&mut replay(vec![0])),
            Err(Rejection::ReplayMismatch)
        );
    }

    #[test]
    fn the_maximum_is_sealed_with_a_forced_zero() {
        let gen = vecs_of_length_between(0, 2, uniform_int(9));
        assert_eq!(
            gen.generate(&mut replay(vec![1, 5, 1, 7, 0])),
            Ok(vec![5, 7])
        );
        assert_eq!(
            gen.generate(&mut replay(vec![1, 5, 1, 7, 1])),
            Err(Rejection::ReplayMismatch)
        );
    }

    #[test]
    fn fixed_length_vectors_force_every_continuation() {
        let gen = vecs_of_length(3, uniform_int(9));
        assert_eq!(
            gen.generate(&mut replay(vec![1, 2, 1, 4, 1, 6, 0])),
            Ok(vec![2, 4, 6])
        );
    }

    #[test]
    fn generated_lengths_stay_within_bounds() {
        let gen = vecs_of_length_between(2, 5, uniform_int(9));
        for seed in 0..100 {
            let v = gen.generate(&mut Prng::live(seed)).expect("generated");
            assert!(v.len() >= 2 && v.len() <= 5, "length {}", v.len());
        }
        let gen = vecs(uniform_int(9));
        for seed in 0..100 {
            let v = gen.generate(&mut Prng::live(seed)).expect("generated");
            assert!(v.len() <= 32, "length {}", v.len());
        }
    }

    #[test]
    fn vecs_should_generate_same_output_given_same_input() {
        let gen = vecs(uniform_int(200));
        for seed in 0..20 {
            assert_eq!(
                gen.generate(&mut Prng::live(seed)),
                gen.generate(&mut Prng::live(seed))
            );
        }
    }

    #[test]
    fn collections_should_follow_the_same_protocol() {
        let gen = collections::<BTreeSet<_>, _>(uniform_int(9));
        assert_eq!(gen.generate(&mut replay(vec![0])), Ok(BTreeSet::new()));
        let set = gen
            .generate(&mut replay(vec![1, 5, 1, 5, 0]))
            .expect("generated");
        // Two generated items collapse into one set entry.
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![5]);
    }
}
