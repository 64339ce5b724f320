use data::*;
use fuzzers::core::*;

/// Size classes for the bucketed integer fuzzers, as `(weight, bits)`
/// pairs ordered by width. Small widths carry most of the weight, so
/// small integers are both the most likely outputs and the shortlex
/// smallest ones.
const INT_BUCKETS: [(u32, u32); 4] = [(4, 4), (8, 8), (2, 16), (1, 32)];

/// Largest magnitude the integer fuzzers deal in.
const MAGNITUDE_LIMIT: i64 = 0xffff_ffff;

/// One uniform draw in `[0, max]`.
pub fn uniform_int(max: u32) -> RollDice {
    roll_dice(max, Distribution::Uniform)
}

fn bits_max(bits: u32) -> u32 {
    ((1u64 << bits) - 1) as u32
}

/// Pick a bit width from a weighted bucket table, spending one choice.
fn pick_bucket(prng: &mut Prng, buckets: &[(u32, u32)]) -> Maybe<u32> {
    let total: u32 = buckets.iter().map(|&(weight, _)| weight).sum();
    let drawn = prng.roll_dice(total - 1, Distribution::Uniform)?;
    let mut acc = 0;
    for &(weight, bits) in buckets.iter() {
        acc += weight;
        if drawn < acc {
            return Ok(bits);
        }
    }
    Err(Rejection::internals(format!(
        "bucket draw {} walked off the table",
        drawn
    )))
}

/// Low bit is the sign (1 means negative), remaining bits the
/// magnitude: 0 decodes to 0, and shortlex-smaller draws decode to
/// integers nearer 0, positives just before negatives.
fn decode_signed(n: u32) -> i64 {
    let magnitude = i64::from(n >> 1);
    if n & 1 == 1 {
        -magnitude
    } else {
        magnitude
    }
}

/// See [`ints`](fn.ints.html).
#[derive(Debug, Clone, Copy)]
pub struct Ints;

/// Signed integers in `[-(2^31 - 1), 2^31 - 1]`, biased toward small
/// magnitudes: a weighted bucket draw picks a bit width, then that
/// many bits are drawn and split into sign and magnitude.
pub fn ints() -> Ints {
    Ints
}

impl Fuzzer for Ints {
    type Item = i64;
    fn generate(&self, prng: &mut Prng) -> Maybe<i64> {
        let bits = pick_bucket(prng, &INT_BUCKETS)?;
        let n = prng.roll_dice(bits_max(bits), Distribution::Uniform)?;
        Ok(decode_signed(n))
    }
}

/// A draw in `[0, upper]` that shrinks toward 0. Small ranges take one
/// uniform draw; larger ones draw a restricted bucket width and reduce
/// modulo the range size.
fn int_upto(prng: &mut Prng, upper: u32) -> Maybe<u32> {
    if upper <= 255 {
        return prng.roll_dice(upper, Distribution::Uniform);
    }
    let need = 32 - upper.leading_zeros();
    let max_bits = need.next_power_of_two();
    let fitting = INT_BUCKETS
        .iter()
        .take_while(|&&(_, bits)| bits <= max_bits)
        .count();
    let buckets = if fitting == 0 {
        &INT_BUCKETS[..1]
    } else {
        &INT_BUCKETS[..fitting]
    };
    let bits = pick_bucket(prng, buckets)?;
    let n = prng.roll_dice(bits_max(bits), Distribution::Uniform)?;
    // Widened to u64 so `upper + 1` cannot overflow when upper is
    // u32::MAX.
    Ok((u64::from(n) % (u64::from(upper) + 1)) as u32)
}

fn clamp_magnitude(v: i64) -> i64 {
    v.max(-MAGNITUDE_LIMIT).min(MAGNITUDE_LIMIT)
}

/// See [`int_range`](fn.int_range.html).
#[derive(Debug, Clone, Copy)]
pub struct IntRange {
    lo: i64,
    hi: i64,
}

/// Integers in `[lo, hi]`, both ends included, shrinking toward the
/// value nearest 0. Reversed bounds are swapped; magnitudes are capped
/// at 2^32 - 1. A range that straddles 0 splits into the positive
/// sub-range, the negative sub-range and a constant-0 shortcut at
/// weights 2:2:1, with the positive side first so mixed-sign failures
/// minimize to non-negative witnesses whenever they can.
pub fn int_range(lo: i64, hi: i64) -> IntRange {
    let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
    IntRange {
        lo: clamp_magnitude(lo),
        hi: clamp_magnitude(hi),
    }
}

impl Fuzzer for IntRange {
    type Item = i64;
    fn generate(&self, prng: &mut Prng) -> Maybe<i64> {
        let (lo, hi) = (self.lo, self.hi);
        if lo == hi {
            return Ok(lo);
        }
        if lo >= 0 {
            let v = int_upto(prng, (hi - lo) as u32)?;
            Ok(lo + i64::from(v))
        } else if hi <= 0 {
            let v = int_upto(prng, (hi - lo) as u32)?;
            Ok(hi - i64::from(v))
        } else {
            let branch = prng.roll_dice(4, Distribution::Uniform)?;
            if branch < 2 {
                Ok(i64::from(int_upto(prng, hi as u32)?))
            } else if branch < 4 {
                Ok(-i64::from(int_upto(prng, (-lo) as u32)?))
            } else {
                Ok(0)
            }
        }
    }
}

/// Integers from `n` up to the magnitude limit.
pub fn int_at_least(n: i64) -> IntRange {
    int_range(n, MAGNITUDE_LIMIT)
}

/// Integers from the negated magnitude limit up to `n`.
pub fn int_at_most(n: i64) -> IntRange {
    int_range(-MAGNITUDE_LIMIT, n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::{Choices, Prng, Rejection};

    fn replay(draws: Vec<u32>) -> Prng {
        Prng::replay(Choices::of_vec(draws))
    }

    #[test]
    fn ints_should_decode_sign_from_the_low_bit() {
        assert_eq!(ints().generate(&mut replay(vec![0, 0])), Ok(0));
        assert_eq!(ints().generate(&mut replay(vec![0, 1])), Ok(0));
        assert_eq!(ints().generate(&mut replay(vec![0, 2])), Ok(1));
        assert_eq!(ints().generate(&mut replay(vec![0, 3])), Ok(-1));
        assert_eq!(ints().generate(&mut replay(vec![0, 15])), Ok(-7));
    }

    #[test]
    fn ints_should_widen_with_the_bucket_draw() {
        // Draws 0..=3 pick 4 bits, 4..=11 pick 8, 12..=13 pick 16,
        // 14 picks 32.
        assert_eq!(ints().generate(&mut replay(vec![0, 16])), Err(Rejection::ReplayMismatch));
        assert_eq!(ints().generate(&mut replay(vec![4, 16])), Ok(8));
        assert_eq!(ints().generate(&mut replay(vec![12, 40000])), Ok(20000));
        assert_eq!(
            ints().generate(&mut replay(vec![14, 0xffff_ffff])),
            Ok(-(0x7fff_ffff))
        );
    }

    #[test]
    fn ints_should_be_deterministic_per_seed() {
        let a = ints().generate(&mut Prng::live(0));
        let b = ints().generate(&mut Prng::live(0));
        assert_eq!(a, b);
    }

    #[test]
    fn small_ranges_should_take_one_uniform_draw() {
        let gen = int_range(20, 50);
        assert_eq!(gen.generate(&mut replay(vec![0])), Ok(20));
        assert_eq!(gen.generate(&mut replay(vec![7])), Ok(27));
        assert_eq!(gen.generate(&mut replay(vec![30])), Ok(50));
        assert_eq!(
            gen.generate(&mut replay(vec![31])),
            Err(Rejection::ReplayMismatch)
        );
    }

    #[test]
    fn reversed_bounds_should_swap() {
        assert_eq!(int_range(50, 20).generate(&mut replay(vec![5])), Ok(25));
    }

    #[test]
    fn equal_bounds_should_consume_nothing() {
        let mut prng = Prng::live(0);
        assert_eq!(int_range(9, 9).generate(&mut prng), Ok(9));
        assert!(prng.into_run().is_empty());
    }

    #[test]
    fn negative_ranges_should_shrink_toward_the_upper_bound() {
        let gen = int_range(-50, -20);
        assert_eq!(gen.generate(&mut replay(vec![0])), Ok(-20));
        assert_eq!(gen.generate(&mut replay(vec![30])), Ok(-50));
    }

    #[test]
    fn straddling_ranges_should_branch_positive_negative_zero() {
        let gen = int_range(-5, 10);
        assert_eq!(gen.generate(&mut replay(vec![0, 7])), Ok(7));
        assert_eq!(gen.generate(&mut replay(vec![2, 3])), Ok(-3));
        assert_eq!(gen.generate(&mut replay(vec![4])), Ok(0));
        assert_eq!(
            gen.generate(&mut replay(vec![2, 6])),
            Err(Rejection::ReplayMismatch)
        );
    }

    #[test]
    fn wide_ranges_should_reduce_modulo_the_range_size() {
        let gen = int_range(0, 1000);
        assert_eq!(gen.generate(&mut replay(vec![0, 9])), Ok(9));
        assert_eq!(gen.generate(&mut replay(vec![12, 40000])), Ok(961));
    }

    #[test]
    fn ranges_should_contain_their_outputs() {
        let cases = [(-5i64, 10i64), (20, 50), (-900, -4), (0, 1_000_000), (-3, 3)];
        for &(lo, hi) in cases.iter() {
            let gen = int_range(lo, hi);
            for seed in 0..50 {
                let v = gen.generate(&mut Prng::live(seed)).expect("generated");
                assert!(lo <= v && v <= hi, "{} <= {} <= {}", lo, v, hi);
            }
        }
    }

    #[test]
    fn at_least_and_at_most_should_respect_their_bound() {
        for seed in 0..50 {
            let v = int_at_least(5).generate(&mut Prng::live(seed)).expect("generated");
            assert!(v >= 5);
            let v = int_at_most(-5).generate(&mut Prng::live(seed)).expect("generated");
            assert!(v <= -5);
        }
    }
}
