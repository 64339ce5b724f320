use data::*;
use fuzzers::core::*;
use fuzzers::float_codec::*;
use fuzzers::frequency::IntFrequency;

/// See [`nice_floats`](fn.nice_floats.html).
#[derive(Debug, Clone, Copy)]
pub struct NiceFloats;

/// Finite floats decoded from two 32-bit draws plus a sign draw via
/// the [well-shrinking codec](fn.well_shrinking_float.html): never NaN
/// or infinite, and minimizing toward 0.0, small integers, then simple
/// fractions.
pub fn nice_floats() -> NiceFloats {
    NiceFloats
}

impl Fuzzer for NiceFloats {
    type Item = f64;
    fn generate(&self, prng: &mut Prng) -> Maybe<f64> {
        let hi = prng.roll_dice(::std::u32::MAX, Distribution::Uniform)?;
        let lo = prng.roll_dice(::std::u32::MAX, Distribution::Uniform)?;
        let negate = prng.roll_dice(1, Distribution::Uniform)?;
        let f = well_shrinking_float(hi, lo);
        Ok(if negate == 1 { -f } else { f })
    }
}

/// The non-negative half of [`nice_floats`](fn.nice_floats.html): two
/// draws, no sign. Used to build the bounded float fuzzers.
#[derive(Debug, Clone, Copy)]
struct NonNegFloats;

impl Fuzzer for NonNegFloats {
    type Item = f64;
    fn generate(&self, prng: &mut Prng) -> Maybe<f64> {
        let hi = prng.roll_dice(::std::u32::MAX, Distribution::Uniform)?;
        let lo = prng.roll_dice(::std::u32::MAX, Distribution::Uniform)?;
        Ok(well_shrinking_float(hi, lo))
    }
}

/// Arbitrary floats, special values included: 0.0 and
/// [`nice_floats`](fn.nice_floats.html) carry most of the weight, with
/// +Inf, -Inf and NaN each drawn occasionally.
pub fn floats() -> IntFrequency<f64> {
    IntFrequency::named(
        "fuzzers::floats",
        vec![
            (1, consts(0.0).boxed()),
            (5, nice_floats().boxed()),
            (1, consts(::std::f64::INFINITY).boxed()),
            (1, consts(::std::f64::NEG_INFINITY).boxed()),
            (1, consts(::std::f64::NAN).boxed()),
        ],
    )
}

/// See [`percentages`](fn.percentages.html).
#[derive(Debug, Clone, Copy)]
struct FractionalFloats;

impl Fuzzer for FractionalFloats {
    type Item = f64;
    fn generate(&self, prng: &mut Prng) -> Maybe<f64> {
        let hi = prng.roll_dice(0xf_ffff, Distribution::Uniform)?;
        let lo = prng.roll_dice(::std::u32::MAX, Distribution::Uniform)?;
        Ok(fractional_float(hi, lo))
    }
}

/// Floats in `[0, 1)`, endpoints favoured: 0.0 first (the shrink
/// target), the maximal fractional value next, then mantissa-packed
/// values from 52 fresh bits.
pub fn percentages() -> IntFrequency<f64> {
    IntFrequency::named(
        "fuzzers::percentages",
        vec![
            (1, consts(0.0).boxed()),
            (1, consts(max_fractional_float()).boxed()),
            (4, FractionalFloats.boxed()),
        ],
    )
}

/// A [`percentages`](fn.percentages.html) draw scaled into
/// `[lo, hi)`. Scaling loses the codec's niceness: values here do not
/// shrink to integers or simple fractions, only toward `lo`, so this
/// is used only where that is acceptable.
pub fn scaled_float(lo: f64, hi: f64) -> impl Fuzzer<Item = f64> {
    percentages().map(move |p| p * (hi - lo) + lo)
}

fn nonneg_float_range(lo: f64, hi: f64) -> IntFrequency<f64> {
    IntFrequency::named(
        "fuzzers::float_range",
        vec![
            (1, consts(lo).boxed()),
            (1, consts(hi).boxed()),
            (4, scaled_float(lo, hi).boxed()),
        ],
    )
}

/// Floats in `[lo, hi]`, both endpoints reachable, shrinking toward
/// the value nearest 0. Reversed bounds are swapped; NaN bounds reject
/// the run. A range that straddles 0 splits into the positive
/// sub-range, the negative sub-range and a constant-0 shortcut at
/// weights 2:2:1, positive side first.
pub fn float_range(lo: f64, hi: f64) -> BoxedFuzzer<f64> {
    if lo.is_nan() || hi.is_nan() {
        return invalid::<f64>("fuzzers::float_range: bounds must not be NaN").boxed();
    }
    let (lo, hi) = if hi < lo { (hi, lo) } else { (lo, hi) };
    if lo == hi {
        consts(lo).boxed()
    } else if lo >= 0.0 {
        nonneg_float_range(lo, hi).boxed()
    } else if hi <= 0.0 {
        nonneg_float_range(-hi, -lo).map(|f| -f).boxed()
    } else {
        IntFrequency::named(
            "fuzzers::float_range",
            vec![
                (2, nonneg_float_range(0.0, hi).boxed()),
                (2, nonneg_float_range(0.0, -lo).map(|f| -f).boxed()),
                (1, consts(0.0).boxed()),
            ],
        ).boxed()
    }
}

/// Floats from `n` upward, shrinking toward `max(n, 0)`.
pub fn float_at_least(n: f64) -> BoxedFuzzer<f64> {
    if n.is_nan() {
        return invalid::<f64>("fuzzers::float_at_least: bound must not be NaN").boxed();
    }
    if n <= 0.0 {
        IntFrequency::named(
            "fuzzers::float_at_least",
            vec![(2, NonNegFloats.boxed()), (1, float_range(n, 0.0))],
        ).boxed()
    } else {
        IntFrequency::named(
            "fuzzers::float_at_least",
            vec![
                (1, consts(n).boxed()),
                (4, NonNegFloats
                    .map(move |f| {
                        let shifted = n + f;
                        if shifted.is_finite() {
                            shifted
                        } else {
                            ::std::f64::MAX
                        }
                    })
                    .boxed()),
            ],
        ).boxed()
    }
}

/// Floats from `n` downward, shrinking toward `min(n, 0)`.
pub fn float_at_most(n: f64) -> BoxedFuzzer<f64> {
    if n.is_nan() {
        return invalid::<f64>("fuzzers::float_at_most: bound must not be NaN").boxed();
    }
    float_at_least(-n).map(|f| -f).boxed()
}
