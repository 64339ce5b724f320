use std::cmp::Ordering;
use std::fmt;

use hex_slice::AsHex;
use rand::{Rng, SeedableRng, XorShiftRng};

/// Upper bound on the number of choices a single run may record.
/// A fuzzer that asks for more than this rejects the run.
pub const RUN_MAX: usize = 16384;

/// The result of asking a fuzzer for a value.
pub type Maybe<T> = Result<T, Rejection>;

/// The reasons why a run can fail to produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The run already holds [`RUN_MAX`](constant.RUN_MAX.html) choices.
    RunFull,
    /// A replayed run could not supply the requested draw: the
    /// recording ran out, held a value above the requested maximum, or
    /// disagreed with a forced choice.
    ReplayMismatch,
    /// A fuzzer declared the whole run unusable, with a reason that is
    /// surfaced verbatim to the caller.
    Invalid(String),
}

impl Rejection {
    pub fn invalid<S: Into<String>>(reason: S) -> Rejection {
        Rejection::Invalid(reason.into())
    }

    /// A rejection for conditions that indicate a bug in this library
    /// rather than in the caller's fuzzers.
    pub fn internals<S: fmt::Display>(detail: S) -> Rejection {
        Rejection::Invalid(format!("internals: {}", detail))
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Rejection::RunFull => write!(fmt, "too much data: the run is full"),
            Rejection::ReplayMismatch => write!(fmt, "replay mismatch"),
            Rejection::Invalid(ref reason) => write!(fmt, "{}", reason),
        }
    }
}

/// The recorded draws of one fuzzer run, in the order they were made.
///
/// Sequences are totally ordered shortlex: a strictly shorter sequence
/// is smaller, and equal lengths compare element-wise. Every primitive
/// fuzzer decodes smaller choices into simpler values, so this
/// ordering is the only notion of "simpler" the shrinker needs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Choices {
    pub(in data) data: Vec<u32>,
}

impl Choices {
    pub fn new() -> Self {
        Choices { data: Vec::new() }
    }

    /// Create a `Choices` with a given vector of draws. (Mostly used
    /// for testing and for replaying shrunk candidates.)
    pub fn of_vec(data: Vec<u32>) -> Self {
        Choices { data: data }
    }

    /// Allows access to the underlying buffer.
    pub fn buffer(&self) -> &[u32] {
        &*self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for Choices {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("Choices")
            .field("data", &format_args!("{:x}", self.data.as_hex()))
            .finish()
    }
}

impl PartialOrd for Choices {
    fn partial_cmp(&self, other: &Choices) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Choices {
    fn cmp(&self, other: &Choices) -> Ordering {
        self.data
            .len()
            .cmp(&other.data.len())
            .then_with(|| self.data.cmp(&other.data))
    }
}

/// How a live draw distributes over `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// Every value equally likely.
    Uniform,
    /// Two-outcome draw: 1 with the given probability, else 0. Only
    /// meaningful with `max == 1`.
    Coin(f64),
}

const TWO_POW_32: f64 = 4294967296.0;

fn mix(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x85eb_ca6b);
    x ^= x >> 13;
    x = x.wrapping_mul(0xc2b2_ae35);
    x ^= x >> 16;
    x
}

/// A deterministic stream of draws, seeded from a single 32-bit
/// integer. Equal seeds give bit-identical streams; the state advances
/// on every draw.
pub struct RandomSource {
    rng: XorShiftRng,
}

impl RandomSource {
    pub fn new(seed: u32) -> Self {
        let mut words = [0u32; 4];
        let mut acc = seed;
        for word in words.iter_mut() {
            acc = mix(acc.wrapping_add(0x9e37_79b9));
            *word = acc;
        }
        if words == [0; 4] {
            // XorShiftRng cannot hold the all-zero state.
            words[3] = 0x9e37_79b9;
        }
        RandomSource {
            rng: XorShiftRng::from_seed(words),
        }
    }

    /// Uniform draw in `[0, max]`, by scaling one 32-bit word.
    fn below(&mut self, max: u32) -> u32 {
        let word = u64::from(self.rng.next_u32());
        ((word * (u64::from(max) + 1)) >> 32) as u32
    }

    /// 1 with probability `p`, else 0.
    fn coin(&mut self, p: f64) -> u32 {
        let x = f64::from(self.rng.next_u32()) / TWO_POW_32;
        if x < p {
            1
        } else {
            0
        }
    }
}

impl fmt::Debug for RandomSource {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("RandomSource").finish()
    }
}

/// The state a fuzzer draws against. A `Live` run samples its
/// [`RandomSource`](struct.RandomSource.html) and records every draw;
/// a `Replay` run consumes a previous recording front-to-back and
/// involves no randomness at all.
#[derive(Debug)]
pub enum Prng {
    Live {
        source: RandomSource,
        run: Choices,
    },
    Replay {
        remaining: Choices,
        off: usize,
    },
}

impl Prng {
    pub fn live(seed: u32) -> Prng {
        Prng::Live {
            source: RandomSource::new(seed),
            run: Choices::new(),
        }
    }

    pub fn replay(run: Choices) -> Prng {
        Prng::Replay {
            remaining: run,
            off: 0,
        }
    }

    /// Draw one integer in `[0, max]`. This is the sole source of
    /// randomness in the library; every fuzzer decodes its values from
    /// draws made here or in
    /// [`forced_choice`](#method.forced_choice).
    pub fn roll_dice(&mut self, max: u32, dist: Distribution) -> Maybe<u32> {
        match *self {
            Prng::Live {
                ref mut source,
                ref mut run,
            } => {
                if run.data.len() >= RUN_MAX {
                    return Err(Rejection::RunFull);
                }
                let value = match dist {
                    Distribution::Uniform => source.below(max),
                    Distribution::Coin(p) => {
                        debug_assert!(max == 1);
                        source.coin(p)
                    }
                };
                trace!("roll_dice(max={}) -> {}", max, value);
                run.data.push(value);
                Ok(value)
            }
            Prng::Replay {
                ref remaining,
                ref mut off,
            } => {
                if *off >= RUN_MAX {
                    return Err(Rejection::RunFull);
                }
                match remaining.data.get(*off) {
                    Some(&value) if value <= max => {
                        *off += 1;
                        Ok(value)
                    }
                    _ => Err(Rejection::ReplayMismatch),
                }
            }
        }
    }

    /// Record exactly `n`, with no randomness. A replayed run checks
    /// that the recording agrees, so shrink candidates that cut into an
    /// incompatible shape fail fast instead of decoding garbage.
    pub fn forced_choice(&mut self, n: u32) -> Maybe<u32> {
        match *self {
            Prng::Live { ref mut run, .. } => {
                if run.data.len() >= RUN_MAX {
                    return Err(Rejection::RunFull);
                }
                run.data.push(n);
                Ok(n)
            }
            Prng::Replay {
                ref remaining,
                ref mut off,
            } => {
                if *off >= RUN_MAX {
                    return Err(Rejection::RunFull);
                }
                match remaining.data.get(*off) {
                    Some(&value) if value == n => {
                        *off += 1;
                        Ok(n)
                    }
                    _ => Err(Rejection::ReplayMismatch),
                }
            }
        }
    }

    /// The draws this PRNG has committed to so far: the recording of a
    /// live run, or the consumed prefix of a replay.
    pub fn into_run(self) -> Choices {
        match self {
            Prng::Live { run, .. } => run,
            Prng::Replay { mut remaining, off } => {
                remaining.data.truncate(off);
                remaining
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_should_peel_each_item_in_order() {
        let mut p = Prng::replay(Choices::of_vec(vec![0, 1, 2, 3]));
        assert_eq!(p.roll_dice(10, Distribution::Uniform), Ok(0));
        assert_eq!(p.roll_dice(10, Distribution::Uniform), Ok(1));
        assert_eq!(p.roll_dice(10, Distribution::Uniform), Ok(2));
        assert_eq!(p.roll_dice(10, Distribution::Uniform), Ok(3));
        assert_eq!(
            p.roll_dice(10, Distribution::Uniform),
            Err(Rejection::ReplayMismatch)
        );
    }

    #[test]
    fn replay_should_reject_values_above_the_maximum() {
        let mut p = Prng::replay(Choices::of_vec(vec![7]));
        assert_eq!(
            p.roll_dice(3, Distribution::Uniform),
            Err(Rejection::ReplayMismatch)
        );
    }

    #[test]
    fn live_draws_should_stay_within_bounds() {
        let mut p = Prng::live(17);
        for max in &[0u32, 1, 2, 9, 255, 65535, ::std::u32::MAX] {
            for _ in 0..64 {
                let v = p.roll_dice(*max, Distribution::Uniform).expect("draw");
                assert!(v <= *max, "{} <= {}", v, max);
            }
        }
    }

    #[test]
    fn equal_seeds_should_give_identical_streams() {
        let mut p0 = Prng::live(42);
        let mut p1 = Prng::live(42);
        for _ in 0..256 {
            assert_eq!(
                p0.roll_dice(1000, Distribution::Uniform),
                p1.roll_dice(1000, Distribution::Uniform)
            );
        }
    }

    #[test]
    fn live_run_should_record_exactly_what_was_drawn() {
        let mut p = Prng::live(3);
        let mut drawn = Vec::new();
        for _ in 0..16 {
            drawn.push(p.roll_dice(999, Distribution::Uniform).expect("draw"));
        }
        assert_eq!(p.into_run().buffer(), &drawn[..]);
    }

    #[test]
    fn replaying_a_recording_should_reproduce_it() {
        let mut live = Prng::live(99);
        let mut v0 = Vec::new();
        for _ in 0..8 {
            v0.push(live.roll_dice(512, Distribution::Uniform).expect("draw"));
        }
        let mut replay = Prng::replay(live.into_run());
        let mut v1 = Vec::new();
        for _ in 0..8 {
            v1.push(replay.roll_dice(512, Distribution::Uniform).expect("draw"));
        }
        assert_eq!(v0, v1);
    }

    #[test]
    fn forced_choice_should_record_and_verify() {
        let mut live = Prng::live(0);
        assert_eq!(live.forced_choice(5), Ok(5));
        let run = live.into_run();
        assert_eq!(run.buffer(), &[5]);

        let mut ok = Prng::replay(run.clone());
        assert_eq!(ok.forced_choice(5), Ok(5));

        let mut bad = Prng::replay(run);
        assert_eq!(bad.forced_choice(6), Err(Rejection::ReplayMismatch));
    }

    #[test]
    fn a_full_run_should_reject_further_draws() {
        let mut p = Prng::live(0);
        for _ in 0..RUN_MAX {
            p.forced_choice(0).expect("fill");
        }
        assert_eq!(
            p.roll_dice(1, Distribution::Uniform),
            Err(Rejection::RunFull)
        );
        assert_eq!(p.forced_choice(0), Err(Rejection::RunFull));
    }

    #[test]
    fn choices_should_order_shortlex() {
        let empty = Choices::new();
        let zero = Choices::of_vec(vec![0]);
        let one = Choices::of_vec(vec![1]);
        let pair = Choices::of_vec(vec![0, 0]);
        assert!(empty < zero);
        assert!(zero < one);
        assert!(one < pair, "shorter beats lexicographic");
        assert!(Choices::of_vec(vec![0, 9]) < Choices::of_vec(vec![1, 0]));
    }

    #[test]
    fn rejection_reasons_should_render() {
        assert_eq!(
            format!("{}", Rejection::RunFull),
            "too much data: the run is full"
        );
        assert_eq!(
            format!("{}", Rejection::internals("walked off the table")),
            "internals: walked off the table"
        );
    }
}
