//! The underlying data model: a run of a fuzzer is a recorded sequence
//! of bounded integer draws (a [`Choices`](struct.Choices.html)),
//! produced either live from a seeded
//! [`RandomSource`](struct.RandomSource.html) or replayed from an
//! earlier run via a [`Prng`](enum.Prng.html).
//!
//! Also manages the shrinking process (see
//! [`minimize`](fn.minimize.html)).

mod shrinkers;
mod source;
pub use self::shrinkers::*;
pub use self::source::*;
