//! This module describes how values get generated from the underlying
//! representation in the [`surmises::data`](../data/index.html) module.
//! Every fuzzer here reduces to draws made through
//! [`roll_dice`](fn.roll_dice.html) and
//! [`forced_choice`](fn.forced_choice.html), so every fuzzer shrinks
//! through the recorded run with no per-type shrinker.

mod basics;
mod collections;
mod core;
mod float_codec;
mod floats;
mod frequency;
mod ints;
mod strings;
mod tuples;

pub use self::basics::*;
pub use self::collections::*;
pub use self::core::*;
pub use self::float_codec::*;
pub use self::floats::*;
pub use self::frequency::*;
pub use self::ints::*;
pub use self::strings::*;
