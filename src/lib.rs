//! `surmises` is a property testing library in which every generated
//! value is decoded from a recorded sequence of bounded integer draws.
//! Failing inputs are minimized by searching for a shortlex-smaller
//! sequence of draws that still provokes the failure, so shrinking
//! works for every fuzzer without per-type shrinkers.
//!
//! The [`fuzzers`](fuzzers/index.html) module holds the combinator
//! algebra and the primitive fuzzers; [`data`](data/index.html) holds
//! the recorded-run substrate and the shrinker.

extern crate hex_slice;
#[macro_use]
extern crate log;
extern crate rand;

pub mod data;
pub mod fuzzers;
pub mod properties;

pub use properties::{property, CheckResult, Property};
