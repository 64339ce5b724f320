use fuzzers::collections::vecs_of_length_between;
use fuzzers::core::*;
use fuzzers::frequency::{one_of_values, IntFrequency};
use fuzzers::ints::int_range;

/// Printable ASCII characters, space through tilde.
pub fn ascii_chars() -> impl Fuzzer<Item = char> {
    int_range(32, 126).map(|n| n as u8 as char)
}

/// Any Unicode scalar value. Draws in the surrogate block are
/// rejected by `char::from_u32` and retried with fresh choices.
fn arbitrary_unicode() -> impl Fuzzer<Item = char> {
    int_range(0, 0x10_ffff).filter_map(|n| ::std::char::from_u32(n as u32))
}

/// Characters weighted toward the troublesome: mostly printable
/// ASCII, with whitespace, combining diacritics, emoji and arbitrary
/// scalar values mixed in.
pub fn chars() -> IntFrequency<char> {
    IntFrequency::named(
        "fuzzers::chars",
        vec![
            (5, ascii_chars().boxed()),
            (2, one_of_values(vec![' ', '\t', '\n']).boxed()),
            (1, one_of_values(vec!['\u{302}', '\u{303}', '\u{308}']).boxed()),
            (1, one_of_values(vec!['🌈', '❤', '🔥']).boxed()),
            (1, arbitrary_unicode().boxed()),
        ],
    )
}

/// Strings of between `min` and `max` characters drawn from `chars`,
/// using the same interleaved length protocol as
/// [`vecs`](fn.vecs.html).
pub fn strings_of_length_between<G>(min: usize, max: usize, chars: G) -> impl Fuzzer<Item = String>
where
    G: Fuzzer<Item = char>,
{
    vecs_of_length_between(min, max, chars).map(|cs| cs.into_iter().collect::<String>())
}

/// Strings of up to ten characters from [`chars`](fn.chars.html).
pub fn strings() -> impl Fuzzer<Item = String> {
    strings_of_length_between(0, 10, chars())
}

/// Strings of up to ten characters from
/// [`ascii_chars`](fn.ascii_chars.html).
pub fn ascii_strings() -> impl Fuzzer<Item = String> {
    strings_of_length_between(0, 10, ascii_chars())
}
