use data::*;
use fuzzers::core::*;
use fuzzers::floats::percentages;

/// Draw one weighted index from a cumulative weight table. The draw
/// itself is uniform over `[0, total - 1]`; walking the cumulative
/// weights turns it into entry selection proportional to weight, and
/// smaller draws always land on earlier entries.
fn weighted_index(prng: &mut Prng, weights: &[u64], name: &str) -> Maybe<usize> {
    let total: u64 = weights.iter().sum();
    let drawn = prng.roll_dice((total - 1) as u32, Distribution::Uniform)?;
    let mut acc = 0u64;
    for (idx, &w) in weights.iter().enumerate() {
        acc += w;
        if u64::from(drawn) < acc {
            return Ok(idx);
        }
    }
    Err(Rejection::internals(format!(
        "{}: weighted draw {} walked off the table",
        name, drawn
    )))
}

/// See [`int_frequency`](fn.int_frequency.html).
pub struct IntFrequency<T> {
    name: &'static str,
    entries: Vec<(u32, BoxedFuzzer<T>)>,
}

/// Choose between fuzzers with integer weights, spending one choice.
/// Earlier entries are reached by smaller draws, so callers should put
/// the simplest alternative first: that is the one shrinking steers
/// toward.
pub fn int_frequency<T>(entries: Vec<(u32, BoxedFuzzer<T>)>) -> IntFrequency<T> {
    IntFrequency::named("fuzzers::int_frequency", entries)
}

impl<T> IntFrequency<T> {
    pub(in fuzzers) fn named(
        name: &'static str,
        entries: Vec<(u32, BoxedFuzzer<T>)>,
    ) -> IntFrequency<T> {
        IntFrequency {
            name: name,
            entries: entries,
        }
    }

    fn validate(&self) -> Result<(), Rejection> {
        if self.entries.is_empty() {
            return Err(Rejection::invalid(format!(
                "{}: no entries to choose from",
                self.name
            )));
        }
        let mut total = 0u64;
        for &(weight, _) in self.entries.iter() {
            if weight == 0 {
                return Err(Rejection::invalid(format!(
                    "{}: entry weights must be positive",
                    self.name
                )));
            }
            total += u64::from(weight);
        }
        if total > u64::from(::std::u32::MAX) + 1 {
            return Err(Rejection::invalid(format!(
                "{}: total weight must fit in 32 bits",
                self.name
            )));
        }
        Ok(())
    }
}

impl<T> Fuzzer for IntFrequency<T> {
    type Item = T;
    fn generate(&self, prng: &mut Prng) -> Maybe<T> {
        self.validate()?;
        let weights = self
            .entries
            .iter()
            .map(|&(w, _)| u64::from(w))
            .collect::<Vec<_>>();
        let idx = weighted_index(prng, &weights, self.name)?;
        self.entries[idx].1.generate(prng)
    }
}

/// See [`frequency`](fn.frequency.html).
pub struct Frequency<T> {
    name: &'static str,
    entries: Vec<(f64, BoxedFuzzer<T>)>,
}

/// Choose between fuzzers with fractional weights. Whole-number
/// weights delegate to the integer path, which spends a single small
/// choice instead of the two 32-bit draws behind a
/// [`percentages`](fn.percentages.html) draw and therefore shrinks
/// better; as with [`int_frequency`](fn.int_frequency.html), put the
/// simplest entry first.
pub fn frequency<T>(entries: Vec<(f64, BoxedFuzzer<T>)>) -> Frequency<T> {
    Frequency::named("fuzzers::frequency", entries)
}

impl<T> Frequency<T> {
    pub(in fuzzers) fn named(
        name: &'static str,
        entries: Vec<(f64, BoxedFuzzer<T>)>,
    ) -> Frequency<T> {
        Frequency {
            name: name,
            entries: entries,
        }
    }

    fn validate(&self) -> Result<f64, Rejection> {
        if self.entries.is_empty() {
            return Err(Rejection::invalid(format!(
                "{}: no entries to choose from",
                self.name
            )));
        }
        let mut total = 0.0;
        for &(weight, _) in self.entries.iter() {
            if !weight.is_finite() {
                return Err(Rejection::invalid(format!(
                    "{}: weight {} is not finite",
                    self.name, weight
                )));
            }
            if weight < 0.0 {
                return Err(Rejection::invalid(format!(
                    "{}: weight {} is less than 0",
                    self.name, weight
                )));
            }
            total += weight;
        }
        if total <= 0.0 {
            return Err(Rejection::invalid(format!(
                "{}: total weight must be positive",
                self.name
            )));
        }
        Ok(total)
    }

    fn delegates_to_integers(&self, total: f64) -> bool {
        total <= u64::from(::std::u32::MAX) as f64 + 1.0
            && self.entries.iter().all(|&(w, _)| w.fract() == 0.0)
    }
}

impl<T> Fuzzer for Frequency<T> {
    type Item = T;
    fn generate(&self, prng: &mut Prng) -> Maybe<T> {
        let total = self.validate()?;
        if self.delegates_to_integers(total) {
            let weights = self
                .entries
                .iter()
                .map(|&(w, _)| w as u64)
                .collect::<Vec<_>>();
            let idx = weighted_index(prng, &weights, self.name)?;
            return self.entries[idx].1.generate(prng);
        }
        let scaled = percentages().generate(prng)? * total;
        let mut acc = 0.0;
        for &(weight, ref fuzzer) in self.entries.iter() {
            acc += weight;
            if scaled < acc {
                return fuzzer.generate(prng);
            }
        }
        // Rounding can push `scaled` past the last boundary.
        match self.entries.last() {
            Some(&(_, ref fuzzer)) => fuzzer.generate(prng),
            None => Err(Rejection::internals(format!("{}: empty after validation", self.name))),
        }
    }
}

/// Choose uniformly between fuzzers; rejects the run if `options` is
/// empty.
pub fn one_of<T>(options: Vec<BoxedFuzzer<T>>) -> IntFrequency<T> {
    IntFrequency::named(
        "fuzzers::one_of",
        options.into_iter().map(|fuzzer| (1, fuzzer)).collect(),
    )
}

/// Choose uniformly between plain values.
pub fn one_of_values<T: Clone + 'static>(values: Vec<T>) -> IntFrequency<T> {
    IntFrequency::named(
        "fuzzers::one_of_values",
        values
            .into_iter()
            .map(|value| (1, consts(value).boxed()))
            .collect(),
    )
}

/// Choose between plain values with fractional weights.
pub fn frequency_values<T: Clone + 'static>(entries: Vec<(f64, T)>) -> Frequency<T> {
    Frequency::named(
        "fuzzers::frequency_values",
        entries
            .into_iter()
            .map(|(weight, value)| (weight, consts(value).boxed()))
            .collect(),
    )
}
