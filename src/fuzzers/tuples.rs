use data::*;
use fuzzers::core::*;

macro_rules! tuple_fuzzer_impl {
    ($fz_a:ident: $var_a:ident: $type_a:ident
        $(, $fz_n: ident: $var_n:ident: $type_n:ident)*) => (
        impl<$type_a: Fuzzer, $($type_n: Fuzzer),*> Fuzzer
                for ($type_a, $($type_n),*) {
                    type Item = ($type_a::Item, $($type_n::Item),*);
                    fn generate(&self, prng: &mut Prng) -> Maybe<Self::Item> {
                        let &(ref $fz_a, $(ref $fz_n),*) = self;
                        let $var_a = $fz_a.generate(prng)?;
                        $(let $var_n = $fz_n.generate(prng)?;)*
                        Ok(($var_a, $($var_n),*))
                    }
                }
    );
}

tuple_fuzzer_impl!(fa: a: A);
tuple_fuzzer_impl!(fa: a: A, fb: b: B);
tuple_fuzzer_impl!(fa: a: A, fb: b: B, fc: c: C);
tuple_fuzzer_impl!(fa: a: A, fb: b: B, fc: c: C, fd: d: D);
tuple_fuzzer_impl!(fa: a: A, fb: b: B, fc: c: C, fd: d: D, fe: e: E);
tuple_fuzzer_impl!(fa: a: A, fb: b: B, fc: c: C, fd: d: D, fe: e: E, ff: f: F);
tuple_fuzzer_impl!(
    fa: a: A,
    fb: b: B,
    fc: c: C,
    fd: d: D,
    fe: e: E,
    ff: f: F,
    fg: g: G
);
tuple_fuzzer_impl!(
    fa: a: A,
    fb: b: B,
    fc: c: C,
    fd: d: D,
    fe: e: E,
    ff: f: F,
    fg: g: G,
    fh: h: H
);
