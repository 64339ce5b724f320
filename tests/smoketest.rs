extern crate env_logger;
#[macro_use]
extern crate log;
extern crate surmises;

use surmises::*;
use surmises::fuzzers::*;

#[test]
fn some_approximation_of_usage() {
    property(vecs(ints())).check(|l| {
        let rev = l.iter().cloned().rev().collect::<Vec<_>>();
        let rev2 = rev.into_iter().rev().collect::<Vec<_>>();
        rev2 == l
    })
}

// In this case, we reverse the last three items.
#[test]
#[should_panic(expected = "Predicate failed for argument ")]
fn some_approximation_of_failing_example() {
    env_logger::init().unwrap_or(());
    property(vecs(booleans())).check(|l| {
        let rev = l.iter().cloned().rev().take(3).collect::<Vec<_>>();
        let rev2 = rev.into_iter().rev().collect::<Vec<_>>();
        info!("in:{:?}; out:{:?}; ok? {:?}", l, rev2, &rev2 == &l);
        rev2 == l
    })
}

// http://matt.might.net/articles/quick-quickcheck/
#[test]
#[should_panic(expected = "Predicate failed for argument ")]
fn mersenne_conjecture() {
    env_logger::init().unwrap_or(());
    fn is_prime(n: u64) -> bool {
        match n {
            0 | 1 => false,
            2 => true,
            n => !(2..n - 1).any(|q| (n % q) == 0),
        }
    }

    // Only check small primes.
    property(int_range(0, 16).filter(|&n| is_prime(n as u64)))
        .check(|n| is_prime((1u64 << n) - 1))
}

#[test]
#[should_panic(expected = "Predicate failed for argument ")]
fn trivial_failure() {
    env_logger::init().unwrap_or(());
    property(booleans()).check(|_| false)
}

#[test]
fn trivial_pass() {
    property(booleans()).check(|_| true)
}

#[test]
#[should_panic(expected = "Predicate failed for argument ")]
fn value_dependent() {
    property(vecs(booleans())).check(|v| {
        debug!("Check: {:?}", v);
        !v.into_iter().any(|t| t)
    })
}

#[test]
#[should_panic(expected = "Predicate failed for argument ")]
fn trivial_result_failure() {
    property(booleans()).check(|_| -> Result<(), ()> { Err(()) })
}

#[test]
#[should_panic(expected = "horrible failure")]
fn trivial_result_includes_failing_result() {
    property(booleans()).check(|_| -> Result<(), &'static str> { Err("horrible failure") })
}

#[test]
fn trivial_result_pass() {
    property(booleans()).check(|_| -> Result<(), ()> { Ok(()) })
}

#[test]
#[should_panic(expected = "Predicate failed for argument ")]
fn trivial_panic_failure() {
    property(booleans()).check(|_| -> () { panic!("Big bad boom") })
}

#[test]
#[should_panic(expected = "Big bad boom")]
fn panic_includes_failure_message() {
    property(booleans()).check(|_| -> () { panic!("Big bad boom") })
}

#[test]
#[should_panic(expected = "Could not finish")]
fn unsatisfiable_filters_give_up() {
    property(consts(0).filter(|_| false)).check(|_: i32| true)
}

#[test]
fn properties_accept_tuple_fuzzers() {
    property((int_range(0, 10), int_range(0, 10))).check(|(a, b)| a + b <= 20)
}
