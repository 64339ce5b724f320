use data::source::*;

/// Chunk lengths tried by the slice-wise passes, largest first.
const CHUNK_SIZES: [usize; 4] = [8, 4, 2, 1];

/// Try to find the smallest `Choices` for which `still_failing`
/// returns true. Given that our [fuzzers](../fuzzers/index.html)
/// decode smaller draws into simpler values, minimizing the recorded
/// run finds the simplest value that provokes a failure.
///
/// A candidate is accepted when it is strictly shortlex-smaller than
/// the current sequence and `still_failing` holds for it; the caller's
/// callback is expected to replay the candidate and report whether the
/// run decoded cleanly *and* the predicate under test still failed.
/// Candidates that fail to replay are simply skipped. After every
/// acceptance the pass list restarts from the new sequence; when a full
/// round of passes accepts nothing we are at a fixpoint and stop.
///
/// If no smaller sequence satisfies `still_failing`, returns `None`.
pub fn minimize<F>(seed: &Choices, still_failing: &mut F) -> Option<Choices>
where
    F: FnMut(&Choices) -> bool,
{
    debug!("Shrinking run of {} choices", seed.len());
    let mut cur = seed.clone();
    let mut improved_any = false;
    loop {
        let next = {
            let mut accept =
                |candidate: &Choices| *candidate < cur && still_failing(candidate);
            delete_slices(&cur, &mut accept)
                .or_else(|| zero_slices(&cur, &mut accept))
                .or_else(|| bulk_subtract(&cur, &mut accept))
                .or_else(|| minimize_elements(&cur, &mut accept))
                .or_else(|| swap_adjacent(&cur, &mut accept))
                .or_else(|| redistribute(&cur, &mut accept))
        };
        match next {
            Some(smaller) => {
                trace!("accepted {:?}", smaller);
                cur = smaller;
                improved_any = true;
            }
            None => break,
        }
    }
    if improved_any {
        debug!("Minimized to {} choices", cur.len());
        Some(cur)
    } else {
        debug!("Nothing smaller found");
        None
    }
}

/// Remove contiguous chunks, scanning left to right at each chunk
/// length. This is what shortens the list protocol and drops whole
/// branches left behind by `and_then`.
fn delete_slices<F>(seed: &Choices, accept: &mut F) -> Option<Choices>
where
    F: FnMut(&Choices) -> bool,
{
    let len = seed.data.len();
    for &k in CHUNK_SIZES.iter() {
        if k > len {
            continue;
        }
        for start in 0..(len - k + 1) {
            let mut candidate = seed.clone();
            candidate.data.drain(start..start + k);
            if accept(&candidate) {
                debug!("deleted {}..{}", start, start + k);
                return Some(candidate);
            }
        }
    }
    None
}

/// Replace contiguous chunks with zeroes.
fn zero_slices<F>(seed: &Choices, accept: &mut F) -> Option<Choices>
where
    F: FnMut(&Choices) -> bool,
{
    let len = seed.data.len();
    for &k in CHUNK_SIZES.iter() {
        if k > len {
            continue;
        }
        for start in 0..(len - k + 1) {
            if seed.data[start..start + k].iter().all(|&v| v == 0) {
                continue;
            }
            let mut candidate = seed.clone();
            for v in candidate.data[start..start + k].iter_mut() {
                *v = 0;
            }
            if accept(&candidate) {
                debug!("zeroed {}..{}", start, start + k);
                return Some(candidate);
            }
        }
    }
    None
}

/// Subtract a constant from every element of a chunk, halving the
/// constant until a candidate is accepted. Lowers draws that move in
/// lockstep (for example an offset applied to several elements) without
/// going through them one at a time.
fn bulk_subtract<F>(seed: &Choices, accept: &mut F) -> Option<Choices>
where
    F: FnMut(&Choices) -> bool,
{
    let len = seed.data.len();
    for &k in &[8usize, 4, 2] {
        if k > len {
            continue;
        }
        for start in 0..(len - k + 1) {
            let smallest = seed.data[start..start + k]
                .iter()
                .cloned()
                .min()
                .unwrap_or(0);
            let mut c = smallest;
            while c > 0 {
                let mut candidate = seed.clone();
                for v in candidate.data[start..start + k].iter_mut() {
                    *v -= c;
                }
                if accept(&candidate) {
                    debug!("subtracted {} from {}..{}", c, start, start + k);
                    return Some(candidate);
                }
                c /= 2;
            }
        }
    }
    None
}

/// Binary-search each element toward zero, left to right, keeping
/// every improvement found along the way.
fn minimize_elements<F>(seed: &Choices, accept: &mut F) -> Option<Choices>
where
    F: FnMut(&Choices) -> bool,
{
    let mut new = seed.clone();
    let mut improved = false;
    for pos in 0..new.data.len() {
        let orig = new.data[pos];
        if orig == 0 {
            continue;
        }
        new.data[pos] = 0;
        if accept(&new) {
            improved = true;
            continue;
        }
        let mut lo = 0;
        let mut hi = orig;
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            new.data[pos] = mid;
            if accept(&new) {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        new.data[pos] = hi;
        if hi < orig {
            improved = true;
        }
    }
    if improved {
        Some(new)
    } else {
        None
    }
}

/// Swap neighbouring elements that are out of order. Earlier positions
/// dominate the shortlex order, so moving the smaller value forward is
/// always a strict improvement when it replays.
fn swap_adjacent<F>(seed: &Choices, accept: &mut F) -> Option<Choices>
where
    F: FnMut(&Choices) -> bool,
{
    let len = seed.data.len();
    if len < 2 {
        return None;
    }
    for pos in 0..(len - 1) {
        if seed.data[pos] > seed.data[pos + 1] {
            let mut candidate = seed.clone();
            candidate.data.swap(pos, pos + 1);
            if accept(&candidate) {
                debug!("swapped {} and {}", pos, pos + 1);
                return Some(candidate);
            }
        }
    }
    None
}

/// Move amount from position `i` to position `i + k`, preserving the
/// pair's total. Shrinks an early draw at the cost of a later one,
/// which is a win under shortlex; the transferred amount is
/// binary-searched after trying the full transfer.
fn redistribute<F>(seed: &Choices, accept: &mut F) -> Option<Choices>
where
    F: FnMut(&Choices) -> bool,
{
    let len = seed.data.len();
    for &k in &[2usize, 1] {
        if k >= len {
            continue;
        }
        for i in 0..(len - k) {
            let j = i + k;
            let a = seed.data[i];
            if a == 0 {
                continue;
            }
            let total = u64::from(a) + u64::from(seed.data[j]);
            // The receiving element must still fit in 32 bits.
            let floor = total.saturating_sub(u64::from(::std::u32::MAX)) as u32;
            if floor >= a {
                continue;
            }
            let assign = |candidate: &mut Choices, v: u32| {
                candidate.data[i] = v;
                candidate.data[j] = (total - u64::from(v)) as u32;
            };
            let mut candidate = seed.clone();
            assign(&mut candidate, floor);
            if accept(&candidate) {
                debug!("redistributed {} from {} to {}", a - floor, i, j);
                return Some(candidate);
            }
            let mut lo = floor;
            let mut hi = a;
            while lo + 1 < hi {
                let mid = lo + (hi - lo) / 2;
                assign(&mut candidate, mid);
                if accept(&candidate) {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }
            if hi < a {
                assign(&mut candidate, hi);
                return Some(candidate);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    extern crate env_logger;
    use super::*;

    fn run_minimize<F>(seed: Vec<u32>, mut still_failing: F) -> Option<Vec<u32>>
    where
        F: FnMut(&Choices) -> bool,
    {
        minimize(&Choices::of_vec(seed), &mut still_failing)
            .map(|c| c.buffer().to_vec())
    }

    #[test]
    fn minimiser_should_minimise_to_empty() {
        let min = run_minimize(vec![1], |_| true);
        assert_eq!(min, Some(vec![]));
    }

    #[test]
    fn minimiser_should_minimise_to_minimum_given_count() {
        env_logger::init().unwrap_or(());
        let min = run_minimize(vec![1; 4], |c| {
            c.buffer().iter().filter(|&&v| v > 0).count() > 1
        });
        assert_eq!(min, Some(vec![1, 1]));
    }

    #[test]
    fn minimiser_should_minimise_scalar_values_by_search() {
        let min = run_minimize(vec![255; 3], |c| c.buffer().iter().any(|&v| v >= 13));
        assert_eq!(min, Some(vec![13]));
    }

    #[test]
    fn minimiser_should_find_thresholds_near_the_top() {
        let min = run_minimize(vec![255; 3], |c| c.buffer().iter().any(|&v| v >= 251));
        assert_eq!(min, Some(vec![251]));
    }

    #[test]
    fn minimiser_should_zero_fixed_length_runs() {
        let min = run_minimize(vec![1, 2, 3], |c| c.len() == 3);
        assert_eq!(min, Some(vec![0, 0, 0]));
    }

    #[test]
    fn minimiser_should_swap_out_of_order_pairs() {
        let min = run_minimize(vec![2, 1], |c| {
            c.buffer() == [2, 1] || c.buffer() == [1, 2]
        });
        assert_eq!(min, Some(vec![1, 2]));
    }

    #[test]
    fn minimiser_should_redistribute_weight_rightward() {
        let min = run_minimize(vec![500, 500], |c| {
            c.len() == 2 && c.buffer().iter().map(|&v| u64::from(v)).sum::<u64>() == 1000
        });
        assert_eq!(min, Some(vec![0, 1000]));
    }

    #[test]
    fn minimiser_should_return_none_when_nothing_smaller_works() {
        let min = run_minimize(vec![0], |c| c.len() == 1 && c.buffer()[0] == 0);
        assert_eq!(min, None);
    }

    #[test]
    fn accepted_results_are_strictly_smaller() {
        let seed = vec![9, 9, 9, 9];
        if let Some(min) = run_minimize(seed.clone(), |c| c.buffer().iter().any(|&v| v > 3)) {
            assert!(Choices::of_vec(min) < Choices::of_vec(seed));
        } else {
            panic!("expected some improvement");
        }
    }
}
