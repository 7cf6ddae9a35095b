// The fractal hit predicate.
//
// Pascal's triangle reduced mod 2 is the discrete Sierpinski triangle: row n
// has a hit at column k exactly when binomial(n, k) is odd. The rhythm
// engine reads row `12 + variation` across its 16 steps, so cycling the
// variation per bar slides a window down the fractal and the hit density
// breathes between 1 and 16 hits per row.
//
// The binomial coefficient is computed with exact big-integer arithmetic.
// Parity is the entire contract, and floating point (or a fixed-width
// overflow) gets it wrong once the row index grows.

use num::BigUint;

/// Exact binomial coefficient C(n, k). Zero when `k > n`.
pub fn binomial(n: u64, k: u64) -> BigUint {
    if k > n {
        return BigUint::from(0u32);
    }
    // Multiplicative formula; every intermediate division is exact because
    // C(n-k+1..n-k+i, i) is itself an integer at each step.
    let k = k.min(n - k);
    let mut result = BigUint::from(1u32);
    for i in 1..=k {
        result = result * (n - k + i) / i;
    }
    result
}

/// Fractal hit test: is step `step` of variation row `variation` a hit?
pub fn is_hit(step: u32, variation: u32) -> bool {
    binomial(12 + u64::from(variation), u64::from(step)) % 2u32 == BigUint::from(1u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binomial_small_values() {
        assert_eq!(binomial(0, 0), BigUint::from(1u32));
        assert_eq!(binomial(4, 2), BigUint::from(6u32));
        assert_eq!(binomial(12, 5), BigUint::from(792u32));
        assert_eq!(binomial(19, 15), BigUint::from(3876u32));
    }

    #[test]
    fn test_binomial_out_of_range_is_zero() {
        assert_eq!(binomial(12, 13), BigUint::from(0u32));
        assert_eq!(binomial(0, 1), BigUint::from(0u32));
    }

    #[test]
    fn test_variation_zero_row_by_enumeration() {
        // Row 12 of Pascal's triangle: 1 12 66 220 495 792 924 792 495 220
        // 66 12 1. Odd entries at k = 0, 4, 8, 12, nothing past k = 12.
        let expected_hits = [0, 4, 8, 12];
        for step in 0..16 {
            assert_eq!(
                is_hit(step, 0),
                expected_hits.contains(&step),
                "step {step}"
            );
        }
    }

    #[test]
    fn test_matches_lucas_parity() {
        // Lucas' theorem: C(n, k) is odd iff every bit of k is set in n.
        for variation in 0..64u32 {
            let n = 12 + variation;
            for step in 0..16u32 {
                assert_eq!(is_hit(step, variation), step & n == step);
            }
        }
    }

    #[test]
    fn test_density_varies_with_row() {
        // Row 15 (variation 3) is all-odd: 16 hits. Row 16 (variation 4)
        // has a single hit in the 16-step window.
        assert_eq!((0..16).filter(|&s| is_hit(s, 3)).count(), 16);
        assert_eq!((0..16).filter(|&s| is_hit(s, 4)).count(), 1);
    }

    #[test]
    fn test_parity_exact_at_large_variation() {
        // Row 1036 overflows u64 binomials well before k = 15; the exact
        // path must still agree with the bit-subset identity.
        let variation = 1024;
        let n = 12 + variation;
        for step in 0..16u32 {
            assert_eq!(is_hit(step, variation), step & n == step);
        }
    }
}
