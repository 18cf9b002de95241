use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::network::Value;

/// Generate random binary input vectors
pub fn generate_random_patterns(
    nb_inputs: usize,
    nb_patterns: usize,
    seed: u64,
) -> Vec<Vec<Value>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut ret = Vec::new();
    for _ in 0..nb_patterns {
        let mut p = Vec::new();
        for _ in 0..nb_inputs {
            p.push(Value::from(rng.gen::<bool>()));
        }
        ret.push(p);
    }
    ret
}

/// The i-th binary input vector, first input as most significant bit
///
/// Any width is accepted. Only the `nb_inputs` low bits of `i` are used, and inputs beyond
/// the 64 last ones are always Zero.
pub fn binary_pattern(nb_inputs: usize, i: u64) -> Vec<Value> {
    (0..nb_inputs)
        .map(|j| {
            let shift = nb_inputs - 1 - j;
            let bit = u32::try_from(shift)
                .ok()
                .and_then(|s| i.checked_shr(s))
                .unwrap_or(0);
            Value::from(bit & 1 != 0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{binary_pattern, generate_random_patterns};
    use crate::network::Value::*;

    #[test]
    fn test_random() {
        let a = generate_random_patterns(5, 10, 1);
        let b = generate_random_patterns(5, 10, 1);
        assert_eq!(a.len(), 10);
        assert!(a.iter().all(|p| p.len() == 5));
        assert!(a.iter().flatten().all(|v| v.is_defined()));
        assert_eq!(a, b);
    }

    #[test]
    fn test_binary() {
        assert_eq!(binary_pattern(3, 0), vec![Zero, Zero, Zero]);
        assert_eq!(binary_pattern(3, 1), vec![Zero, Zero, One]);
        assert_eq!(binary_pattern(3, 6), vec![One, One, Zero]);
        assert_eq!(binary_pattern(0, 0), Vec::new());
        // Bits above the width are ignored
        assert_eq!(binary_pattern(2, 5), vec![Zero, One]);
    }

    #[test]
    fn test_binary_wide() {
        let p = binary_pattern(65, 0);
        assert_eq!(p.len(), 65);
        assert!(p.iter().all(|v| *v == Zero));

        let p = binary_pattern(65, 1);
        assert_eq!(p[64], One);
        assert!(p[..64].iter().all(|v| *v == Zero));

        let p = binary_pattern(100, u64::MAX);
        assert!(p[..36].iter().all(|v| *v == Zero));
        assert!(p[36..].iter().all(|v| *v == One));
    }
}
