//! Combination generation.
//!
//! Enumerates the Cartesian product of the per-layer image sets, then
//! optionally shuffles and truncates it.
//!
//! Enumeration order is fixed: the first (bottom) layer varies fastest and
//! the last (top) layer slowest. With layers `[a, b]` and `[x, y]` the order
//! is `[a, x]`, `[b, x]`, `[a, y]`, `[b, y]`. Output numbering follows this
//! order, so it must stay stable.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::Config;
use crate::error::{GenError, Result};

/// Number of combinations in the product of `layers`.
///
/// Empty layers contribute no factor. Fails if the product overflows.
pub fn combination_count<T>(layers: &[Vec<T>]) -> Result<usize> {
    layers
        .iter()
        .filter(|layer| !layer.is_empty())
        .try_fold(1usize, |total, layer| total.checked_mul(layer.len()))
        .ok_or(GenError::TooManyCombinations)
}

/// Iterator over the Cartesian product of layer sets.
///
/// Each combination is computed from its index by mixed-radix decomposition,
/// so memory use is independent of the product size.
#[derive(Debug, Clone)]
pub struct Cartesian<'a, T> {
    layers: Vec<&'a [T]>,
    next: usize,
    total: usize,
}

impl<'a, T: Clone> Cartesian<'a, T> {
    /// Build the product over the non-empty layers, in order.
    pub fn new(layers: &'a [Vec<T>]) -> Result<Self> {
        let total = combination_count(layers)?;
        let layers = layers
            .iter()
            .filter(|layer| !layer.is_empty())
            .map(|layer| layer.as_slice())
            .collect();

        Ok(Self {
            layers,
            next: 0,
            total,
        })
    }

    /// The combination at position `index` of the canonical order.
    pub fn nth_combination(&self, index: usize) -> Option<Vec<T>> {
        if index >= self.total {
            return None;
        }

        let mut rest = index;
        let picks = self
            .layers
            .iter()
            .map(|layer| {
                let pick = layer[rest % layer.len()].clone();
                rest /= layer.len();
                pick
            })
            .collect();

        Some(picks)
    }
}

impl<T: Clone> Iterator for Cartesian<'_, T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.nth_combination(self.next)?;
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.next;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for Cartesian<'_, T> {}

/// How the product is sampled before rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Shuffle the full product.
    pub randomize: bool,
    /// Seed for a reproducible shuffle; entropy when `None`.
    pub seed: Option<u64>,
    /// Keep only the first `amount` combinations.
    pub amount: Option<usize>,
}

impl Selection {
    pub fn from_config(config: &Config) -> Self {
        Self {
            randomize: config.randomize,
            seed: config.seed,
            amount: config.output_amount,
        }
    }
}

/// Shuffle (if requested) and then truncate (if requested).
pub fn select<T>(mut combinations: Vec<T>, selection: &Selection) -> Vec<T> {
    if selection.randomize {
        match selection.seed {
            Some(seed) => combinations.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => combinations.shuffle(&mut rand::thread_rng()),
        }
    }

    if let Some(amount) = selection.amount {
        combinations.truncate(amount);
    }

    combinations
}

/// Generate the selected combinations of `layers`.
pub fn generate_combinations<T: Clone>(
    layers: &[Vec<T>],
    selection: &Selection,
) -> Result<Vec<Vec<T>>> {
    let product = Cartesian::new(layers)?;

    // Without a shuffle the selection is a prefix: skip materializing the rest.
    if !selection.randomize {
        let amount = selection.amount.unwrap_or(usize::MAX);
        return Ok(product.take(amount).collect());
    }

    Ok(select(product.collect(), selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn layers_of(sizes: &[usize]) -> Vec<Vec<String>> {
        sizes
            .iter()
            .enumerate()
            .map(|(layer, &n)| (0..n).map(|i| format!("L{layer}-{i}")).collect())
            .collect()
    }

    #[test]
    fn test_product_is_complete() {
        let layers = layers_of(&[2, 3, 4]);

        let combos: Vec<Vec<String>> = Cartesian::new(&layers).unwrap().collect();

        assert_eq!(combos.len(), 24);
        let unique: HashSet<&Vec<String>> = combos.iter().collect();
        assert_eq!(unique.len(), 24);
        for combo in &combos {
            assert_eq!(combo.len(), 3);
            for (i, pick) in combo.iter().enumerate() {
                assert!(layers[i].contains(pick));
            }
        }
    }

    #[test]
    fn test_first_layer_varies_fastest() {
        let layers = vec![vec!["a", "b"], vec!["x", "y"]];

        let combos: Vec<Vec<&str>> = Cartesian::new(&layers).unwrap().collect();

        assert_eq!(
            combos,
            vec![
                vec!["a", "x"],
                vec!["b", "x"],
                vec!["a", "y"],
                vec!["b", "y"],
            ]
        );
    }

    #[test]
    fn test_deterministic_without_randomize() {
        let layers = layers_of(&[3, 2, 2]);
        let selection = Selection::default();

        let first = generate_combinations(&layers, &selection).unwrap();
        let second = generate_combinations(&layers, &selection).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_layers_yield_single_empty_combination() {
        let layers: Vec<Vec<u8>> = vec![];

        let combos: Vec<Vec<u8>> = Cartesian::new(&layers).unwrap().collect();

        assert_eq!(combos, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_empty_layer_contributes_no_factor() {
        let layers = vec![vec![1, 2], vec![], vec![3, 4, 5]];

        assert_eq!(combination_count(&layers).unwrap(), 6);
        let combos: Vec<Vec<i32>> = Cartesian::new(&layers).unwrap().collect();
        assert!(combos.iter().all(|c| c.len() == 2));
    }

    #[test]
    fn test_count_overflow() {
        let layers = vec![vec![0u8, 1]; 65];
        assert!(matches!(
            combination_count(&layers),
            Err(GenError::TooManyCombinations)
        ));
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let layers = layers_of(&[2, 2]);
        let mut product = Cartesian::new(&layers).unwrap();
        assert_eq!(product.len(), 4);
        product.next();
        assert_eq!(product.len(), 3);
    }

    #[test]
    fn test_nth_combination_out_of_range() {
        let layers = layers_of(&[2, 2]);
        let product = Cartesian::new(&layers).unwrap();
        assert_eq!(product.nth_combination(3).unwrap(), vec!["L0-1", "L1-1"]);
        assert!(product.nth_combination(4).is_none());
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let layers = layers_of(&[4, 3, 5]);
        let canonical = generate_combinations(&layers, &Selection::default()).unwrap();

        let shuffled = generate_combinations(
            &layers,
            &Selection {
                randomize: true,
                ..Default::default()
            },
        )
        .unwrap();

        let mut a = canonical.clone();
        let mut b = shuffled;
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let layers = layers_of(&[5, 5, 4]);
        let selection = Selection {
            randomize: true,
            seed: Some(7),
            amount: None,
        };

        let first = generate_combinations(&layers, &selection).unwrap();
        let second = generate_combinations(&layers, &selection).unwrap();
        let canonical = generate_combinations(&layers, &Selection::default()).unwrap();

        assert_eq!(first, second);
        assert_ne!(first, canonical);
    }

    #[test]
    fn test_truncate_without_randomize_is_prefix() {
        let layers = layers_of(&[3, 3]);
        let canonical = generate_combinations(&layers, &Selection::default()).unwrap();

        let truncated = generate_combinations(
            &layers,
            &Selection {
                amount: Some(4),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(truncated, canonical[..4].to_vec());
    }

    #[test]
    fn test_truncate_after_shuffle() {
        let layers = layers_of(&[3, 4]);
        let full = Selection {
            randomize: true,
            seed: Some(99),
            amount: None,
        };
        let capped = Selection {
            amount: Some(5),
            ..full
        };

        let shuffled = generate_combinations(&layers, &full).unwrap();
        let truncated = generate_combinations(&layers, &capped).unwrap();

        assert_eq!(truncated.len(), 5);
        assert_eq!(truncated, shuffled[..5].to_vec());
    }

    #[test]
    fn test_amount_larger_than_total() {
        let layers = layers_of(&[2, 2]);
        let combos = generate_combinations(
            &layers,
            &Selection {
                amount: Some(100),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(combos.len(), 4);
    }
}
