use std::collections::HashMap;

use adframe_core::{Cell, LayoutError, LayoutResult};
use rand::seq::SliceRandom;
use rand::Rng;

/// How often each grid cell has been chosen so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyCounter {
    counts: HashMap<Cell, u32>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, cell: Cell) -> u32 {
        self.counts.get(&cell).copied().unwrap_or(0)
    }

    pub fn record(&mut self, cell: Cell) {
        *self.counts.entry(cell).or_insert(0) += 1;
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }

    /// Per-cell counts for all nine cells, vertical-major.
    pub fn snapshot(&self) -> Vec<(Cell, u32)> {
        Cell::all().map(|c| (c, self.get(c))).collect()
    }
}

/// Greedy, order-dependent cell picker that steers each element toward the
/// least-used of its allowed cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiversePositionSelector;

impl DiversePositionSelector {
    pub fn new() -> Self {
        Self
    }

    /// Pick one cell per candidate list, in input order.
    ///
    /// For each element the minimum count among its candidates is found, and
    /// one of the candidates at that count is chosen uniformly at random. The
    /// choice is recorded in `counter` before moving to the next element, so
    /// a counter carried across calls spreads placements across frames too.
    ///
    /// Every list is checked up front; on error `counter` is left untouched.
    pub fn select<R: Rng + ?Sized>(
        &self,
        candidates: &[Vec<Cell>],
        counter: &mut FrequencyCounter,
        rng: &mut R,
    ) -> LayoutResult<Vec<Cell>> {
        if let Some(index) = candidates.iter().position(Vec::is_empty) {
            return Err(LayoutError::EmptyCandidates { index });
        }

        let mut selected = Vec::with_capacity(candidates.len());
        for options in candidates {
            let lowest = options
                .iter()
                .map(|c| counter.get(*c))
                .min()
                .unwrap_or(0);
            let tied: Vec<Cell> = options
                .iter()
                .copied()
                .filter(|c| counter.get(*c) == lowest)
                .collect();

            let choice = *tied
                .choose(rng)
                .ok_or(LayoutError::EmptyCandidates {
                    index: selected.len(),
                })?;
            counter.record(choice);
            selected.push(choice);
        }
        Ok(selected)
    }
}

/// One-shot selection with a fresh frequency counter.
pub fn select_diverse_positions<R: Rng + ?Sized>(
    candidates: &[Vec<Cell>],
    rng: &mut R,
) -> LayoutResult<Vec<Cell>> {
    DiversePositionSelector::new().select(candidates, &mut FrequencyCounter::new(), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cell(v: u8, h: u8) -> Cell {
        Cell::from_indices(v, h).unwrap()
    }

    #[test]
    fn test_avoids_used_cells_when_alternatives_exist() {
        let mut rng = StdRng::seed_from_u64(42);
        let candidates = vec![
            vec![cell(1, 1)],
            vec![cell(1, 1), cell(2, 1), cell(3, 1)],
            vec![cell(1, 1), cell(2, 1), cell(3, 1)],
            vec![cell(1, 1), cell(2, 1), cell(3, 1)],
        ];
        let selected = select_diverse_positions(&candidates, &mut rng).unwrap();
        assert_eq!(selected[0], cell(1, 1));
        assert_ne!(selected[1], cell(1, 1));
        // after (1,1) and one other are used, the third list has one zero-count cell left
        let mut remaining = vec![cell(2, 1), cell(3, 1)];
        remaining.retain(|c| *c != selected[1]);
        assert_eq!(selected[2], remaining[0]);
        // all three now at count 1, so any is allowed
        assert!(candidates[3].contains(&selected[3]));
    }

    #[test]
    fn test_single_candidate_always_chosen() {
        let mut rng = StdRng::seed_from_u64(1);
        let candidates = vec![vec![cell(2, 2)]; 4];
        let selected = select_diverse_positions(&candidates, &mut rng).unwrap();
        assert_eq!(selected, vec![cell(2, 2); 4]);
    }

    #[test]
    fn test_same_seed_same_selection() {
        let candidates: Vec<Vec<Cell>> = vec![Cell::all().collect(); 6];
        let a = select_diverse_positions(&candidates, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = select_diverse_positions(&candidates, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_nine_elements_fill_nine_cells() {
        let mut rng = StdRng::seed_from_u64(3);
        let candidates: Vec<Vec<Cell>> = vec![Cell::all().collect(); 9];
        let mut selected = select_diverse_positions(&candidates, &mut rng).unwrap();
        selected.sort();
        selected.dedup();
        assert_eq!(selected.len(), 9);
    }

    #[test]
    fn test_shared_counter_carries_across_calls() {
        let selector = DiversePositionSelector::new();
        let mut counter = FrequencyCounter::new();
        let mut rng = StdRng::seed_from_u64(5);
        let candidates = vec![vec![cell(1, 1), cell(1, 2)]];

        let first = selector.select(&candidates, &mut counter, &mut rng).unwrap();
        let second = selector.select(&candidates, &mut counter, &mut rng).unwrap();
        assert_ne!(first[0], second[0]);
        assert_eq!(counter.total(), 2);
    }

    #[test]
    fn test_empty_candidate_list_rejected_without_side_effects() {
        let selector = DiversePositionSelector::new();
        let mut counter = FrequencyCounter::new();
        let mut rng = StdRng::seed_from_u64(0);
        let err = selector
            .select(&[vec![cell(1, 1)], vec![]], &mut counter, &mut rng)
            .unwrap_err();
        assert!(matches!(err, LayoutError::EmptyCandidates { index: 1 }));
        assert_eq!(counter.total(), 0);
    }

    #[test]
    fn test_spread_beats_first_choice() {
        // Always picking the first candidate puts every element in one cell.
        let mut rng = StdRng::seed_from_u64(2024);
        let candidates: Vec<Vec<Cell>> = vec![
            vec![cell(1, 2), cell(1, 1), cell(1, 3), cell(2, 2)],
            vec![cell(1, 2), cell(1, 1), cell(1, 3), cell(2, 2)],
            vec![cell(1, 2), cell(1, 1), cell(1, 3), cell(2, 2)],
        ];
        let mut totals = FrequencyCounter::new();
        for _ in 0..500 {
            for c in select_diverse_positions(&candidates, &mut rng).unwrap() {
                totals.record(c);
            }
        }
        let used: Vec<u32> = totals
            .snapshot()
            .into_iter()
            .map(|(_, n)| n)
            .filter(|n| *n > 0)
            .collect();
        assert_eq!(used.len(), 4);
        let max = *used.iter().max().unwrap();
        assert!(max < 1500 / 2, "selection concentrated: {used:?}");
    }

    fn candidate_lists() -> impl Strategy<Value = Vec<Vec<Cell>>> {
        let cell = (1u8..=3, 1u8..=3).prop_map(|(v, h)| Cell::from_indices(v, h).unwrap());
        prop::collection::vec(prop::collection::vec(cell, 1..6), 0..12)
    }

    proptest! {
        #[test]
        fn prop_one_cell_per_list_drawn_from_that_list(
            lists in candidate_lists(),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = select_diverse_positions(&lists, &mut rng).unwrap();
            prop_assert_eq!(selected.len(), lists.len());
            for (choice, options) in selected.iter().zip(&lists) {
                prop_assert!(options.contains(choice));
            }
        }
    }
}
