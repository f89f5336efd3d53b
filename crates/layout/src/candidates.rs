use adframe_core::{Cell, LayoutResult};
use tracing::debug;

use crate::category::Category;
use crate::policy::PolicyTable;

/// Expands element categories into the grid cells each one may occupy.
#[derive(Debug, Clone, Copy)]
pub struct CandidateGenerator<'a> {
    policy: &'a PolicyTable,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(policy: &'a PolicyTable) -> Self {
        Self { policy }
    }

    /// Candidate cells for every category, in input order.
    ///
    /// Each list is the Cartesian product of the category's vertical and
    /// horizontal preferences, vertical-major.
    pub fn compute_positions(&self, categories: &[Category]) -> LayoutResult<Vec<Vec<Cell>>> {
        categories
            .iter()
            .map(|category| self.candidates_for(*category))
            .collect()
    }

    pub fn candidates_for(&self, category: Category) -> LayoutResult<Vec<Cell>> {
        let vertical = self.policy.vertical_options(category)?;
        let horizontal = self.policy.horizontal_options(category)?;

        let cells: Vec<Cell> = vertical
            .iter()
            .flat_map(|v| horizontal.iter().map(move |h| Cell::new(*v, *h)))
            .collect();

        debug!(%category, count = cells.len(), "computed candidate cells");
        Ok(cells)
    }
}
