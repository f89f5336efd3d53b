//! Category placement policy: which vertical and horizontal bands each
//! element category may occupy, in preference order.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use adframe_core::Band::{First as B1, Last as B3, Middle as B2};
use adframe_core::{Band, LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::category::Category;

/// Immutable category-to-band preference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolicyTable")]
pub struct PolicyTable {
    vertical: HashMap<Category, Vec<Band>>,
    horizontal: HashMap<Category, Vec<Band>>,
}

#[derive(Deserialize)]
struct RawPolicyTable {
    vertical: HashMap<Category, Vec<Band>>,
    horizontal: HashMap<Category, Vec<Band>>,
}

impl TryFrom<RawPolicyTable> for PolicyTable {
    type Error = LayoutError;

    fn try_from(raw: RawPolicyTable) -> Result<Self, Self::Error> {
        PolicyTable::new(raw.vertical, raw.horizontal)
    }
}

impl PolicyTable {
    /// Build a table, rejecting empty preference lists, mismatched key sets,
    /// and entries for `Background`.
    pub fn new(
        vertical: HashMap<Category, Vec<Band>>,
        horizontal: HashMap<Category, Vec<Band>>,
    ) -> LayoutResult<Self> {
        let v_keys: BTreeSet<_> = vertical.keys().copied().collect();
        let h_keys: BTreeSet<_> = horizontal.keys().copied().collect();
        if let Some(missing) = v_keys.symmetric_difference(&h_keys).next() {
            return Err(LayoutError::InvalidPolicy(format!(
                "{missing} must have both vertical and horizontal preferences"
            )));
        }
        if v_keys.contains(&Category::Background) {
            return Err(LayoutError::InvalidPolicy(
                "Background is never placed and cannot have preferences".to_string(),
            ));
        }
        for (axis, map) in [("vertical", &vertical), ("horizontal", &horizontal)] {
            if let Some((category, _)) = map.iter().find(|(_, bands)| bands.is_empty()) {
                return Err(LayoutError::InvalidPolicy(format!(
                    "{category} has an empty {axis} preference list"
                )));
            }
        }
        Ok(Self {
            vertical,
            horizontal,
        })
    }

    /// Built-in placement policy.
    pub fn builtin() -> Self {
        let entries: [(Category, &[Band], &[Band]); 22] = [
            (Category::Logo, &[B1], &[B1]),
            (Category::CtaButton, &[B1, B2, B3], &[B2, B1, B3]),
            (Category::Icon, &[B1, B2, B3], &[B1]),
            (Category::ProductImage, &[B2], &[B1]),
            (Category::TextElements, &[B1, B3], &[B1]),
            (Category::Infographic, &[B2], &[B1]),
            (Category::Banner, &[B1], &[B2]),
            (Category::Illustration, &[B2], &[B2]),
            (Category::Photograph, &[B2], &[B2]),
            (Category::Mascot, &[B2], &[B1]),
            (Category::TestimonialQuotes, &[B2], &[B2]),
            (Category::SocialProof, &[B2, B1, B3], &[B3, B1, B2]),
            (Category::SealOrBadge, &[B3, B1, B2], &[B3, B1, B2]),
            (Category::GraphsAndCharts, &[B2], &[B1]),
            (Category::DecorativeElements, &[B3], &[B3]),
            (Category::InteractiveElements, &[B2], &[B2]),
            (Category::Animation, &[B2], &[B2]),
            (Category::CouponOrOfferCode, &[B3], &[B3]),
            (Category::LegalDisclaimers, &[B3], &[B3]),
            (Category::ContactInformation, &[B3, B1, B2], &[B3, B1, B2]),
            (Category::MapOrLocationImage, &[B3], &[B3]),
            (Category::QrCode, &[B3, B1, B2], &[B3, B1, B2]),
        ];

        let mut vertical = HashMap::with_capacity(entries.len());
        let mut horizontal = HashMap::with_capacity(entries.len());
        for (category, v, h) in entries {
            vertical.insert(category, v.to_vec());
            horizontal.insert(category, h.to_vec());
        }
        Self {
            vertical,
            horizontal,
        }
    }

    /// Load a table from a JSON file of the form
    /// `{"vertical": {"Logo": [1]}, "horizontal": {"Logo": [1]}}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> LayoutResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let table: PolicyTable = serde_json::from_str(&raw)?;
        info!(path = %path.display(), categories = table.len(), "loaded placement policy");
        Ok(table)
    }

    pub fn vertical_options(&self, category: Category) -> LayoutResult<&[Band]> {
        self.vertical
            .get(&category)
            .map(Vec::as_slice)
            .ok_or_else(|| LayoutError::UnknownCategory(category.to_string()))
    }

    pub fn horizontal_options(&self, category: Category) -> LayoutResult<&[Band]> {
        self.horizontal
            .get(&category)
            .map(Vec::as_slice)
            .ok_or_else(|| LayoutError::UnknownCategory(category.to_string()))
    }

    pub fn contains(&self, category: Category) -> bool {
        self.vertical.contains_key(&category)
    }

    /// Categories with an entry, in declaration order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.contains(*c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.vertical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}
