//! Configuration types for child support assessment.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML rate-table files.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Metadata about the assessment scheme.
///
/// Contains identifying information about the statutory formula the rate
/// tables implement, including the administering authority and a source
/// URL for the published figures.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemeMetadata {
    /// The human-readable name of the scheme.
    pub name: String,
    /// The authority that administers the scheme.
    pub authority: String,
    /// The version or publication date of the figures.
    pub version: String,
    /// URL to the official guide documentation.
    pub source_url: String,
}

/// A single band of the care percentage to cost percentage conversion.
///
/// Cost percentage within a band is `base_cost + per_point * (care - care_low)`,
/// so a band with `per_point` of zero is flat and a non-zero `per_point`
/// interpolates linearly across the band.
#[derive(Debug, Clone, Deserialize)]
pub struct CareCostBand {
    /// Lowest rounded care percentage covered by this band (inclusive).
    pub care_low: Decimal,
    /// Highest rounded care percentage covered by this band (inclusive).
    pub care_high: Decimal,
    /// Cost percentage at the bottom of the band.
    pub base_cost: Decimal,
    /// Additional cost percentage per care point above `care_low`.
    pub per_point: Decimal,
}

/// Care-cost conversion file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct CareCostConfig {
    /// Ordered bands covering 0-100% care with no gaps.
    pub bands: Vec<CareCostBand>,
}

/// A single income bracket of a cost-of-children table.
///
/// The cost for a combined income inside the bracket is
/// `fixed_amount + marginal_rate * (income - min_income)`.
#[derive(Debug, Clone, Deserialize)]
pub struct CostBracket {
    /// Lower income bound of the bracket (inclusive).
    pub min_income: Decimal,
    /// Upper income bound of the bracket (exclusive); `None` means unbounded.
    pub max_income: Option<Decimal>,
    /// Cost accumulated by the brackets below this one.
    pub fixed_amount: Decimal,
    /// Marginal rate applied to income within this bracket.
    pub marginal_rate: Decimal,
}

/// An ordered, contiguous set of cost brackets for one age group and
/// child count, together with the cap on the total cost.
#[derive(Debug, Clone, Deserialize)]
pub struct CostBracketSet {
    /// The maximum annual cost of the children for this set.
    pub max_cost: Decimal,
    /// Brackets ordered by `min_income`, exhaustive from zero.
    pub brackets: Vec<CostBracket>,
}

/// Cost bracket sets for a single age group, keyed by child count.
#[derive(Debug, Clone, Deserialize)]
pub struct AgeGroupCosts {
    /// Bracket set for one child.
    pub one_child: CostBracketSet,
    /// Bracket set for two children.
    pub two_children: CostBracketSet,
    /// Bracket set for three or more children.
    pub three_plus_children: CostBracketSet,
}

/// Cost bracket sets for a mixed-age sibling group.
///
/// A mixed group needs at least one child from each age group, so there
/// is no one-child set.
#[derive(Debug, Clone, Deserialize)]
pub struct MixedAgeCosts {
    /// Bracket set for two children.
    pub two_children: CostBracketSet,
    /// Bracket set for three or more children.
    pub three_plus_children: CostBracketSet,
}

/// The complete cost-of-children table for one assessment year.
#[derive(Debug, Clone, Deserialize)]
pub struct CostOfChildrenTable {
    /// Sets for children aged 0-12.
    pub age_0_12: AgeGroupCosts,
    /// Sets for children aged 13 and over.
    pub age_13_plus: AgeGroupCosts,
    /// Sets for sibling groups spanning both age groups.
    pub mixed: MixedAgeCosts,
}

/// The age-group key used to select a cost bracket set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostAgeGroup {
    /// All eligible children are aged 0-12.
    Age0To12,
    /// All eligible children are aged 13 or over.
    Age13Plus,
    /// The eligible children span both age groups.
    Mixed,
}

/// Rate table for a single assessment year.
#[derive(Debug, Clone, Deserialize)]
pub struct RateTable {
    /// The assessment year these rates apply to.
    pub year: u16,
    /// The self-support amount deducted from each parent's income.
    pub self_support_amount: Decimal,
    /// The fixed annual rate, payable per child for up to three children.
    pub fixed_annual_rate: Decimal,
    /// The minimum annual rate, payable once per case.
    pub minimum_annual_rate: Decimal,
    /// Income ceiling for fixed annual rate eligibility (the maximum
    /// annual Parenting Payment single amount).
    pub fixed_rate_income_ceiling: Decimal,
    /// Combined income cap; income above this is costed at the table maximum.
    pub income_cap: Decimal,
    /// The cost-of-children bracket sets for this year.
    pub cost_of_children: CostOfChildrenTable,
}

impl RateTable {
    /// Selects the cost bracket set for an age group and child count.
    ///
    /// Child counts above three use the three-child set, matching the
    /// published tables which stop at "3+ children". A mixed group with a
    /// single child falls back to the 0-12 set.
    pub fn bracket_set(&self, group: CostAgeGroup, child_count: usize) -> &CostBracketSet {
        let group = if group == CostAgeGroup::Mixed && child_count < 2 {
            CostAgeGroup::Age0To12
        } else {
            group
        };

        match group {
            CostAgeGroup::Age0To12 => match child_count {
                0 | 1 => &self.cost_of_children.age_0_12.one_child,
                2 => &self.cost_of_children.age_0_12.two_children,
                _ => &self.cost_of_children.age_0_12.three_plus_children,
            },
            CostAgeGroup::Age13Plus => match child_count {
                0 | 1 => &self.cost_of_children.age_13_plus.one_child,
                2 => &self.cost_of_children.age_13_plus.two_children,
                _ => &self.cost_of_children.age_13_plus.three_plus_children,
            },
            CostAgeGroup::Mixed => match child_count {
                2 => &self.cost_of_children.mixed.two_children,
                _ => &self.cost_of_children.mixed.three_plus_children,
            },
        }
    }
}

/// The complete scheme configuration loaded from YAML files.
///
/// This struct aggregates the metadata, care-cost conversion bands and
/// the per-year rate tables loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct SchemeConfig {
    /// Scheme metadata.
    metadata: SchemeMetadata,
    /// Care percentage to cost percentage conversion bands.
    care_cost_bands: Vec<CareCostBand>,
    /// Rate tables by assessment year (sorted oldest first).
    rate_tables: Vec<RateTable>,
}

impl SchemeConfig {
    /// Creates a new SchemeConfig from its component parts.
    pub fn new(
        metadata: SchemeMetadata,
        care_cost_bands: Vec<CareCostBand>,
        rate_tables: Vec<RateTable>,
    ) -> Self {
        let mut sorted_tables = rate_tables;
        sorted_tables.sort_by_key(|t| t.year);
        Self {
            metadata,
            care_cost_bands,
            rate_tables: sorted_tables,
        }
    }

    /// Returns the scheme metadata.
    pub fn scheme(&self) -> &SchemeMetadata {
        &self.metadata
    }

    /// Returns the care-cost conversion bands.
    pub fn care_cost_bands(&self) -> &[CareCostBand] {
        &self.care_cost_bands
    }

    /// Returns all rate tables, oldest year first.
    pub fn rate_tables(&self) -> &[RateTable] {
        &self.rate_tables
    }
}
