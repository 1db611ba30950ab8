//! Cost-of-children calculation functionality.
//!
//! This module determines the total annual cost of the children from the
//! combined child support income using the bracket-based progressive
//! rates of the selected year's rate table.

use rust_decimal::Decimal;

use crate::config::{CostAgeGroup, RateTable};
use crate::models::{AgeRange, CostBracketDetail};

/// The result of a cost-of-children lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostOfChildrenResult {
    /// The total annual cost of the children.
    pub total_cost: Decimal,
    /// The equal per-child share of the total cost.
    pub cost_per_child: Decimal,
    /// The bracket the combined income fell into.
    pub bracket: CostBracketDetail,
}

impl CostOfChildrenResult {
    fn empty() -> Self {
        Self {
            total_cost: Decimal::ZERO,
            cost_per_child: Decimal::ZERO,
            bracket: CostBracketDetail {
                min_income: Decimal::ZERO,
                max_income: None,
                fixed_amount: Decimal::ZERO,
                marginal_rate: Decimal::ZERO,
                income_in_bracket: Decimal::ZERO,
            },
        }
    }
}

/// Determines the age-group key for a set of eligible children.
///
/// A group containing both under-13 and 13+ children is mixed. Adult
/// children must be filtered out before calling; they never contribute
/// to the cost of children.
pub fn cost_age_group(age_ranges: &[AgeRange]) -> CostAgeGroup {
    let has_younger = age_ranges.iter().any(|r| *r == AgeRange::Under13);
    let has_older = age_ranges.iter().any(|r| *r == AgeRange::ThirteenPlus);

    if has_younger && has_older {
        CostAgeGroup::Mixed
    } else if has_older {
        CostAgeGroup::Age13Plus
    } else {
        CostAgeGroup::Age0To12
    }
}

/// Calculates the total annual cost of the children.
///
/// Selects the bracket set matching the eligible children's age group
/// and count (counts above three use the three-child set), finds the
/// bracket containing the combined income, and applies
/// `fixed_amount + marginal_rate * (income - min_income)`, capped at the
/// set's maximum cost. The total divides equally across the eligible
/// children.
///
/// An empty child list yields a zero-cost result.
///
/// # Arguments
///
/// * `combined_income` - The combined child support income (CCSI)
/// * `age_ranges` - Age ranges of the eligible (non-adult) children
/// * `table` - The rate table for the assessment year
pub fn cost_of_children(
    combined_income: Decimal,
    age_ranges: &[AgeRange],
    table: &RateTable,
) -> CostOfChildrenResult {
    let child_count = age_ranges.len();
    if child_count == 0 {
        return CostOfChildrenResult::empty();
    }

    let group = cost_age_group(age_ranges);
    let set = table.bracket_set(group, child_count);

    // Brackets are contiguous and exhaustive from zero, with the last
    // bracket unbounded, so a non-negative income always matches.
    let Some(bracket) = set
        .brackets
        .iter()
        .find(|b| {
            combined_income >= b.min_income
                && b.max_income.is_none_or(|max| combined_income < max)
        })
        .or_else(|| set.brackets.last())
    else {
        return CostOfChildrenResult::empty();
    };

    let income_in_bracket = (combined_income - bracket.min_income).max(Decimal::ZERO);
    let raw_cost = bracket.fixed_amount + bracket.marginal_rate * income_in_bracket;
    let total_cost = raw_cost.min(set.max_cost);

    CostOfChildrenResult {
        total_cost,
        cost_per_child: total_cost / Decimal::from(child_count as u64),
        bracket: CostBracketDetail {
            min_income: bracket.min_income,
            max_income: bracket.max_income,
            fixed_amount: bracket.fixed_amount,
            marginal_rate: bracket.marginal_rate,
            income_in_bracket,
        },
    }
}
