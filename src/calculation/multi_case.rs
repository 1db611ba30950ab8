//! Multi-case allowance and cap functionality.
//!
//! When a parent has children in other child support cases, two
//! mechanisms stop their income being counted twice: the multi-case
//! allowance (an income deduction derived from the other-case children
//! via the same-age rule) and the multi-case cap (a ceiling on each
//! per-child liability based on what the child would cost on the
//! parent's income alone). The minimum and fixed annual rates carry
//! their own cross-case caps.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::RateTable;
use crate::models::{AgeRange, ChildAssessment, OtherCaseChild};

use super::cost_of_children::cost_of_children;

/// The most cases the minimum annual rate is payable for in full.
pub const MINIMUM_RATE_MAX_CASES: usize = 3;

/// Flags recording whether a multi-case cap reduced either parent's
/// liability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiCaseCapOutcome {
    /// True if any of Parent A's per-child liabilities were capped.
    pub cap_applied_a: bool,
    /// True if any of Parent B's per-child liabilities were capped.
    pub cap_applied_b: bool,
}

/// Rounds to whole dollars, half away from zero.
fn round_dollars(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculates a parent's multi-case allowance.
///
/// Implements the same-age rule: for each other-case child, the cost is
/// taken as if all of the parent's children (this case plus other cases)
/// shared that child's age, costed on the parent's own income less the
/// self-support amount; that child's equal share of the cost is the
/// allowance contribution. The total rounds to whole dollars.
///
/// # Arguments
///
/// * `parent_income` - The parent's income less the self-support amount,
///   clamped at zero
/// * `current_case_ages` - Ages of the children in this case
/// * `other_case_children` - The parent's children in other cases
/// * `table` - The rate table for the assessment year
pub fn multi_case_allowance(
    parent_income: Decimal,
    current_case_ages: &[u8],
    other_case_children: &[OtherCaseChild],
    table: &RateTable,
) -> Decimal {
    if other_case_children.is_empty() || parent_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let total_child_count = current_case_ages.len() + other_case_children.len();
    let mut allowance = Decimal::ZERO;

    for other_child in other_case_children {
        let age_range = AgeRange::from_age(other_child.age);
        if age_range == AgeRange::Adult {
            continue;
        }

        let age_ranges = vec![age_range; total_child_count];
        let total_cost = cost_of_children(parent_income, &age_ranges, table).total_cost;
        allowance += total_cost / Decimal::from(total_child_count as u64);
    }

    round_dollars(allowance)
}

/// Calculates the per-child cost of all of a parent's children on the
/// parent's income alone.
///
/// Used for the multi-case cap: the cap must reflect what the children
/// cost the parent individually, not the combined income. Adult children
/// are excluded; a list with no eligible children costs zero.
pub fn solo_cost_per_child(
    parent_income: Decimal,
    current_case_ages: &[u8],
    other_case_children: &[OtherCaseChild],
    table: &RateTable,
) -> Decimal {
    let age_ranges: Vec<AgeRange> = current_case_ages
        .iter()
        .copied()
        .chain(other_case_children.iter().map(|c| c.age))
        .map(AgeRange::from_age)
        .filter(|r| *r != AgeRange::Adult)
        .collect();

    if age_ranges.is_empty() {
        return Decimal::ZERO;
    }

    let total_cost = cost_of_children(parent_income, &age_ranges, table).total_cost;
    total_cost / Decimal::from(age_ranges.len() as u64)
}

/// Calculates the multi-case cap for one child.
///
/// `cap = multi-case child cost × (100 − parent's cost percentage) / 100`,
/// rounded to whole dollars.
pub fn multi_case_cap(multi_case_child_cost: Decimal, cost_percentage: Decimal) -> Decimal {
    let hundred = Decimal::from(100);
    round_dollars(multi_case_child_cost * ((hundred - cost_percentage) / hundred))
}

/// Applies the multi-case cap to each child's liabilities.
///
/// For each parent with other cases, each assessable child's cap is
/// computed from the parent's solo per-child cost and recorded on the
/// assessment. When the parent's total liability for the child
/// (inter-parent plus non-parent-carer) exceeds the cap, both components
/// shrink proportionally so the total equals the cap.
pub fn apply_multi_case_caps(
    children: &mut [ChildAssessment],
    solo_cost_a: Option<Decimal>,
    solo_cost_b: Option<Decimal>,
) -> MultiCaseCapOutcome {
    let mut outcome = MultiCaseCapOutcome::default();

    for child in children.iter_mut().filter(|c| !c.adult_child) {
        if let Some(solo_cost) = solo_cost_a {
            let cap = multi_case_cap(solo_cost, child.cost_percentage_a);
            child.multi_case_cap_a = Some(cap);

            let total = child.final_liability_a + child.liability_to_npc_a;
            if total > cap {
                outcome.cap_applied_a = true;
                child.multi_case_cap_applied_a = true;

                let ratio = cap / total;
                child.final_liability_a = round_dollars(child.final_liability_a * ratio);
                child.liability_to_npc_a = round_dollars(child.liability_to_npc_a * ratio);
            }
        }

        if let Some(solo_cost) = solo_cost_b {
            let cap = multi_case_cap(solo_cost, child.cost_percentage_b);
            child.multi_case_cap_b = Some(cap);

            let total = child.final_liability_b + child.liability_to_npc_b;
            if total > cap {
                outcome.cap_applied_b = true;
                child.multi_case_cap_applied_b = true;

                let ratio = cap / total;
                child.final_liability_b = round_dollars(child.final_liability_b * ratio);
                child.liability_to_npc_b = round_dollars(child.liability_to_npc_b * ratio);
            }
        }
    }

    outcome
}

/// Returns the minimum annual rate payable per case, applying the
/// three-case cap.
///
/// A parent in more than three cases pays `3 × MAR ÷ total cases` per
/// case (rounded to whole dollars) instead of the full rate in each.
/// The second element reports whether the cap applied.
pub fn minimum_rate_case_share(table: &RateTable, total_cases: usize) -> (Decimal, bool) {
    if total_cases <= MINIMUM_RATE_MAX_CASES {
        return (table.minimum_annual_rate, false);
    }

    let capped = round_dollars(
        table.minimum_annual_rate * Decimal::from(MINIMUM_RATE_MAX_CASES as u64)
            / Decimal::from(total_cases as u64),
    );
    (capped, true)
}

/// Returns the fixed annual rate payable per child, applying the
/// three-child cap across cases.
///
/// When the fixed rate covers more than three children across a parent's
/// cases, the per-child amount is `3 × FAR ÷ child count`, rounded to
/// whole dollars. The second element reports whether the cap applied.
pub fn fixed_rate_child_share(table: &RateTable, fixed_rate_children: usize) -> (Decimal, bool) {
    if fixed_rate_children <= super::rates::FIXED_RATE_MAX_CHILDREN {
        return (table.fixed_annual_rate, false);
    }

    let capped = round_dollars(
        table.fixed_annual_rate * Decimal::from(super::rates::FIXED_RATE_MAX_CHILDREN as u64)
            / Decimal::from(fixed_rate_children as u64),
    );
    (capped, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn table_2026() -> RateTable {
        ConfigLoader::load("./config/csa")
            .unwrap()
            .rate_table(2026)
            .unwrap()
            .clone()
    }

    fn assessment(cost_a: &str, final_a: &str, npc_a: &str) -> ChildAssessment {
        ChildAssessment {
            child_id: "child_001".to_string(),
            age_years: 8,
            age_range: AgeRange::Under13,
            adult_child: false,
            turning_18: false,
            care_percentage_a: dec("0"),
            care_percentage_b: dec("100"),
            care_percentage_npc: None,
            cost_percentage_a: dec(cost_a),
            cost_percentage_b: dec("100"),
            cost_percentage_npc: None,
            child_support_percentage_a: Some(dec("60")),
            child_support_percentage_b: Some(dec("-60")),
            cost_per_child: dec("9000"),
            standard_liability_a: dec(final_a),
            standard_liability_b: dec("0"),
            final_liability_a: dec(final_a),
            final_liability_b: dec("0"),
            liability_to_npc_a: dec(npc_a),
            liability_to_npc_b: dec("0"),
            fixed_rate_applied_a: false,
            fixed_rate_applied_b: false,
            minimum_rate_applied_a: false,
            minimum_rate_applied_b: false,
            multi_case_cap_a: None,
            multi_case_cap_b: None,
            multi_case_cap_applied_a: false,
            multi_case_cap_applied_b: false,
        }
    }

    /// MC-001: no other cases means no allowance
    #[test]
    fn test_no_other_cases_no_allowance() {
        let table = table_2026();
        let allowance = multi_case_allowance(dec("48954"), &[8, 5], &[], &table);
        assert_eq!(allowance, dec("0"));
    }

    /// MC-002: same-age rule costs all children at the other child's age
    #[test]
    fn test_same_age_rule_allowance() {
        let table = table_2026();
        let other = [OtherCaseChild { age: 7 }];

        let allowance = multi_case_allowance(dec("48954"), &[8], &other, &table);

        // Two virtual children aged 7 (0-12 set): 11177 + 0.23 * 2385,
        // one child's share is half, rounded to whole dollars.
        let total = dec("11177") + dec("0.23") * dec("2385");
        let expected = (total / dec("2")).round_dp_with_strategy(
            0,
            RoundingStrategy::MidpointAwayFromZero,
        );
        assert_eq!(allowance, expected);
    }

    /// MC-003: adult other-case children contribute nothing
    #[test]
    fn test_adult_other_case_child_contributes_nothing() {
        let table = table_2026();
        let other = [OtherCaseChild { age: 19 }];

        let allowance = multi_case_allowance(dec("48954"), &[8], &other, &table);
        assert_eq!(allowance, dec("0"));
    }

    /// MC-004: zero income means zero allowance
    #[test]
    fn test_zero_income_zero_allowance() {
        let table = table_2026();
        let other = [OtherCaseChild { age: 7 }];

        let allowance = multi_case_allowance(dec("0"), &[8], &other, &table);
        assert_eq!(allowance, dec("0"));
    }

    /// MC-005: solo cost divides across all eligible children
    #[test]
    fn test_solo_cost_per_child() {
        let table = table_2026();
        let other = [OtherCaseChild { age: 7 }];

        let solo = solo_cost_per_child(dec("48954"), &[8], &other, &table);

        let total = dec("11177") + dec("0.23") * dec("2385");
        assert_eq!(solo, total / dec("2"));
    }

    /// MC-006: the cap is the cost share the parent does not cover through care
    #[test]
    fn test_multi_case_cap_formula() {
        assert_eq!(multi_case_cap(dec("6000"), dec("0")), dec("6000"));
        assert_eq!(multi_case_cap(dec("6000"), dec("25")), dec("4500"));
        assert_eq!(multi_case_cap(dec("6000"), dec("100")), dec("0"));
    }

    /// MC-007: cap reduces inter-parent and NPC liabilities proportionally
    #[test]
    fn test_cap_reduces_proportionally() {
        let mut children = vec![assessment("0", "4000", "2000")];

        let outcome = apply_multi_case_caps(&mut children, Some(dec("3000")), None);

        assert!(outcome.cap_applied_a);
        assert!(children[0].multi_case_cap_applied_a);
        assert_eq!(children[0].multi_case_cap_a, Some(dec("3000")));
        // 4000 + 2000 capped to 3000: ratio 0.5
        assert_eq!(children[0].final_liability_a, dec("2000"));
        assert_eq!(children[0].liability_to_npc_a, dec("1000"));
    }

    /// MC-008: liability under the cap is untouched
    #[test]
    fn test_liability_under_cap_untouched() {
        let mut children = vec![assessment("0", "2500", "0")];

        let outcome = apply_multi_case_caps(&mut children, Some(dec("3000")), None);

        assert!(!outcome.cap_applied_a);
        assert!(!children[0].multi_case_cap_applied_a);
        assert_eq!(children[0].multi_case_cap_a, Some(dec("3000")));
        assert_eq!(children[0].final_liability_a, dec("2500"));
    }

    /// MC-009: minimum rate three-case cap
    #[test]
    fn test_minimum_rate_case_share() {
        let table = table_2026();

        let (full, capped) = minimum_rate_case_share(&table, 3);
        assert_eq!(full, dec("551"));
        assert!(!capped);

        let (share, capped) = minimum_rate_case_share(&table, 5);
        // 3 * 551 / 5 = 330.6, rounds to 331
        assert_eq!(share, dec("331"));
        assert!(capped);
    }

    /// MC-010: fixed rate three-child cap
    #[test]
    fn test_fixed_rate_child_share() {
        let table = table_2026();

        let (full, capped) = fixed_rate_child_share(&table, 3);
        assert_eq!(full, dec("1825"));
        assert!(!capped);

        let (share, capped) = fixed_rate_child_share(&table, 4);
        // 3 * 1825 / 4 = 1368.75, rounds to 1369
        assert_eq!(share, dec("1369"));
        assert!(capped);
    }
}
