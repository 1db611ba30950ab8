//! Income calculation functionality.
//!
//! This module computes each parent's child support income (CSI) from
//! their adjusted taxable income, the relevant dependent allowance, and
//! the income percentages derived from the combined income.

use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::models::{AgeRange, ParentIncome, RelevantDependents};

use super::cost_of_children::cost_of_children;

/// Representative ages used for relevant dependent virtual children.
///
/// The allowance is costed as if each dependent were a child of a
/// representative age for their age group: 6 for under-13 dependents and
/// 14 for 13+ dependents.
const REPRESENTATIVE_AGE_RANGES: (AgeRange, AgeRange) = (AgeRange::Under13, AgeRange::ThirteenPlus);

/// Computes a parent's child support income.
///
/// `CSI = max(0, ati - self_support_amount - relevant_dependent_allowance
/// - multi_case_allowance)`. The result is clamped at zero; use
/// [`income_breakdown`] when the signed surplus is also needed.
///
/// # Examples
///
/// ```
/// use assessment_engine::calculation::child_support_income;
/// use rust_decimal::Decimal;
///
/// let csi = child_support_income(
///     Decimal::from(80000),
///     Decimal::from(31046),
///     Decimal::ZERO,
///     Decimal::ZERO,
/// );
/// assert_eq!(csi, Decimal::from(48954));
/// ```
pub fn child_support_income(
    ati: Decimal,
    self_support_amount: Decimal,
    relevant_dependent_allowance: Decimal,
    multi_case_allowance: Decimal,
) -> Decimal {
    (ati - self_support_amount - relevant_dependent_allowance - multi_case_allowance)
        .max(Decimal::ZERO)
}

/// Computes a parent's full income breakdown.
///
/// The breakdown keeps the signed surplus (which may be negative) so a
/// consumer can show the true deficit; only the final child support
/// income is clamped at zero.
pub fn income_breakdown(
    ati: Decimal,
    self_support_amount: Decimal,
    relevant_dependent_allowance: Decimal,
    multi_case_allowance: Decimal,
) -> ParentIncome {
    let surplus = ati - self_support_amount - relevant_dependent_allowance - multi_case_allowance;

    ParentIncome {
        adjusted_taxable_income: ati,
        self_support_amount,
        relevant_dependent_allowance,
        multi_case_allowance,
        income_surplus: surplus,
        child_support_income: surplus.max(Decimal::ZERO),
    }
}

/// Computes a parent's relevant dependent allowance.
///
/// The allowance is the cost of the parent's relevant dependents, costed
/// with the parent's own income less the self-support amount as if the
/// dependents were the only children: under-13 dependents at a
/// representative age group of 0-12, 13+ dependents at 13+.
///
/// # Arguments
///
/// * `dependents` - The parent's relevant dependent counts
/// * `ati` - The parent's adjusted taxable income
/// * `table` - The rate table for the assessment year
pub fn relevant_dependent_allowance(
    dependents: &RelevantDependents,
    ati: Decimal,
    table: &RateTable,
) -> Decimal {
    if dependents.total() == 0 {
        return Decimal::ZERO;
    }

    let (younger, older) = REPRESENTATIVE_AGE_RANGES;
    let mut age_ranges = Vec::with_capacity(dependents.total() as usize);
    age_ranges.extend(std::iter::repeat_n(younger, dependents.under_13 as usize));
    age_ranges.extend(std::iter::repeat_n(older, dependents.thirteen_plus as usize));

    let income = (ati - table.self_support_amount).max(Decimal::ZERO);
    cost_of_children(income, &age_ranges, table).total_cost
}

/// Computes both parents' income percentages from their child support
/// incomes.
///
/// Parent A's percentage is their share of the combined income; Parent
/// B's is derived as the complement (`100 - A`) rather than by a second
/// division, so the two always sum to exactly 100. A zero combined
/// income yields 0 and 0.
///
/// # Examples
///
/// ```
/// use assessment_engine::calculation::income_percentages;
/// use rust_decimal::Decimal;
///
/// let (a, b) = income_percentages(Decimal::from(48954), Decimal::from(18954));
/// assert_eq!(a + b, Decimal::from(100));
/// ```
pub fn income_percentages(csi_a: Decimal, csi_b: Decimal) -> (Decimal, Decimal) {
    let combined = csi_a + csi_b;

    if combined <= Decimal::ZERO {
        return (Decimal::ZERO, Decimal::ZERO);
    }

    let percentage_a = csi_a / combined * Decimal::from(100);
    (percentage_a, Decimal::from(100) - percentage_a)
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

    /// IN-001: CSI subtracts all deductions
    #[test]
    fn test_csi_subtracts_all_deductions() {
        let csi = child_support_income(dec("80000"), dec("31046"), dec("5000"), dec("2000"));
        assert_eq!(csi, dec("41954"));
    }

    /// IN-002: CSI floors at zero
    #[test]
    fn test_csi_floors_at_zero() {
        let csi = child_support_income(dec("20000"), dec("31046"), dec("0"), dec("0"));
        assert_eq!(csi, dec("0"));
    }

    /// IN-003: breakdown keeps the signed surplus
    #[test]
    fn test_breakdown_keeps_signed_surplus() {
        let breakdown = income_breakdown(dec("20000"), dec("31046"), dec("0"), dec("0"));

        assert_eq!(breakdown.income_surplus, dec("-11046"));
        assert_eq!(breakdown.child_support_income, dec("0"));
    }

    /// IN-004: income percentages sum to exactly 100
    #[test]
    fn test_income_percentages_sum_to_exactly_one_hundred() {
        let (a, b) = income_percentages(dec("48954"), dec("18954"));
        assert_eq!(a + b, dec("100"));
        assert!(a > dec("72") && a < dec("72.1"));
    }

    /// IN-005: zero combined income yields zero percentages
    #[test]
    fn test_zero_combined_income_yields_zero_percentages() {
        let (a, b) = income_percentages(dec("0"), dec("0"));
        assert_eq!(a, dec("0"));
        assert_eq!(b, dec("0"));
    }

    /// IN-006: one-sided income yields 100 and 0
    #[test]
    fn test_one_sided_income() {
        let (a, b) = income_percentages(dec("40000"), dec("0"));
        assert_eq!(a, dec("100"));
        assert_eq!(b, dec("0"));
    }

    /// IN-007: no dependents means no allowance
    #[test]
    fn test_no_dependents_no_allowance() {
        let table = table_2026();
        let allowance =
            relevant_dependent_allowance(&RelevantDependents::default(), dec("80000"), &table);
        assert_eq!(allowance, dec("0"));
    }

    /// IN-008: one younger dependent is costed on the one-child table
    #[test]
    fn test_one_younger_dependent_allowance() {
        let table = table_2026();
        let dependents = RelevantDependents {
            under_13: 1,
            thirteen_plus: 0,
        };

        let allowance = relevant_dependent_allowance(&dependents, dec("80000"), &table);

        // Income 48954 falls in the second 0-12 one-child bracket:
        // 7917 + 0.15 * (48954 - 46569)
        assert_eq!(allowance, dec("7917") + dec("0.15") * dec("2385"));
    }

    /// IN-009: mixed-age dependents use the mixed table
    #[test]
    fn test_mixed_dependents_use_mixed_table() {
        let table = table_2026();
        let dependents = RelevantDependents {
            under_13: 1,
            thirteen_plus: 1,
        };

        let allowance = relevant_dependent_allowance(&dependents, dec("80000"), &table);

        // mixed / 2 children, second bracket: 12341 + 0.255 * (48954 - 46569)
        assert_eq!(allowance, dec("12341") + dec("0.255") * dec("2385"));
    }

    /// IN-010: dependent allowance is zero when income is below self-support
    #[test]
    fn test_dependent_allowance_below_self_support() {
        let table = table_2026();
        let dependents = RelevantDependents {
            under_13: 2,
            thirteen_plus: 0,
        };

        let allowance = relevant_dependent_allowance(&dependents, dec("20000"), &table);
        assert_eq!(allowance, dec("0"));
    }

    proptest::proptest! {
        /// IN-011: complement derivation always sums to exactly 100
        #[test]
        fn prop_income_percentages_complement(a in 0u64..2_000_000, b in 1u64..2_000_000) {
            let (pa, pb) = income_percentages(Decimal::from(a), Decimal::from(b));
            proptest::prop_assert_eq!(pa + pb, Decimal::from(100));
        }
    }
}
