//! Fixed and minimum annual rate functionality.
//!
//! This module decides whether the fixed annual rate (FAR) or minimum
//! annual rate (MAR) replaces a parent's standard liability, and applies
//! the chosen rate to the per-child assessments. The minimum rate is
//! checked first; a parent on the minimum rate is never also given the
//! fixed rate.

use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::models::{ChildAssessment, RateApplied};

use super::liability::RECEIVER_CARE_THRESHOLD;

/// Care percentage at or above which the minimum annual rate no longer
/// applies.
pub const MINIMUM_RATE_CARE_THRESHOLD: Decimal = Decimal::from_parts(14, 0, 0, false, 0);

/// The most children the fixed annual rate is payable for in one case.
pub const FIXED_RATE_MAX_CHILDREN: usize = 3;

/// Rate eligibility inputs for one parent.
///
/// The care slices hold one entry per assessable (non-adult) child, in
/// child order: the parent's own rounded care percentage and the care
/// held by the receiving side (the other parent, or a non-parent carer
/// if their care is higher).
#[derive(Debug, Clone)]
pub struct RateEligibility<'a> {
    /// The parent's adjusted taxable income.
    pub ati: Decimal,
    /// Whether the parent received income support in the assessed income.
    pub receives_income_support: bool,
    /// The parent's rounded care percentage per assessable child.
    pub care_percentages: &'a [Decimal],
    /// The receiving side's rounded care percentage per assessable child.
    pub receiving_side_care: &'a [Decimal],
}

/// The outcome of applying special rates to all children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatesOutcome {
    /// Total fixed annual rate payable by Parent A.
    pub fixed_total_a: Decimal,
    /// Total fixed annual rate payable by Parent B.
    pub fixed_total_b: Decimal,
    /// Minimum annual rate payable by Parent A (zero or the full rate).
    pub minimum_total_a: Decimal,
    /// Minimum annual rate payable by Parent B (zero or the full rate).
    pub minimum_total_b: Decimal,
    /// Which special rate the assessment carries overall.
    pub rate_applied: RateApplied,
}

/// Checks whether the minimum annual rate applies for a parent.
///
/// The minimum rate applies at case level when all hold:
/// 1. the parent received an income support payment,
/// 2. the parent's ATI is below the self-support amount,
/// 3. the parent has less than 14% care of every assessable child.
///
/// Holding 14% or more care of any child negates the minimum rate: the
/// parent is already contributing through care.
pub fn minimum_rate_applies(eligibility: &RateEligibility<'_>, table: &RateTable) -> bool {
    if !eligibility.receives_income_support {
        return false;
    }

    if eligibility.ati >= table.self_support_amount {
        return false;
    }

    if eligibility.care_percentages.is_empty() {
        return false;
    }

    eligibility
        .care_percentages
        .iter()
        .all(|care| *care < MINIMUM_RATE_CARE_THRESHOLD)
}

/// Checks whether the fixed annual rate applies for a parent for one
/// assessable child.
///
/// The fixed rate applies per child when all hold:
/// 1. the parent's ATI is below the fixed-rate income ceiling,
/// 2. the parent did not receive income support,
/// 3. the parent has less than 35% care of this child,
/// 4. the receiving side (the other parent or a non-parent carer) holds
///    at least 35% care of this child, so the liability has somewhere to
///    flow.
pub fn fixed_rate_applies(
    eligibility: &RateEligibility<'_>,
    child_index: usize,
    table: &RateTable,
) -> bool {
    if eligibility.ati >= table.fixed_rate_income_ceiling {
        return false;
    }

    if eligibility.receives_income_support {
        return false;
    }

    let Some(own_care) = eligibility.care_percentages.get(child_index) else {
        return false;
    };
    if *own_care >= RECEIVER_CARE_THRESHOLD {
        return false;
    }

    eligibility
        .receiving_side_care
        .get(child_index)
        .is_some_and(|care| *care >= RECEIVER_CARE_THRESHOLD)
}

/// Applies the minimum and fixed annual rates to the per-child
/// assessments.
///
/// The minimum rate is evaluated once per parent at case level and, when
/// it applies, replaces the parent's entire case liability with the
/// table's minimum annual rate, spread equally across the assessable
/// children for the per-child breakdown. Otherwise the fixed rate is
/// evaluated per child (for up to three children).
///
/// When a rate applies to a parent for a child, that parent's standard
/// child support percentage is suppressed. A fixed-rate child also has
/// the other parent's standard liability cleared, so liability never
/// flows both ways for one child.
pub fn apply_special_rates(
    children: &mut [ChildAssessment],
    eligibility_a: &RateEligibility<'_>,
    eligibility_b: &RateEligibility<'_>,
    table: &RateTable,
) -> RatesOutcome {
    let assessable_count = children.iter().filter(|c| !c.adult_child).count();

    let mar_applies_a = minimum_rate_applies(eligibility_a, table);
    let mar_applies_b = minimum_rate_applies(eligibility_b, table);

    let mut fixed_total_a = Decimal::ZERO;
    let mut fixed_total_b = Decimal::ZERO;
    let mut fixed_children_a = 0usize;
    let mut fixed_children_b = 0usize;

    let minimum_share = if assessable_count > 0 {
        table.minimum_annual_rate / Decimal::from(assessable_count as u64)
    } else {
        Decimal::ZERO
    };

    let mut assessable_index = 0usize;
    for child in children.iter_mut().filter(|c| !c.adult_child) {
        let index = assessable_index;
        assessable_index += 1;

        if mar_applies_a {
            child.final_liability_a = minimum_share;
            child.minimum_rate_applied_a = true;
            child.child_support_percentage_a = None;
        } else if fixed_rate_applies(eligibility_a, index, table)
            && fixed_children_a < FIXED_RATE_MAX_CHILDREN
        {
            fixed_children_a += 1;
            fixed_total_a += table.fixed_annual_rate;
            child.final_liability_a = table.fixed_annual_rate;
            child.fixed_rate_applied_a = true;
            child.child_support_percentage_a = None;
            // No double liability for a fixed-rate child.
            child.final_liability_b = Decimal::ZERO;
        }

        if mar_applies_b {
            child.final_liability_b = minimum_share;
            child.minimum_rate_applied_b = true;
            child.child_support_percentage_b = None;
        } else if fixed_rate_applies(eligibility_b, index, table)
            && fixed_children_b < FIXED_RATE_MAX_CHILDREN
        {
            fixed_children_b += 1;
            fixed_total_b += table.fixed_annual_rate;
            child.final_liability_b = table.fixed_annual_rate;
            child.fixed_rate_applied_b = true;
            child.child_support_percentage_b = None;
            if !child.fixed_rate_applied_a && !child.minimum_rate_applied_a {
                child.final_liability_a = Decimal::ZERO;
            }
        }
    }

    let minimum_total_a = if mar_applies_a {
        table.minimum_annual_rate
    } else {
        Decimal::ZERO
    };
    let minimum_total_b = if mar_applies_b {
        table.minimum_annual_rate
    } else {
        Decimal::ZERO
    };

    let fixed_any = fixed_children_a > 0 || fixed_children_b > 0;
    let minimum_any = mar_applies_a || mar_applies_b;
    let rate_applied = match (fixed_any, minimum_any) {
        (true, true) => RateApplied::Both,
        (true, false) => RateApplied::FixedRate,
        (false, true) => RateApplied::MinimumRate,
        (false, false) => RateApplied::None,
    };

    RatesOutcome {
        fixed_total_a,
        fixed_total_b,
        minimum_total_a,
        minimum_total_b,
        rate_applied,
    }
}
