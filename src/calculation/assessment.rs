//! Assessment orchestration.
//!
//! This module runs the complete eight-step income shares formula:
//! incomes and allowances, income percentages, care and cost
//! percentages, the cost of children, per-child liabilities, special
//! rates, multi-case caps, non-parent carer apportionment and the final
//! payment resolution, recording an audit step for every decision.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::{CareCostBand, CostAgeGroup, RateTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AssessmentResult, AuditStep, AuditTrace, AuditWarning, ChildAssessment, ChildInput,
    ParentIncome, ParentInput, Payer, RateApplied, ZeroPaymentReason,
};

use super::cost_of_children::{cost_age_group, cost_of_children};
use super::income::{income_breakdown, income_percentages, relevant_dependent_allowance};
use super::liability::{
    child_liability, ChildLiabilityInput, ChildLiabilityResult, RECEIVER_CARE_THRESHOLD,
};
use super::multi_case::{
    apply_multi_case_caps, fixed_rate_child_share, minimum_rate_case_share, multi_case_allowance,
    solo_cost_per_child,
};
use super::rates::{apply_special_rates, RateEligibility, MINIMUM_RATE_CARE_THRESHOLD};

/// Labels for the two parents, used in audit reasoning lines.
const PARENT_A: &str = "Parent A";
const PARENT_B: &str = "Parent B";

/// Performs a complete child support assessment.
///
/// This is a pure function of its inputs: the two parents, the children
/// of the case, and the rate table and care-cost conversion bands for
/// the selected assessment year. It returns a fully populated
/// [`AssessmentResult`] carrying every intermediate quantity and an
/// audit trace, or an error for invalid inputs.
///
/// # Arguments
///
/// * `parent_a` - Parent A's income and circumstances
/// * `parent_b` - Parent B's income and circumstances
/// * `children` - The children of this case (at least one)
/// * `table` - The rate table for the assessment year
/// * `bands` - The care-cost conversion bands
///
/// # Errors
///
/// Returns `InvalidParent` or `InvalidChild` for caller contract
/// violations (negative income, care outside the period range, no
/// children). Degenerate but valid inputs (both incomes zero, zero
/// nights) produce well-defined results.
pub fn assess(
    parent_a: &ParentInput,
    parent_b: &ParentInput,
    children: &[ChildInput],
    table: &RateTable,
    bands: &[CareCostBand],
) -> EngineResult<AssessmentResult> {
    let started = Instant::now();
    validate_inputs(parent_a, parent_b, children)?;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    // Steps 1-2: child support incomes, with relevant dependent and
    // multi-case allowances.
    let current_case_ages: Vec<u8> = children.iter().map(|c| c.age_years).collect();
    let income_a = parent_income(parent_a, &current_case_ages, table);
    let income_b = parent_income(parent_b, &current_case_ages, table);

    for (label, parent, income) in [
        (PARENT_A, parent_a, &income_a),
        (PARENT_B, parent_b, &income_b),
    ] {
        steps.push(income_audit_step(label, parent, income, step_number));
        step_number += 1;
    }

    // Steps 3-4: combined income and income percentages.
    let ccsi = income_a.child_support_income + income_b.child_support_income;
    let (income_percentage_a, income_percentage_b) = income_percentages(
        income_a.child_support_income,
        income_b.child_support_income,
    );

    steps.push(AuditStep {
        step_number,
        rule_id: "income_percentages".to_string(),
        rule_name: "Income Percentages".to_string(),
        guide_ref: "2.4.4".to_string(),
        input: serde_json::json!({
            "csi_a": income_a.child_support_income.to_string(),
            "csi_b": income_b.child_support_income.to_string(),
        }),
        output: serde_json::json!({
            "combined_csi": ccsi.to_string(),
            "income_percentage_a": income_percentage_a.to_string(),
            "income_percentage_b": income_percentage_b.to_string(),
        }),
        reasoning: if ccsi.is_zero() {
            "Combined child support income is zero; both income percentages are zero".to_string()
        } else {
            format!(
                "Combined income ${}: {} holds {}%, {} the complement",
                ccsi,
                PARENT_A,
                income_percentage_a.round_dp(2),
                PARENT_B
            )
        },
    });
    step_number += 1;

    // Step 5: cost of the children, on the eligible (non-adult) pool.
    let eligible_ranges: Vec<_> = children
        .iter()
        .filter(|c| !c.is_adult())
        .map(|c| c.age_range())
        .collect();
    let cost_result = cost_of_children(ccsi, &eligible_ranges, table);

    steps.push(AuditStep {
        step_number,
        rule_id: "cost_of_children".to_string(),
        rule_name: "Cost of the Children".to_string(),
        guide_ref: "2.4.6".to_string(),
        input: serde_json::json!({
            "combined_csi": ccsi.to_string(),
            "eligible_children": eligible_ranges.len(),
            "age_group": age_group_label(&eligible_ranges),
        }),
        output: serde_json::json!({
            "total_cost": cost_result.total_cost.to_string(),
            "cost_per_child": cost_result.cost_per_child.to_string(),
            "bracket_min_income": cost_result.bracket.min_income.to_string(),
            "bracket_marginal_rate": cost_result.bracket.marginal_rate.to_string(),
        }),
        reasoning: format!(
            "${} + {} x ${} = ${} across {} children",
            cost_result.bracket.fixed_amount,
            cost_result.bracket.marginal_rate,
            cost_result.bracket.income_in_bracket,
            cost_result.total_cost,
            eligible_ranges.len()
        ),
    });
    step_number += 1;

    // Steps 6-8: per-child care, cost and child support percentages and
    // the standard liabilities.
    let mut assessments: Vec<ChildAssessment> = Vec::with_capacity(children.len());
    let mut standard_percentages: Vec<(Decimal, Decimal)> = Vec::with_capacity(children.len());

    for child in children {
        let liability = child_liability(ChildLiabilityInput {
            child,
            income_percentage_a,
            income_percentage_b,
            cost_per_child: cost_result.cost_per_child,
            bands,
        })?;

        if liability.turning_18 {
            warnings.push(AuditWarning {
                code: "CHILD_TURNING_18".to_string(),
                message: format!("Child {} turns 18 during the assessment period", child.id),
                severity: "medium".to_string(),
            });
        }

        steps.push(liability_audit_step(child, &liability, step_number));
        step_number += 1;

        standard_percentages.push((
            liability.child_support_percentage_a,
            liability.child_support_percentage_b,
        ));
        assessments.push(child_assessment(child, &liability, cost_result.cost_per_child));
    }

    let total_liability_a: Decimal = assessments
        .iter()
        .filter(|c| !c.adult_child)
        .map(|c| c.standard_liability_a)
        .sum();
    let total_liability_b: Decimal = assessments
        .iter()
        .filter(|c| !c.adult_child)
        .map(|c| c.standard_liability_b)
        .sum();

    // Special rates: the minimum annual rate at case level, otherwise
    // the fixed annual rate per child.
    let care_a: Vec<Decimal> = assessments
        .iter()
        .filter(|c| !c.adult_child)
        .map(|c| c.care_percentage_a)
        .collect();
    let care_b: Vec<Decimal> = assessments
        .iter()
        .filter(|c| !c.adult_child)
        .map(|c| c.care_percentage_b)
        .collect();
    let receiving_for_a: Vec<Decimal> = assessments
        .iter()
        .filter(|c| !c.adult_child)
        .map(|c| c.care_percentage_b.max(c.care_percentage_npc.unwrap_or_default()))
        .collect();
    let receiving_for_b: Vec<Decimal> = assessments
        .iter()
        .filter(|c| !c.adult_child)
        .map(|c| c.care_percentage_a.max(c.care_percentage_npc.unwrap_or_default()))
        .collect();

    let eligibility_a = RateEligibility {
        ati: parent_a.adjusted_taxable_income,
        receives_income_support: parent_a.receives_income_support,
        care_percentages: &care_a,
        receiving_side_care: &receiving_for_a,
    };
    let eligibility_b = RateEligibility {
        ati: parent_b.adjusted_taxable_income,
        receives_income_support: parent_b.receives_income_support,
        care_percentages: &care_b,
        receiving_side_care: &receiving_for_b,
    };

    let mut rates = apply_special_rates(&mut assessments, &eligibility_a, &eligibility_b, table);

    if rates.rate_applied != RateApplied::None {
        steps.push(rates_audit_step(&rates, &assessments, table, step_number));
        step_number += 1;
    }

    // Multi-case caps on the per-child liabilities.
    let solo_cost_a = parent_a.has_other_cases().then(|| {
        solo_cost_per_child(
            preliminary_income(&income_a),
            &current_case_ages,
            &parent_a.other_case_children,
            table,
        )
    });
    let solo_cost_b = parent_b.has_other_cases().then(|| {
        solo_cost_per_child(
            preliminary_income(&income_b),
            &current_case_ages,
            &parent_b.other_case_children,
            table,
        )
    });

    let cap_outcome = apply_multi_case_caps(&mut assessments, solo_cost_a, solo_cost_b);

    if cap_outcome.cap_applied_a || cap_outcome.cap_applied_b {
        steps.push(AuditStep {
            step_number,
            rule_id: "multi_case_cap".to_string(),
            rule_name: "Multi-case Cap".to_string(),
            guide_ref: "2.4.10".to_string(),
            input: serde_json::json!({
                "solo_cost_per_child_a": solo_cost_a.map(|c| c.to_string()),
                "solo_cost_per_child_b": solo_cost_b.map(|c| c.to_string()),
            }),
            output: serde_json::json!({
                "cap_applied_a": cap_outcome.cap_applied_a,
                "cap_applied_b": cap_outcome.cap_applied_b,
            }),
            reasoning: "Per-child liability capped at the child's cost share on the parent's own income".to_string(),
        });
        step_number += 1;
    }

    // Cross-case caps on the minimum and fixed rates.
    apply_minimum_rate_case_cap(&mut assessments, &mut rates.minimum_total_a, parent_a, table, true);
    apply_minimum_rate_case_cap(&mut assessments, &mut rates.minimum_total_b, parent_b, table, false);
    apply_fixed_rate_cross_case_cap(&mut assessments, &mut rates.fixed_total_a, parent_a, table, true);
    apply_fixed_rate_cross_case_cap(&mut assessments, &mut rates.fixed_total_b, parent_b, table, false);

    // Non-parent carer redirection: a special-rate liability flows to
    // the carer when one holds the child.
    let has_npc = children.iter().any(|c| c.care_npc.is_some());
    if has_npc {
        for child in assessments.iter_mut().filter(|c| !c.adult_child) {
            let npc_holds_child = child
                .care_percentage_npc
                .is_some_and(|c| c >= RECEIVER_CARE_THRESHOLD);
            if !npc_holds_child {
                continue;
            }

            if child.minimum_rate_applied_a || child.fixed_rate_applied_a {
                child.liability_to_npc_a = child.final_liability_a;
                child.final_liability_a = Decimal::ZERO;
            }
            if child.minimum_rate_applied_b || child.fixed_rate_applied_b {
                child.liability_to_npc_b = child.final_liability_b;
                child.final_liability_b = Decimal::ZERO;
            }
        }
    }

    // Final aggregation and payment resolution.
    let final_liability_a: Decimal = assessments
        .iter()
        .filter(|c| !c.adult_child)
        .map(|c| c.final_liability_a)
        .sum();
    let final_liability_b: Decimal = assessments
        .iter()
        .filter(|c| !c.adult_child)
        .map(|c| c.final_liability_b)
        .sum();

    let both_on_minimum_rate =
        rates.minimum_total_a > Decimal::ZERO && rates.minimum_total_b > Decimal::ZERO;

    let (payer, final_payment_amount) = if both_on_minimum_rate {
        // Two minimum-rate liabilities cancel; neither parent pays the other.
        (Payer::Neither, Decimal::ZERO)
    } else {
        let net = final_liability_a - final_liability_b;
        if net > Decimal::ZERO {
            (Payer::ParentA, net)
        } else if net < Decimal::ZERO {
            (Payer::ParentB, -net)
        } else {
            (Payer::Neither, Decimal::ZERO)
        }
    };

    let payment_to_npc = has_npc.then(|| {
        assessments
            .iter()
            .map(|c| c.liability_to_npc_a + c.liability_to_npc_b)
            .sum()
    });

    let zero_payment_reason = if final_payment_amount.is_zero() {
        detect_zero_payment_reason(
            parent_a,
            parent_b,
            &assessments,
            &standard_percentages,
            ccsi,
            table,
        )
    } else {
        None
    };

    steps.push(AuditStep {
        step_number,
        rule_id: "payment_resolution".to_string(),
        rule_name: "Payment Resolution".to_string(),
        guide_ref: "2.4.2".to_string(),
        input: serde_json::json!({
            "final_liability_a": final_liability_a.to_string(),
            "final_liability_b": final_liability_b.to_string(),
        }),
        output: serde_json::json!({
            "payer": payer,
            "final_payment_amount": final_payment_amount.to_string(),
            "payment_to_npc": payment_to_npc.map(|p: Decimal| p.to_string()),
        }),
        reasoning: match payer {
            Payer::ParentA => format!("{} pays ${} per year", PARENT_A, final_payment_amount),
            Payer::ParentB => format!("{} pays ${} per year", PARENT_B, final_payment_amount),
            Payer::Neither => "No payment flows between the parents".to_string(),
        },
    });

    Ok(AssessmentResult {
        assessment_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        year: table.year,
        income_a,
        income_b,
        combined_child_support_income: ccsi,
        income_percentage_a,
        income_percentage_b,
        total_cost_of_children: cost_result.total_cost,
        cost_bracket: cost_result.bracket,
        cost_per_child: cost_result.cost_per_child,
        children: assessments,
        total_liability_a,
        total_liability_b,
        final_liability_a,
        final_liability_b,
        fixed_rate_total_a: rates.fixed_total_a,
        fixed_rate_total_b: rates.fixed_total_b,
        minimum_rate_total_a: rates.minimum_total_a,
        minimum_rate_total_b: rates.minimum_total_b,
        rate_applied: rates.rate_applied,
        payer,
        final_payment_amount,
        payment_to_npc,
        zero_payment_reason,
        multi_case_cap_applied_a: cap_outcome.cap_applied_a,
        multi_case_cap_applied_b: cap_outcome.cap_applied_b,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: started.elapsed().as_micros() as u64,
        },
    })
}

/// Validates the caller contract before any arithmetic runs.
fn validate_inputs(
    parent_a: &ParentInput,
    parent_b: &ParentInput,
    children: &[ChildInput],
) -> EngineResult<()> {
    if children.is_empty() {
        return Err(EngineError::CalculationError {
            message: "at least one child is required".to_string(),
        });
    }

    for (label, parent) in [("parent_a", parent_a), ("parent_b", parent_b)] {
        if parent.adjusted_taxable_income < Decimal::ZERO {
            return Err(EngineError::InvalidParent {
                field: format!("{label}.adjusted_taxable_income"),
                message: "cannot be negative".to_string(),
            });
        }
    }

    for child in children {
        let period_length = child.care_period.length();
        let mut combined = Decimal::ZERO;

        for amount in [Some(child.care_a), Some(child.care_b), child.care_npc]
            .into_iter()
            .flatten()
        {
            if amount < Decimal::ZERO {
                return Err(EngineError::InvalidChild {
                    child_id: child.id.clone(),
                    message: "care amounts cannot be negative".to_string(),
                });
            }
            if amount > period_length {
                return Err(EngineError::InvalidChild {
                    child_id: child.id.clone(),
                    message: format!(
                        "care amount {} exceeds the period length {}",
                        amount, period_length
                    ),
                });
            }
            combined += amount;
        }

        if combined > period_length {
            return Err(EngineError::InvalidChild {
                child_id: child.id.clone(),
                message: format!(
                    "combined care {} exceeds the period length {}",
                    combined, period_length
                ),
            });
        }
    }

    Ok(())
}

/// Computes one parent's income breakdown including both allowances.
fn parent_income(parent: &ParentInput, current_case_ages: &[u8], table: &RateTable) -> ParentIncome {
    let ati = parent.adjusted_taxable_income;
    let dependent_allowance = relevant_dependent_allowance(&parent.relevant_dependents, ati, table);

    let raw_income = (ati - table.self_support_amount).max(Decimal::ZERO);
    let case_allowance = multi_case_allowance(
        raw_income,
        current_case_ages,
        &parent.other_case_children,
        table,
    );

    income_breakdown(ati, table.self_support_amount, dependent_allowance, case_allowance)
}

/// The income base for the multi-case cap: ATI less self-support and the
/// relevant dependent allowance, before the multi-case allowance.
fn preliminary_income(income: &ParentIncome) -> Decimal {
    (income.adjusted_taxable_income
        - income.self_support_amount
        - income.relevant_dependent_allowance)
        .max(Decimal::ZERO)
}

/// Builds the initial per-child assessment from the standard liability.
fn child_assessment(
    child: &ChildInput,
    liability: &ChildLiabilityResult,
    cost_per_child: Decimal,
) -> ChildAssessment {
    ChildAssessment {
        child_id: child.id.clone(),
        age_years: child.age_years,
        age_range: child.age_range(),
        adult_child: liability.adult_child,
        turning_18: liability.turning_18,
        care_percentage_a: liability.care_percentage_a,
        care_percentage_b: liability.care_percentage_b,
        care_percentage_npc: liability.care_percentage_npc,
        cost_percentage_a: liability.cost_percentage_a,
        cost_percentage_b: liability.cost_percentage_b,
        cost_percentage_npc: liability.cost_percentage_npc,
        child_support_percentage_a: Some(liability.child_support_percentage_a),
        child_support_percentage_b: Some(liability.child_support_percentage_b),
        cost_per_child: if liability.adult_child {
            Decimal::ZERO
        } else {
            cost_per_child
        },
        standard_liability_a: liability.liability_a,
        standard_liability_b: liability.liability_b,
        final_liability_a: liability.liability_a,
        final_liability_b: liability.liability_b,
        liability_to_npc_a: liability.liability_to_npc_a,
        liability_to_npc_b: liability.liability_to_npc_b,
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

/// Applies the three-case cap to a parent's minimum rate liability.
fn apply_minimum_rate_case_cap(
    assessments: &mut [ChildAssessment],
    minimum_total: &mut Decimal,
    parent: &ParentInput,
    table: &RateTable,
    is_parent_a: bool,
) {
    if minimum_total.is_zero() || !parent.has_other_cases() {
        return;
    }

    let (share, capped) = minimum_rate_case_share(table, parent.total_cases());
    if !capped {
        return;
    }

    let assessable = assessments.iter().filter(|c| !c.adult_child).count().max(1);
    let per_child = share / Decimal::from(assessable as u64);

    for child in assessments.iter_mut().filter(|c| !c.adult_child) {
        let applied = if is_parent_a {
            child.minimum_rate_applied_a
        } else {
            child.minimum_rate_applied_b
        };
        if applied {
            if is_parent_a {
                child.final_liability_a = per_child;
            } else {
                child.final_liability_b = per_child;
            }
        }
    }

    *minimum_total = share;
}

/// Applies the three-child cross-case cap to a parent's fixed rate
/// liability.
fn apply_fixed_rate_cross_case_cap(
    assessments: &mut [ChildAssessment],
    fixed_total: &mut Decimal,
    parent: &ParentInput,
    table: &RateTable,
    is_parent_a: bool,
) {
    if fixed_total.is_zero() || !parent.has_other_cases() {
        return;
    }

    let fixed_children = assessments
        .iter()
        .filter(|c| {
            if is_parent_a {
                c.fixed_rate_applied_a
            } else {
                c.fixed_rate_applied_b
            }
        })
        .count();
    let total_fixed_children = fixed_children + parent.other_case_children.len();

    let (share, capped) = fixed_rate_child_share(table, total_fixed_children);
    if !capped {
        return;
    }

    for child in assessments.iter_mut() {
        let applied = if is_parent_a {
            child.fixed_rate_applied_a
        } else {
            child.fixed_rate_applied_b
        };
        if applied {
            if is_parent_a {
                child.final_liability_a = share;
            } else {
                child.final_liability_b = share;
            }
        }
    }

    *fixed_total = share * Decimal::from(fixed_children as u64);
}

/// Classifies why a zero final payment arose.
///
/// Reasons are checked from most specific to most general so the
/// consumer gets the most informative explanation.
fn detect_zero_payment_reason(
    parent_a: &ParentInput,
    parent_b: &ParentInput,
    assessments: &[ChildAssessment],
    standard_percentages: &[(Decimal, Decimal)],
    ccsi: Decimal,
    table: &RateTable,
) -> Option<ZeroPaymentReason> {
    if ccsi.is_zero() {
        return Some(ZeroPaymentReason::ZeroCombinedIncome);
    }

    let assessable: Vec<&ChildAssessment> =
        assessments.iter().filter(|c| !c.adult_child).collect();
    if assessable.is_empty() {
        return None;
    }

    // A low-income parent on income support whose care reaches 14%
    // narrowly misses the minimum rate.
    let minimum_prevented = |ati: Decimal,
                             on_support: bool,
                             care: fn(&ChildAssessment) -> Decimal,
                             applied: fn(&ChildAssessment) -> bool| {
        ati < table.self_support_amount
            && on_support
            && assessable.iter().any(|c| care(c) >= MINIMUM_RATE_CARE_THRESHOLD)
            && !assessable.iter().any(|c| applied(c))
    };

    if minimum_prevented(
        parent_a.adjusted_taxable_income,
        parent_a.receives_income_support,
        |c| c.care_percentage_a,
        |c| c.minimum_rate_applied_a,
    ) || minimum_prevented(
        parent_b.adjusted_taxable_income,
        parent_b.receives_income_support,
        |c| c.care_percentage_b,
        |c| c.minimum_rate_applied_b,
    ) {
        return Some(ZeroPaymentReason::MinimumRatePreventedByCare);
    }

    if assessable.iter().all(|c| {
        c.care_percentage_a < RECEIVER_CARE_THRESHOLD
            && c.care_percentage_b < RECEIVER_CARE_THRESHOLD
    }) {
        return Some(ZeroPaymentReason::BothParentsBelowCareThreshold);
    }

    // Percentages pair with children by index, so filter adults out of
    // both sides together.
    let assessable_percentages: Vec<&(Decimal, Decimal)> = assessments
        .iter()
        .zip(standard_percentages)
        .filter(|(c, _)| !c.adult_child)
        .map(|(_, p)| p)
        .collect();

    if assessable_percentages
        .iter()
        .all(|(a, b)| a.abs() < Decimal::ONE && b.abs() < Decimal::ONE)
    {
        return Some(ZeroPaymentReason::BalancedContributions);
    }

    let receiver_blocked = assessable
        .iter()
        .zip(&assessable_percentages)
        .any(|(c, (a, b))| {
            (*a > Decimal::ZERO && c.care_percentage_b < RECEIVER_CARE_THRESHOLD)
                || (*b > Decimal::ZERO && c.care_percentage_a < RECEIVER_CARE_THRESHOLD)
        });
    if receiver_blocked {
        return Some(ZeroPaymentReason::ReceiverBelowCareThreshold);
    }

    None
}

/// Human-readable age group for audit output.
fn age_group_label(ranges: &[crate::models::AgeRange]) -> &'static str {
    if ranges.is_empty() {
        return "none";
    }
    match cost_age_group(ranges) {
        CostAgeGroup::Age0To12 => "0-12",
        CostAgeGroup::Age13Plus => "13+",
        CostAgeGroup::Mixed => "mixed",
    }
}

/// Builds the audit step for one parent's income computation.
fn income_audit_step(
    label: &str,
    parent: &ParentInput,
    income: &ParentIncome,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "child_support_income".to_string(),
        rule_name: "Child Support Income".to_string(),
        guide_ref: "2.4.4".to_string(),
        input: serde_json::json!({
            "parent": label,
            "adjusted_taxable_income": income.adjusted_taxable_income.to_string(),
            "relevant_dependents": parent.relevant_dependents.total(),
            "other_case_children": parent.other_case_children.len(),
        }),
        output: serde_json::json!({
            "self_support_amount": income.self_support_amount.to_string(),
            "relevant_dependent_allowance": income.relevant_dependent_allowance.to_string(),
            "multi_case_allowance": income.multi_case_allowance.to_string(),
            "income_surplus": income.income_surplus.to_string(),
            "child_support_income": income.child_support_income.to_string(),
        }),
        reasoning: format!(
            "{}: ${} - ${} - ${} - ${} = ${} (clamped to ${})",
            label,
            income.adjusted_taxable_income,
            income.self_support_amount,
            income.relevant_dependent_allowance,
            income.multi_case_allowance,
            income.income_surplus,
            income.child_support_income
        ),
    }
}

/// Builds the audit step for one child's standard liability.
fn liability_audit_step(
    child: &ChildInput,
    liability: &ChildLiabilityResult,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "child_support_percentage".to_string(),
        rule_name: "Care, Cost and Child Support Percentages".to_string(),
        guide_ref: "2.4.5".to_string(),
        input: serde_json::json!({
            "child_id": child.id,
            "age_years": child.age_years,
            "care_a": child.care_a.to_string(),
            "care_b": child.care_b.to_string(),
            "care_period": child.care_period,
        }),
        output: serde_json::json!({
            "care_percentage_a": liability.care_percentage_a.to_string(),
            "care_percentage_b": liability.care_percentage_b.to_string(),
            "cost_percentage_a": liability.cost_percentage_a.to_string(),
            "cost_percentage_b": liability.cost_percentage_b.to_string(),
            "child_support_percentage_a": liability.child_support_percentage_a.to_string(),
            "child_support_percentage_b": liability.child_support_percentage_b.to_string(),
            "standard_liability_a": liability.liability_a.to_string(),
            "standard_liability_b": liability.liability_b.to_string(),
            "adult_child": liability.adult_child,
        }),
        reasoning: if liability.adult_child {
            format!("Child {} is 18 or over and excluded from the assessment", child.id)
        } else {
            format!(
                "Child {}: care {}%/{}% gives cost {}%/{}%",
                child.id,
                liability.care_percentage_a,
                liability.care_percentage_b,
                liability.cost_percentage_a,
                liability.cost_percentage_b
            )
        },
    }
}

/// Builds the audit step summarizing the applied special rates.
fn rates_audit_step(
    rates: &super::rates::RatesOutcome,
    assessments: &[ChildAssessment],
    table: &RateTable,
    step_number: u32,
) -> AuditStep {
    let fixed_children_a = assessments.iter().filter(|c| c.fixed_rate_applied_a).count();
    let fixed_children_b = assessments.iter().filter(|c| c.fixed_rate_applied_b).count();

    let (rule_id, rule_name, guide_ref) = match rates.rate_applied {
        RateApplied::MinimumRate => ("minimum_annual_rate", "Minimum Annual Rate", "2.4.12"),
        RateApplied::FixedRate => ("fixed_annual_rate", "Fixed Annual Rate", "2.4.11"),
        _ => ("special_rates", "Special Rates", "2.4.11"),
    };

    AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        guide_ref: guide_ref.to_string(),
        input: serde_json::json!({
            "fixed_annual_rate": table.fixed_annual_rate.to_string(),
            "minimum_annual_rate": table.minimum_annual_rate.to_string(),
        }),
        output: serde_json::json!({
            "rate_applied": rates.rate_applied,
            "fixed_total_a": rates.fixed_total_a.to_string(),
            "fixed_total_b": rates.fixed_total_b.to_string(),
            "minimum_total_a": rates.minimum_total_a.to_string(),
            "minimum_total_b": rates.minimum_total_b.to_string(),
            "fixed_children_a": fixed_children_a,
            "fixed_children_b": fixed_children_b,
        }),
        reasoning: format!(
            "Special rate {:?} replaced the standard liability",
            rates.rate_applied
        ),
    }
}
