//! Assessment result models for the Child Support Assessment Engine.
//!
//! This module contains the [`AssessmentResult`] type and its associated
//! structures that capture all outputs of an assessment, including
//! per-parent income breakdowns, per-child liabilities, special-rate
//! flags, totals, and audit traces.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AgeRange;

/// The special rate applied to an assessment, if any.
///
/// # Example
///
/// ```
/// use assessment_engine::models::RateApplied;
///
/// let rate = RateApplied::FixedRate;
/// assert_eq!(format!("{:?}", rate), "FixedRate");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateApplied {
    /// The standard formula applied throughout.
    None,
    /// The fixed annual rate applied to at least one parent.
    FixedRate,
    /// The minimum annual rate applied to at least one parent.
    MinimumRate,
    /// A fixed rate applied to one parent and the minimum rate to the other.
    Both,
}

/// The parent liable for the final payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payer {
    /// Parent A pays Parent B.
    ParentA,
    /// Parent B pays Parent A.
    ParentB,
    /// No payment flows between the parents.
    Neither,
}

/// The specific circumstance behind a zero final payment.
///
/// A zero payment is reported with the reason it arose so consumers can
/// explain the outcome without re-deriving eligibility logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPaymentReason {
    /// Both parents' child support incomes are zero after deductions.
    ZeroCombinedIncome,
    /// A low-income parent on income support holds 14% or more care, so
    /// the minimum annual rate does not apply.
    MinimumRatePreventedByCare,
    /// Neither parent reaches the 35% care needed to receive payment.
    BothParentsBelowCareThreshold,
    /// Income and care contributions balance out for every child.
    BalancedContributions,
    /// A parent owes support but the receiving parent holds under 35% care.
    ReceiverBelowCareThreshold,
}

/// One parent's income breakdown.
///
/// The surplus is the signed result of the deductions and may be
/// negative; only the final child support income is clamped at zero, so
/// a breakdown can show the true deficit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentIncome {
    /// The parent's adjusted taxable income.
    pub adjusted_taxable_income: Decimal,
    /// The self-support amount deducted.
    pub self_support_amount: Decimal,
    /// The relevant dependent allowance deducted.
    pub relevant_dependent_allowance: Decimal,
    /// The multi-case allowance deducted.
    pub multi_case_allowance: Decimal,
    /// ATI minus all deductions, before clamping (may be negative).
    pub income_surplus: Decimal,
    /// The child support income: the surplus clamped at zero.
    pub child_support_income: Decimal,
}

/// The cost bracket used for the cost-of-children lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBracketDetail {
    /// Lower income bound of the bracket.
    pub min_income: Decimal,
    /// Upper income bound of the bracket; `None` means unbounded.
    pub max_income: Option<Decimal>,
    /// Cost accumulated by the brackets below.
    pub fixed_amount: Decimal,
    /// Marginal rate applied within the bracket.
    pub marginal_rate: Decimal,
    /// The portion of the combined income falling inside the bracket.
    pub income_in_bracket: Decimal,
}

/// The assessment outcome for a single child.
///
/// A parent's standard child support percentage is `None` when a fixed
/// or minimum rate replaced the standard computation for that parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildAssessment {
    /// The ID of the child this assessment is for.
    pub child_id: String,
    /// The child's age in whole years.
    pub age_years: u8,
    /// The child's age range.
    pub age_range: AgeRange,
    /// True if the child is 18 or over and excluded from the assessment.
    pub adult_child: bool,
    /// True if the child turns 18 during the assessment period.
    pub turning_18: bool,
    /// Parent A's rounded care percentage.
    pub care_percentage_a: Decimal,
    /// Parent B's rounded care percentage.
    pub care_percentage_b: Decimal,
    /// The non-parent carer's rounded care percentage, if any.
    pub care_percentage_npc: Option<Decimal>,
    /// Parent A's cost percentage.
    pub cost_percentage_a: Decimal,
    /// Parent B's cost percentage.
    pub cost_percentage_b: Decimal,
    /// The non-parent carer's cost percentage, if any.
    pub cost_percentage_npc: Option<Decimal>,
    /// Parent A's standard child support percentage, suppressed when a
    /// special rate applies to Parent A.
    pub child_support_percentage_a: Option<Decimal>,
    /// Parent B's standard child support percentage, suppressed when a
    /// special rate applies to Parent B.
    pub child_support_percentage_b: Option<Decimal>,
    /// This child's equal share of the total cost of children.
    pub cost_per_child: Decimal,
    /// Parent A's liability before special rates and caps.
    pub standard_liability_a: Decimal,
    /// Parent B's liability before special rates and caps.
    pub standard_liability_b: Decimal,
    /// Parent A's final liability for this child.
    pub final_liability_a: Decimal,
    /// Parent B's final liability for this child.
    pub final_liability_b: Decimal,
    /// Parent A's liability to the non-parent carer for this child.
    pub liability_to_npc_a: Decimal,
    /// Parent B's liability to the non-parent carer for this child.
    pub liability_to_npc_b: Decimal,
    /// True if the fixed annual rate applied to Parent A for this child.
    pub fixed_rate_applied_a: bool,
    /// True if the fixed annual rate applied to Parent B for this child.
    pub fixed_rate_applied_b: bool,
    /// True if the minimum annual rate applied to Parent A.
    pub minimum_rate_applied_a: bool,
    /// True if the minimum annual rate applied to Parent B.
    pub minimum_rate_applied_b: bool,
    /// Parent A's multi-case cap for this child, when Parent A has other cases.
    pub multi_case_cap_a: Option<Decimal>,
    /// Parent B's multi-case cap for this child, when Parent B has other cases.
    pub multi_case_cap_b: Option<Decimal>,
    /// True if the multi-case cap reduced Parent A's liability.
    pub multi_case_cap_applied_a: bool,
    /// True if the multi-case cap reduced Parent B's liability.
    pub multi_case_cap_applied_b: bool,
}

/// A single step in the audit trace recording a formula decision.
///
/// Each step captures the input, output, and reasoning for a rule
/// application, referencing the Child Support Guide section it follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the Child Support Guide section for this rule.
    pub guide_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during an assessment.
///
/// Warnings indicate circumstances that don't prevent the assessment but
/// may require attention, such as a child turning 18.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for an assessment.
///
/// Records every decision made during the assessment for transparency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of assessment steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during the assessment.
    pub warnings: Vec<AuditWarning>,
    /// The total assessment duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a child support assessment.
///
/// This struct captures all outputs from the assessment engine,
/// including every intermediate quantity of the eight-step formula and a
/// complete audit trace, so a consumer can render a step-by-step
/// breakdown without re-deriving any eligibility logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Unique identifier for this assessment.
    pub assessment_id: Uuid,
    /// When the assessment was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the assessment.
    pub engine_version: String,
    /// The assessment year whose rate table was used.
    pub year: u16,
    /// Parent A's income breakdown.
    pub income_a: ParentIncome,
    /// Parent B's income breakdown.
    pub income_b: ParentIncome,
    /// The combined child support income.
    pub combined_child_support_income: Decimal,
    /// Parent A's share of the combined income, as a percentage.
    pub income_percentage_a: Decimal,
    /// Parent B's share, derived as the complement of Parent A's share.
    pub income_percentage_b: Decimal,
    /// The total annual cost of the children.
    pub total_cost_of_children: Decimal,
    /// The cost bracket the combined income fell into.
    pub cost_bracket: CostBracketDetail,
    /// The equal per-child share of the total cost.
    pub cost_per_child: Decimal,
    /// Per-child assessment outcomes.
    pub children: Vec<ChildAssessment>,
    /// Parent A's aggregate standard liability before rates and caps.
    pub total_liability_a: Decimal,
    /// Parent B's aggregate standard liability before rates and caps.
    pub total_liability_b: Decimal,
    /// Parent A's aggregate final liability.
    pub final_liability_a: Decimal,
    /// Parent B's aggregate final liability.
    pub final_liability_b: Decimal,
    /// Total fixed annual rate payable by Parent A.
    pub fixed_rate_total_a: Decimal,
    /// Total fixed annual rate payable by Parent B.
    pub fixed_rate_total_b: Decimal,
    /// Minimum annual rate payable by Parent A.
    pub minimum_rate_total_a: Decimal,
    /// Minimum annual rate payable by Parent B.
    pub minimum_rate_total_b: Decimal,
    /// The special rate applied to this assessment, if any.
    pub rate_applied: RateApplied,
    /// The parent liable for the final payment.
    pub payer: Payer,
    /// The annual amount flowing between the parents.
    pub final_payment_amount: Decimal,
    /// The total annual amount owed to the non-parent carer, if one holds care.
    pub payment_to_npc: Option<Decimal>,
    /// Why the final payment is zero, when it is.
    pub zero_payment_reason: Option<ZeroPaymentReason>,
    /// True if a multi-case cap reduced any of Parent A's liabilities.
    pub multi_case_cap_applied_a: bool,
    /// True if a multi-case cap reduced any of Parent B's liabilities.
    pub multi_case_cap_applied_b: bool,
    /// Complete audit trace of assessment decisions.
    pub audit_trace: AuditTrace,
}
