//! Calculation logic for the Child Support Assessment Engine.
//!
//! This module contains all the calculation functions of the income
//! shares formula, including child support income and income
//! percentages, care and cost percentage conversion, the cost of
//! children, per-child liabilities, the fixed and minimum annual rates,
//! multi-case allowances and caps, and the assessment orchestrator that
//! ties the stages together.

mod assessment;
mod care;
mod cost_of_children;
mod income;
mod liability;
mod multi_case;
mod rates;

pub use assessment::assess;
pub use care::{care_amount_to_percentage, care_to_cost_percentage, round_care_percentage};
pub use cost_of_children::{cost_age_group, cost_of_children, CostOfChildrenResult};
pub use income::{
    child_support_income, income_breakdown, income_percentages, relevant_dependent_allowance,
};
pub use liability::{
    child_liability, child_support_percentage, should_pay_liability, ChildLiabilityInput,
    ChildLiabilityResult, RECEIVER_CARE_THRESHOLD,
};
pub use multi_case::{
    apply_multi_case_caps, fixed_rate_child_share, minimum_rate_case_share, multi_case_allowance,
    multi_case_cap, solo_cost_per_child, MultiCaseCapOutcome, MINIMUM_RATE_MAX_CASES,
};
pub use rates::{
    apply_special_rates, fixed_rate_applies, minimum_rate_applies, RateEligibility, RatesOutcome,
    FIXED_RATE_MAX_CHILDREN, MINIMUM_RATE_CARE_THRESHOLD,
};
