//! Request types for the Child Support Assessment Engine API.
//!
//! This module defines the JSON request structures for the `/assess`
//! endpoint.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{CarePeriod, ChildInput, OtherCaseChild, ParentInput, RelevantDependents};

/// Request body for the `/assess` endpoint.
///
/// Contains all information needed to assess child support between two
/// parents for a set of children in a given assessment year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRequest {
    /// The assessment year selecting the rate table.
    pub year: u16,
    /// Parent A's circumstances.
    pub parent_a: ParentRequest,
    /// Parent B's circumstances.
    pub parent_b: ParentRequest,
    /// The children of the case.
    pub children: Vec<ChildRequest>,
}

/// Parent information in an assessment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentRequest {
    /// Adjusted taxable income in whole dollars.
    pub adjusted_taxable_income: Decimal,
    /// Relevant dependents supported outside any child support case.
    #[serde(default)]
    pub relevant_dependents: RelevantDependentsRequest,
    /// Whether the parent received income support payments.
    #[serde(default)]
    pub receives_income_support: bool,
    /// The parent's children in other child support cases.
    #[serde(default)]
    pub other_case_children: Vec<OtherCaseChildRequest>,
}

/// Relevant dependent counts in an assessment request.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RelevantDependentsRequest {
    /// Number of relevant dependents aged under 13.
    #[serde(default)]
    pub under_13: u8,
    /// Number of relevant dependents aged 13 or over.
    #[serde(default)]
    pub thirteen_plus: u8,
}

/// An other-case child in an assessment request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OtherCaseChildRequest {
    /// The child's age in whole years.
    pub age: u8,
}

/// Child information in an assessment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildRequest {
    /// Unique identifier for the child within the request.
    pub id: String,
    /// The child's age in whole years.
    pub age_years: u8,
    /// Parent A's care amount, interpreted via `care_period`.
    pub care_a: Decimal,
    /// Parent B's care amount, interpreted via `care_period`.
    pub care_b: Decimal,
    /// Non-parent carer's care amount, if any.
    #[serde(default)]
    pub care_npc: Option<Decimal>,
    /// The period the care amounts are expressed over.
    pub care_period: CarePeriod,
}

impl From<ParentRequest> for ParentInput {
    fn from(req: ParentRequest) -> Self {
        ParentInput {
            adjusted_taxable_income: req.adjusted_taxable_income,
            relevant_dependents: RelevantDependents {
                under_13: req.relevant_dependents.under_13,
                thirteen_plus: req.relevant_dependents.thirteen_plus,
            },
            receives_income_support: req.receives_income_support,
            other_case_children: req
                .other_case_children
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

impl From<OtherCaseChildRequest> for OtherCaseChild {
    fn from(req: OtherCaseChildRequest) -> Self {
        OtherCaseChild { age: req.age }
    }
}

impl From<ChildRequest> for ChildInput {
    fn from(req: ChildRequest) -> Self {
        ChildInput {
            id: req.id,
            age_years: req.age_years,
            care_a: req.care_a,
            care_b: req.care_b,
            care_npc: req.care_npc,
            care_period: req.care_period,
        }
    }
}
