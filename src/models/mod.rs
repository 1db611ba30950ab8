//! Data models for the Child Support Assessment Engine.
//!
//! This module contains the input models (parents, children) and the
//! result models produced by an assessment.

mod assessment_result;
mod child;
mod parent;

pub use assessment_result::{
    AssessmentResult, AuditStep, AuditTrace, AuditWarning, ChildAssessment, CostBracketDetail,
    ParentIncome, Payer, RateApplied, ZeroPaymentReason,
};
pub use child::{AgeRange, CarePeriod, ChildInput};
pub use parent::{OtherCaseChild, ParentInput, RelevantDependents};
