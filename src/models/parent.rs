//! Parent input model and related types.
//!
//! This module defines the [`ParentInput`] struct describing one parent's
//! financial circumstances for an assessment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Counts of a parent's relevant dependent children.
///
/// Relevant dependents are other biological or adopted children the
/// parent supports that are not part of any child support case. They
/// reduce the parent's child support income via a cost-based allowance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevantDependents {
    /// Number of relevant dependents aged under 13.
    #[serde(default)]
    pub under_13: u8,
    /// Number of relevant dependents aged 13 or over.
    #[serde(default)]
    pub thirteen_plus: u8,
}

impl RelevantDependents {
    /// Returns the total number of relevant dependents.
    pub fn total(&self) -> u8 {
        self.under_13 + self.thirteen_plus
    }
}

/// A child of the parent in a different child support case.
///
/// Other-case children drive the multi-case allowance (which lowers the
/// parent's child support income) and the multi-case cap on per-child
/// liabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherCaseChild {
    /// The child's age in whole years.
    pub age: u8,
}

/// Represents one parent in a child support assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentInput {
    /// Adjusted taxable income in whole dollars. Reportable fringe
    /// benefits and super contributions are already merged upstream.
    pub adjusted_taxable_income: Decimal,
    /// Relevant dependents supported outside any child support case.
    #[serde(default)]
    pub relevant_dependents: RelevantDependents,
    /// Whether the parent received an income support payment during the
    /// assessed income period.
    #[serde(default)]
    pub receives_income_support: bool,
    /// The parent's children in other child support cases.
    #[serde(default)]
    pub other_case_children: Vec<OtherCaseChild>,
}

impl ParentInput {
    /// Returns true if the parent has at least one other child support case.
    pub fn has_other_cases(&self) -> bool {
        !self.other_case_children.is_empty()
    }

    /// Returns the total number of cases the parent is involved in,
    /// counting this case plus one case per other-case child.
    pub fn total_cases(&self) -> usize {
        1 + self.other_case_children.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_deserialize_minimal_parent() {
        let json = r#"{
            "adjusted_taxable_income": "80000"
        }"#;

        let parent: ParentInput = serde_json::from_str(json).unwrap();
        assert_eq!(parent.adjusted_taxable_income, dec("80000"));
        assert_eq!(parent.relevant_dependents.total(), 0);
        assert!(!parent.receives_income_support);
        assert!(!parent.has_other_cases());
    }

    #[test]
    fn test_deserialize_parent_with_dependents_and_other_cases() {
        let json = r#"{
            "adjusted_taxable_income": "52000",
            "relevant_dependents": { "under_13": 1, "thirteen_plus": 2 },
            "receives_income_support": true,
            "other_case_children": [{ "age": 4 }, { "age": 15 }]
        }"#;

        let parent: ParentInput = serde_json::from_str(json).unwrap();
        assert_eq!(parent.relevant_dependents.under_13, 1);
        assert_eq!(parent.relevant_dependents.thirteen_plus, 2);
        assert_eq!(parent.relevant_dependents.total(), 3);
        assert!(parent.receives_income_support);
        assert_eq!(parent.other_case_children.len(), 2);
        assert_eq!(parent.total_cases(), 3);
    }

    #[test]
    fn test_serialize_round_trip() {
        let parent = ParentInput {
            adjusted_taxable_income: dec("61500"),
            relevant_dependents: RelevantDependents {
                under_13: 1,
                thirteen_plus: 0,
            },
            receives_income_support: false,
            other_case_children: vec![OtherCaseChild { age: 9 }],
        };

        let json = serde_json::to_string(&parent).unwrap();
        let deserialized: ParentInput = serde_json::from_str(&json).unwrap();
        assert_eq!(parent, deserialized);
    }

    #[test]
    fn test_total_cases_counts_current_case() {
        let parent = ParentInput {
            adjusted_taxable_income: dec("40000"),
            relevant_dependents: RelevantDependents::default(),
            receives_income_support: false,
            other_case_children: vec![],
        };
        assert_eq!(parent.total_cases(), 1);
    }
}
