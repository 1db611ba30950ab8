//! Child input model and related types.
//!
//! This module defines the [`ChildInput`] struct describing a child's age
//! and care arrangement, the [`CarePeriod`] the care amounts are
//! expressed over, and the [`AgeRange`] derived from a child's age.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The period a care amount is expressed over.
///
/// Care can be entered as nights per week, fortnight or year, or
/// directly as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarePeriod {
    /// Nights per week (divisor 7).
    Week,
    /// Nights per fortnight (divisor 14).
    Fortnight,
    /// Nights per year (divisor 365).
    Year,
    /// The amount is already a percentage.
    Percent,
}

impl CarePeriod {
    /// Returns the number of nights in the period, or 100 for percentages.
    pub fn length(&self) -> Decimal {
        match self {
            CarePeriod::Week => Decimal::from(7),
            CarePeriod::Fortnight => Decimal::from(14),
            CarePeriod::Year => Decimal::from(365),
            CarePeriod::Percent => Decimal::from(100),
        }
    }
}

/// The age range a child falls into for cost-of-children purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeRange {
    /// Aged 0-12.
    Under13,
    /// Aged 13-17.
    ThirteenPlus,
    /// Aged 18 or over; excluded from the standard assessment.
    Adult,
}

impl AgeRange {
    /// Derives the age range from an age in whole years.
    ///
    /// # Examples
    ///
    /// ```
    /// use assessment_engine::models::AgeRange;
    ///
    /// assert_eq!(AgeRange::from_age(5), AgeRange::Under13);
    /// assert_eq!(AgeRange::from_age(13), AgeRange::ThirteenPlus);
    /// assert_eq!(AgeRange::from_age(18), AgeRange::Adult);
    /// ```
    pub fn from_age(age: u8) -> Self {
        if age >= 18 {
            AgeRange::Adult
        } else if age >= 13 {
            AgeRange::ThirteenPlus
        } else {
            AgeRange::Under13
        }
    }
}

/// Represents one child in a child support assessment.
///
/// Care amounts for both parents (and optionally a non-parent carer) are
/// interpreted via the child's [`CarePeriod`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildInput {
    /// Unique identifier for the child within the request.
    pub id: String,
    /// The child's age in whole years.
    pub age_years: u8,
    /// Parent A's care amount, interpreted via `care_period`.
    pub care_a: Decimal,
    /// Parent B's care amount, interpreted via `care_period`.
    pub care_b: Decimal,
    /// Non-parent carer's care amount, if a non-parent carer holds care.
    #[serde(default)]
    pub care_npc: Option<Decimal>,
    /// The period the care amounts are expressed over.
    pub care_period: CarePeriod,
}

impl ChildInput {
    /// Returns the child's age range.
    pub fn age_range(&self) -> AgeRange {
        AgeRange::from_age(self.age_years)
    }

    /// Returns true if the child is 18 or over and excluded from the
    /// standard assessment.
    pub fn is_adult(&self) -> bool {
        self.age_range() == AgeRange::Adult
    }

    /// Returns true if the child turns 18 during the assessment period.
    pub fn is_turning_18(&self) -> bool {
        self.age_years == 17
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
    fn test_deserialize_child_with_fortnight_care() {
        let json = r#"{
            "id": "child_001",
            "age_years": 8,
            "care_a": "0",
            "care_b": "14",
            "care_period": "fortnight"
        }"#;

        let child: ChildInput = serde_json::from_str(json).unwrap();
        assert_eq!(child.id, "child_001");
        assert_eq!(child.age_years, 8);
        assert_eq!(child.care_a, dec("0"));
        assert_eq!(child.care_b, dec("14"));
        assert_eq!(child.care_period, CarePeriod::Fortnight);
        assert!(child.care_npc.is_none());
    }

    #[test]
    fn test_deserialize_child_with_npc_care() {
        let json = r#"{
            "id": "child_002",
            "age_years": 14,
            "care_a": "20",
            "care_b": "10",
            "care_npc": "70",
            "care_period": "percent"
        }"#;

        let child: ChildInput = serde_json::from_str(json).unwrap();
        assert_eq!(child.care_npc, Some(dec("70")));
        assert_eq!(child.age_range(), AgeRange::ThirteenPlus);
    }

    #[test]
    fn test_age_range_boundaries() {
        assert_eq!(AgeRange::from_age(0), AgeRange::Under13);
        assert_eq!(AgeRange::from_age(12), AgeRange::Under13);
        assert_eq!(AgeRange::from_age(13), AgeRange::ThirteenPlus);
        assert_eq!(AgeRange::from_age(17), AgeRange::ThirteenPlus);
        assert_eq!(AgeRange::from_age(18), AgeRange::Adult);
        assert_eq!(AgeRange::from_age(21), AgeRange::Adult);
    }

    #[test]
    fn test_adult_and_turning_18_flags() {
        let mut child = ChildInput {
            id: "child_003".to_string(),
            age_years: 17,
            care_a: dec("7"),
            care_b: dec("7"),
            care_npc: None,
            care_period: CarePeriod::Fortnight,
        };
        assert!(!child.is_adult());
        assert!(child.is_turning_18());

        child.age_years = 18;
        assert!(child.is_adult());
        assert!(!child.is_turning_18());
    }

    #[test]
    fn test_care_period_lengths() {
        assert_eq!(CarePeriod::Week.length(), dec("7"));
        assert_eq!(CarePeriod::Fortnight.length(), dec("14"));
        assert_eq!(CarePeriod::Year.length(), dec("365"));
        assert_eq!(CarePeriod::Percent.length(), dec("100"));
    }

    #[test]
    fn test_care_period_serialization() {
        assert_eq!(
            serde_json::to_string(&CarePeriod::Fortnight).unwrap(),
            "\"fortnight\""
        );
        assert_eq!(serde_json::to_string(&CarePeriod::Year).unwrap(), "\"year\"");
    }
}
