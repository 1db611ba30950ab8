//! Per-child liability calculation functionality.
//!
//! This module computes each parent's child support percentage (income
//! percentage minus cost percentage) and the standard per-child
//! liability, including the share owed to a non-parent carer.

use rust_decimal::Decimal;

use crate::config::CareCostBand;
use crate::error::EngineResult;
use crate::models::ChildInput;

use super::care::{care_amount_to_percentage, care_to_cost_percentage, round_care_percentage};

/// Minimum care percentage a carer needs to be eligible to receive
/// child support.
pub const RECEIVER_CARE_THRESHOLD: Decimal = Decimal::from_parts(35, 0, 0, false, 0);

/// Input for calculating one child's standard liability.
#[derive(Debug, Clone)]
pub struct ChildLiabilityInput<'a> {
    /// The child being assessed.
    pub child: &'a ChildInput,
    /// Parent A's income percentage.
    pub income_percentage_a: Decimal,
    /// Parent B's income percentage.
    pub income_percentage_b: Decimal,
    /// The child's equal share of the total cost of children.
    pub cost_per_child: Decimal,
    /// Care-cost conversion bands from the scheme configuration.
    pub bands: &'a [CareCostBand],
}

/// The standard liability outcome for one child, before special rates
/// and multi-case caps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildLiabilityResult {
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
    /// Parent A's child support percentage (may be negative).
    pub child_support_percentage_a: Decimal,
    /// Parent B's child support percentage (may be negative).
    pub child_support_percentage_b: Decimal,
    /// Parent A's standard liability for this child.
    pub liability_a: Decimal,
    /// Parent B's standard liability for this child.
    pub liability_b: Decimal,
    /// Parent A's liability to the non-parent carer for this child.
    pub liability_to_npc_a: Decimal,
    /// Parent B's liability to the non-parent carer for this child.
    pub liability_to_npc_b: Decimal,
    /// True if the child is 18 or over and excluded from the assessment.
    pub adult_child: bool,
    /// True if the child turns 18 during the assessment period.
    pub turning_18: bool,
}

/// Computes a parent's child support percentage.
///
/// The child support percentage is the parent's income percentage minus
/// their cost percentage. A negative result means the parent receives
/// rather than pays for this child.
pub fn child_support_percentage(income_percentage: Decimal, cost_percentage: Decimal) -> Decimal {
    income_percentage - cost_percentage
}

/// Determines whether a liability is payable to the receiving side.
///
/// Support is only payable when the receiving parent holds at least 35%
/// care of the child, or a non-parent carer does.
pub fn should_pay_liability(receiver_care: Decimal, npc_care: Option<Decimal>) -> bool {
    receiver_care >= RECEIVER_CARE_THRESHOLD
        || npc_care.is_some_and(|c| c >= RECEIVER_CARE_THRESHOLD)
}

/// Calculates the standard per-child liability for both parents.
///
/// Steps 6-8 of the formula for a single child: care percentages round
/// per the asymmetric rule, convert to cost percentages via the table,
/// and the parent with the higher positive child support percentage is
/// liable for that share of the child's cost, provided the receiving
/// side holds at least 35% care. Support is one-directional per child:
/// at most one of the two liabilities is positive.
///
/// Adult children (18 and over) are excluded from the standard
/// assessment and carry zero liability.
///
/// When a non-parent carer holds at least 35% care, each parent with a
/// positive child support percentage additionally owes the carer that
/// share of the child's cost scaled by the carer's cost percentage.
pub fn child_liability(input: ChildLiabilityInput<'_>) -> EngineResult<ChildLiabilityResult> {
    let child = input.child;

    let adult_child = child.is_adult();
    let turning_18 = child.is_turning_18();

    let care_a = round_care_percentage(care_amount_to_percentage(child.care_a, child.care_period));
    let care_b = round_care_percentage(care_amount_to_percentage(child.care_b, child.care_period));
    let care_npc = child
        .care_npc
        .map(|c| round_care_percentage(care_amount_to_percentage(c, child.care_period)));

    let cost_a = care_to_cost_percentage(care_a, input.bands)?;
    let cost_b = care_to_cost_percentage(care_b, input.bands)?;
    let cost_npc = care_npc
        .map(|c| care_to_cost_percentage(c, input.bands))
        .transpose()?;

    let cs_percentage_a = child_support_percentage(input.income_percentage_a, cost_a);
    let cs_percentage_b = child_support_percentage(input.income_percentage_b, cost_b);

    let mut liability_a = Decimal::ZERO;
    let mut liability_b = Decimal::ZERO;

    if !adult_child {
        let positive_a = cs_percentage_a.max(Decimal::ZERO);
        let positive_b = cs_percentage_b.max(Decimal::ZERO);
        let hundred = Decimal::from(100);

        if positive_a > positive_b {
            if should_pay_liability(care_b, care_npc) {
                liability_a = positive_a / hundred * input.cost_per_child;
            }
        } else if positive_b > positive_a && should_pay_liability(care_a, care_npc) {
            liability_b = positive_b / hundred * input.cost_per_child;
        }
    }

    // Non-parent carer apportionment: additive to, not a replacement
    // for, the inter-parent liability.
    let mut liability_to_npc_a = Decimal::ZERO;
    let mut liability_to_npc_b = Decimal::ZERO;

    if !adult_child {
        if let (Some(npc_care), Some(npc_cost)) = (care_npc, cost_npc) {
            if npc_care >= RECEIVER_CARE_THRESHOLD {
                let hundred = Decimal::from(100);
                if cs_percentage_a > Decimal::ZERO {
                    liability_to_npc_a =
                        cs_percentage_a / hundred * input.cost_per_child * (npc_cost / hundred);
                }
                if cs_percentage_b > Decimal::ZERO {
                    liability_to_npc_b =
                        cs_percentage_b / hundred * input.cost_per_child * (npc_cost / hundred);
                }
            }
        }
    }

    Ok(ChildLiabilityResult {
        care_percentage_a: care_a,
        care_percentage_b: care_b,
        care_percentage_npc: care_npc,
        cost_percentage_a: cost_a,
        cost_percentage_b: cost_b,
        cost_percentage_npc: cost_npc,
        child_support_percentage_a: cs_percentage_a,
        child_support_percentage_b: cs_percentage_b,
        liability_a,
        liability_b,
        liability_to_npc_a,
        liability_to_npc_b,
        adult_child,
        turning_18,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::CarePeriod;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bands() -> Vec<CareCostBand> {
        ConfigLoader::load("./config/csa")
            .unwrap()
            .care_cost_bands()
            .to_vec()
    }

    fn child(age: u8, care_a: &str, care_b: &str, care_npc: Option<&str>) -> ChildInput {
        ChildInput {
            id: "child_001".to_string(),
            age_years: age,
            care_a: dec(care_a),
            care_b: dec(care_b),
            care_npc: care_npc.map(dec),
            care_period: CarePeriod::Percent,
        }
    }

    /// LI-001: higher-income parent with no care pays their full percentage
    #[test]
    fn test_no_care_payer_pays_full_percentage() {
        let bands = bands();
        let c = child(8, "0", "100", None);
        let result = child_liability(ChildLiabilityInput {
            child: &c,
            income_percentage_a: dec("72"),
            income_percentage_b: dec("28"),
            cost_per_child: dec("8000"),
            bands: &bands,
        })
        .unwrap();

        assert_eq!(result.cost_percentage_a, dec("0"));
        assert_eq!(result.cost_percentage_b, dec("100"));
        assert_eq!(result.child_support_percentage_a, dec("72"));
        assert_eq!(result.child_support_percentage_b, dec("-72"));
        assert_eq!(result.liability_a, dec("72") / dec("100") * dec("8000"));
        assert_eq!(result.liability_b, dec("0"));
    }

    /// LI-002: at most one parent is liable per child
    #[test]
    fn test_one_directional_liability() {
        let bands = bands();
        let c = child(10, "50", "50", None);
        let result = child_liability(ChildLiabilityInput {
            child: &c,
            income_percentage_a: dec("60"),
            income_percentage_b: dec("40"),
            cost_per_child: dec("10000"),
            bands: &bands,
        })
        .unwrap();

        let positive = [result.liability_a, result.liability_b]
            .iter()
            .filter(|l| **l > Decimal::ZERO)
            .count();
        assert!(positive <= 1);
        // A has 60 - 50 = 10, B has 40 - 50 = -10, so A pays.
        assert!(result.liability_a > Decimal::ZERO);
    }

    /// LI-003: liability withheld when the receiver is under 35% care
    #[test]
    fn test_receiver_below_care_threshold_blocks_payment() {
        let bands = bands();
        // B would receive but only has 20% care; the rest is with relatives
        // that are not part of the assessment.
        let c = child(8, "10", "20", None);
        let result = child_liability(ChildLiabilityInput {
            child: &c,
            income_percentage_a: dec("80"),
            income_percentage_b: dec("20"),
            cost_per_child: dec("9000"),
            bands: &bands,
        })
        .unwrap();

        assert!(result.child_support_percentage_a > Decimal::ZERO);
        assert_eq!(result.liability_a, dec("0"));
        assert_eq!(result.liability_b, dec("0"));
    }

    /// LI-004: an NPC with 35%+ care unlocks payment
    #[test]
    fn test_npc_care_unlocks_payment() {
        let bands = bands();
        let c = child(8, "10", "20", Some("70"));
        let result = child_liability(ChildLiabilityInput {
            child: &c,
            income_percentage_a: dec("80"),
            income_percentage_b: dec("20"),
            cost_per_child: dec("9000"),
            bands: &bands,
        })
        .unwrap();

        assert!(result.liability_a > Decimal::ZERO);
        // NPC share: cs% / 100 * cost * npc cost% / 100, npc cost 76%
        assert_eq!(result.cost_percentage_npc, Some(dec("76")));
        assert!(result.liability_to_npc_a > Decimal::ZERO);
        assert_eq!(result.liability_to_npc_b, dec("0"));
    }

    /// LI-005: adult children carry no liability
    #[test]
    fn test_adult_child_no_liability() {
        let bands = bands();
        let c = child(18, "0", "100", None);
        let result = child_liability(ChildLiabilityInput {
            child: &c,
            income_percentage_a: dec("72"),
            income_percentage_b: dec("28"),
            cost_per_child: dec("8000"),
            bands: &bands,
        })
        .unwrap();

        assert!(result.adult_child);
        assert_eq!(result.liability_a, dec("0"));
        assert_eq!(result.liability_b, dec("0"));
        assert_eq!(result.liability_to_npc_a, dec("0"));
    }

    /// LI-006: 17-year-olds are flagged as turning 18
    #[test]
    fn test_turning_18_flag() {
        let bands = bands();
        let c = child(17, "0", "100", None);
        let result = child_liability(ChildLiabilityInput {
            child: &c,
            income_percentage_a: dec("50"),
            income_percentage_b: dec("50"),
            cost_per_child: dec("8000"),
            bands: &bands,
        })
        .unwrap();

        assert!(!result.adult_child);
        assert!(result.turning_18);
    }

    /// LI-007: nights per fortnight round through the asymmetric rule
    #[test]
    fn test_fortnight_nights_round_asymmetrically() {
        let bands = bands();
        let c = ChildInput {
            id: "child_002".to_string(),
            age_years: 6,
            // 5/14 nights = 35.71% which floors to 35%
            care_a: dec("5"),
            care_b: dec("9"),
            care_npc: None,
            care_period: CarePeriod::Fortnight,
        };
        let result = child_liability(ChildLiabilityInput {
            child: &c,
            income_percentage_a: dec("50"),
            income_percentage_b: dec("50"),
            cost_per_child: dec("8000"),
            bands: &bands,
        })
        .unwrap();

        assert_eq!(result.care_percentage_a, dec("35"));
        // 9/14 = 64.29% floors? No: 64.29 >= 50 so it ceils to 65.
        assert_eq!(result.care_percentage_b, dec("65"));
        assert_eq!(result.cost_percentage_a, dec("25"));
        assert_eq!(result.cost_percentage_b, dec("75"));
    }

    /// LI-008: equal percentages mean no liability either way
    #[test]
    fn test_equal_percentages_no_liability() {
        let bands = bands();
        let c = child(9, "50", "50", None);
        let result = child_liability(ChildLiabilityInput {
            child: &c,
            income_percentage_a: dec("50"),
            income_percentage_b: dec("50"),
            cost_per_child: dec("10000"),
            bands: &bands,
        })
        .unwrap();

        assert_eq!(result.liability_a, dec("0"));
        assert_eq!(result.liability_b, dec("0"));
    }
}
