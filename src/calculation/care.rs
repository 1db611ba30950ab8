//! Care percentage conversion functionality.
//!
//! This module converts care amounts (nights per week, fortnight or year,
//! or a direct percentage) into a rounded care percentage, and converts
//! rounded care percentages into cost percentages via the configured
//! conversion bands.

use rust_decimal::Decimal;

use crate::config::CareCostBand;
use crate::error::{EngineError, EngineResult};
use crate::models::CarePeriod;

/// Converts a care amount over a period into a raw (unrounded) care
/// percentage.
///
/// # Arguments
///
/// * `amount` - Nights of care within the period, or a percentage when
///   the period is [`CarePeriod::Percent`]
/// * `period` - The period the amount is expressed over
///
/// # Examples
///
/// ```
/// use assessment_engine::calculation::care_amount_to_percentage;
/// use assessment_engine::models::CarePeriod;
/// use rust_decimal::Decimal;
///
/// let pct = care_amount_to_percentage(Decimal::from(7), CarePeriod::Fortnight);
/// assert_eq!(pct, Decimal::from(50));
/// ```
pub fn care_amount_to_percentage(amount: Decimal, period: CarePeriod) -> Decimal {
    if period == CarePeriod::Percent {
        return amount;
    }

    amount / period.length() * Decimal::from(100)
}

/// Rounds a raw care percentage using the statutory asymmetric rule.
///
/// Percentages below 50 round down to the nearest whole percent;
/// percentages at or above 50 round up. This is not standard
/// round-half-up: 49.9 rounds to 49 while 50.1 rounds to 51.
///
/// # Examples
///
/// ```
/// use assessment_engine::calculation::round_care_percentage;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let d = |s| Decimal::from_str(s).unwrap();
/// assert_eq!(round_care_percentage(d("49.9")), d("49"));
/// assert_eq!(round_care_percentage(d("50.0")), d("50"));
/// assert_eq!(round_care_percentage(d("50.1")), d("51"));
/// ```
pub fn round_care_percentage(care: Decimal) -> Decimal {
    if care < Decimal::from(50) {
        care.floor()
    } else {
        care.ceil()
    }
}

/// Converts a rounded care percentage into a cost percentage using the
/// configured conversion bands.
///
/// Each band covers an inclusive range of rounded care percentages and
/// yields `base_cost + per_point * (care - care_low)`, so flat bands have
/// a zero `per_point` and interpolating bands a non-zero one. The engine
/// performs only the lookup the table specifies; the band boundaries are
/// never hard-coded here.
///
/// # Arguments
///
/// * `care` - The rounded care percentage (0-100)
/// * `bands` - The conversion bands from the scheme configuration
///
/// # Returns
///
/// Returns the cost percentage, or a `CalculationError` if no band
/// covers the care percentage (a misconfigured table).
pub fn care_to_cost_percentage(care: Decimal, bands: &[CareCostBand]) -> EngineResult<Decimal> {
    let band = bands
        .iter()
        .find(|b| care >= b.care_low && care <= b.care_high)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("no care-cost band covers care percentage {}", care),
        })?;

    Ok(band.base_cost + band.per_point * (care - band.care_low))
}
