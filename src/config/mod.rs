//! Configuration for the Child Support Assessment Engine.
//!
//! This module provides types and loading functionality for the yearly
//! rate tables the assessment formula depends on: the self-support
//! amount, fixed and minimum annual rates, cost-of-children brackets and
//! the care-to-cost conversion bands.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AgeGroupCosts, CareCostBand, CareCostConfig, CostAgeGroup, CostBracket, CostBracketSet,
    CostOfChildrenTable, MixedAgeCosts, RateTable, SchemeConfig, SchemeMetadata,
};
