use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::format::{Date, Rational64 as Number};

/// Whole yen. No amount in this crate carries a fraction of a yen.
pub type Yen = i64;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum TransactionType {
    Purchase,
    NewBuild,
    Inheritance,
    Gift,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransactionType::Purchase => "売買 (購入)",
            TransactionType::NewBuild => "新築 (建物の保存登記)",
            TransactionType::Inheritance => "相続",
            TransactionType::Gift => "贈与",
        })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LandType {
    #[default]
    Residential,
    Other,
}

/// Everything the engine needs for one transaction.
///
/// Amounts and areas are expected to be non-negative; the engine does not
/// check this.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxInput {
    pub include_land: bool,
    pub include_building: bool,
    pub land_valuation: Yen,
    pub building_valuation: Yen,
    pub transaction: TransactionType,
    pub land_type: LandType,
    /// m²
    pub land_area: Number,
    /// m², floor area
    pub building_area: Number,
    pub is_residential: bool,
    pub has_housing_certificate: bool,
    pub acquisition_deduction: Yen,
}

impl TaxInput {
    /// An input with both portions excluded and all amounts zero.
    pub fn new(transaction: TransactionType) -> Self {
        Self {
            include_land: false,
            include_building: false,
            land_valuation: 0,
            building_valuation: 0,
            transaction,
            land_type: LandType::Residential,
            land_area: Number::from(0),
            building_area: Number::from(0),
            is_residential: false,
            has_housing_certificate: false,
            acquisition_deduction: 0,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub land_acq: Yen,
    pub land_reg: Yen,
    pub bldg_acq: Yen,
    pub bldg_reg: Yen,
    pub total_acq: Yen,
    pub total_reg: Yen,
    pub total: Yen,
    pub process: Process,
}

/// The computation steps of each cell, in the order they were taken.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub land_acq: Vec<String>,
    pub land_reg: Vec<String>,
    pub bldg_acq: Vec<String>,
    pub bldg_reg: Vec<String>,
}

/// Acquisition tax with residential and other land evaluated separately.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionResult {
    #[serde(flatten)]
    pub result: TaxResult,
    pub res_land_acq: Yen,
    pub other_land_acq: Yen,
}

/// Valuations remembered per form, so the other form can pick them up.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Valuations {
    pub land_valuation: Option<Yen>,
    pub building_valuation: Option<Yen>,
}
