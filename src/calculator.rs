use anyhow::Result;
use num_traits::Zero;
use serde::Serialize;

use crate::deduction::{resolve_deduction, Deduction};
use crate::engine::calculate;
use crate::format;
use crate::store::{Form, ValuationStore};
use crate::{AcquisitionResult, Date, LandType, Number, TaxInput, TaxResult, TransactionType, Yen};

/// A case file after evaluation.
#[derive(Debug, Serialize)]
pub struct Evaluation {
    pub name: String,
    pub transaction: TransactionType,
    pub built: Option<Date>,
    /// Set when the deduction was derived from the construction date rather
    /// than given explicitly.
    pub deduction: Option<Deduction>,
    pub result: TaxResult,
}

#[derive(Debug, Serialize)]
pub struct AcquisitionOutcome {
    pub transaction: TransactionType,
    pub built: Option<Date>,
    pub deduction: Option<Deduction>,
    #[serde(flatten)]
    pub result: AcquisitionResult,
}

#[tracing::instrument(skip_all, fields(name = %case.name))]
pub fn evaluate_case(case: format::Case) -> Result<Evaluation> {
    let format::Case {
        name,
        transaction,
        residential,
        housing_certificate,
        land,
        building,
    } = case;

    let mut input = TaxInput {
        is_residential: residential,
        has_housing_certificate: housing_certificate,
        ..TaxInput::new(transaction)
    };

    if let Some(land) = land {
        input.include_land = true;
        input.land_valuation = non_negative(land.valuation, "land.valuation")?;
        input.land_type = land.land_type;
        input.land_area = area(land.area, "land.area")?;
    }

    let mut built = None;
    let mut deduction = None;
    if let Some(building) = building {
        input.include_building = true;
        input.building_valuation = non_negative(building.valuation, "building.valuation")?;
        input.building_area = area(building.area, "building.area")?;
        input.acquisition_deduction = match building.deduction {
            Some(explicit) => non_negative(explicit, "building.deduction")?,
            None => {
                let resolved = resolve_deduction(building.built, transaction, residential);
                tracing::debug!(
                    deduction = resolved.deduction,
                    message = resolved.message,
                    "resolved building deduction"
                );
                deduction = Some(resolved);
                resolved.deduction
            }
        };
        built = building.built;
    }

    let result = calculate(&input);
    tracing::debug!(total = result.total, "calculated");

    Ok(Evaluation {
        name,
        transaction,
        built,
        deduction,
        result,
    })
}

/// Residential land, other land and the building each go through the engine
/// on their own; only the acquisition tax is kept.
#[tracing::instrument(skip_all, fields(transaction = ?form.transaction))]
pub fn acquisition(form: &format::AcquisitionForm) -> Result<AcquisitionOutcome> {
    let transaction = form.transaction;
    let residential_valuation = non_negative(
        form.residential_land_valuation.unwrap_or(0),
        "residential_land_valuation",
    )?;
    let residential_area = area(form.residential_land_area, "residential_land_area")?;
    let other_valuation =
        non_negative(form.other_land_valuation.unwrap_or(0), "other_land_valuation")?;
    let building_valuation =
        non_negative(form.building_valuation.unwrap_or(0), "building_valuation")?;
    let building_area = area(form.building_area, "building_area")?;

    let residential = (form.include_land && residential_valuation > 0).then(|| {
        calculate(&TaxInput {
            include_land: true,
            land_valuation: residential_valuation,
            land_type: LandType::Residential,
            land_area: residential_area,
            building_area,
            is_residential: true,
            ..TaxInput::new(transaction)
        })
    });

    let other = (form.include_land && other_valuation > 0).then(|| {
        calculate(&TaxInput {
            include_land: true,
            land_valuation: other_valuation,
            land_type: LandType::Other,
            ..TaxInput::new(transaction)
        })
    });

    let mut deduction = None;
    let mut building = None;
    if form.include_building && building_valuation > 0 {
        let acquisition_deduction = match form.deduction {
            Some(explicit) => non_negative(explicit, "deduction")?,
            None => {
                let resolved =
                    resolve_deduction(form.built, transaction, form.building_residential);
                deduction = Some(resolved);
                resolved.deduction
            }
        };
        building = Some(calculate(&TaxInput {
            include_building: true,
            building_valuation,
            building_area,
            is_residential: form.building_residential,
            acquisition_deduction,
            ..TaxInput::new(transaction)
        }));
    }

    let res_land_acq = residential.as_ref().map_or(0, |r| r.land_acq);
    let other_land_acq = other.as_ref().map_or(0, |r| r.land_acq);
    let bldg_acq = building.as_ref().map_or(0, |r| r.bldg_acq);

    let mut land_process = Vec::new();
    if let Some(residential) = residential {
        if !residential.process.land_acq.is_empty() {
            land_process.push("【宅地（特例あり）】".to_owned());
            land_process.extend(residential.process.land_acq);
        }
    }
    if let Some(other) = other {
        if !other.process.land_acq.is_empty() {
            if !land_process.is_empty() {
                land_process.push(String::new());
            }
            land_process.push("【その他（宅地以外）】".to_owned());
            land_process.extend(other.process.land_acq);
        }
    }

    let mut result = TaxResult {
        land_acq: res_land_acq + other_land_acq,
        bldg_acq,
        total_acq: res_land_acq + other_land_acq + bldg_acq,
        total: res_land_acq + other_land_acq + bldg_acq,
        ..Default::default()
    };
    result.process.land_acq = land_process;
    if let Some(building) = building {
        result.process.bldg_acq = building.process.bldg_acq;
    }

    Ok(AcquisitionOutcome {
        transaction,
        built: form.built,
        deduction,
        result: AcquisitionResult {
            result,
            res_land_acq,
            other_land_acq,
        },
    })
}

/// Both taxes are computed, the registration form only shows the
/// registration tax.
#[tracing::instrument(skip_all, fields(transaction = ?form.transaction))]
pub fn registration(form: &format::RegistrationForm) -> Result<TaxResult> {
    let input = TaxInput {
        include_land: form.include_land,
        include_building: form.include_building,
        land_valuation: non_negative(form.land_valuation.unwrap_or(0), "land_valuation")?,
        building_valuation: non_negative(
            form.building_valuation.unwrap_or(0),
            "building_valuation",
        )?,
        land_type: LandType::Residential,
        is_residential: form.residential,
        has_housing_certificate: form.housing_certificate,
        ..TaxInput::new(form.transaction)
    };
    Ok(calculate(&input))
}

/// Runs the acquisition form, optionally filling in the valuations last
/// entered on the registration form. Only forms that pass are remembered.
pub async fn acquisition_form(
    store: &ValuationStore,
    mut form: format::AcquisitionForm,
    import: bool,
) -> Result<AcquisitionOutcome> {
    if import {
        match store.load(Form::Registration).await {
            Some(valuations) => form.import(valuations),
            None => tracing::warn!("no registration-tax valuations to import"),
        }
    }
    let outcome = acquisition(&form)?;
    store.save(Form::Acquisition, &form.valuations()).await;
    Ok(outcome)
}

/// Counterpart of [`acquisition_form`] for the registration form.
pub async fn registration_form(
    store: &ValuationStore,
    mut form: format::RegistrationForm,
    import: bool,
) -> Result<TaxResult> {
    if import {
        match store.load(Form::Acquisition).await {
            Some(valuations) => form.import(valuations),
            None => tracing::warn!("no acquisition-tax valuations to import"),
        }
    }
    let result = registration(&form)?;
    store.save(Form::Registration, &form.valuations()).await;
    Ok(result)
}

fn non_negative(value: Yen, field: &str) -> Result<Yen> {
    anyhow::ensure!(value >= 0, "`{field}` must not be negative: {value}");
    Ok(value)
}

fn area(area: Option<format::Number>, field: &str) -> Result<Number> {
    let area = area.map_or_else(Number::zero, |a| a.0);
    anyhow::ensure!(area >= Number::zero(), "`{field}` must not be negative: {area}");
    Ok(area)
}
