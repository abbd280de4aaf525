use std::borrow::Cow;

use anyhow::{Context, Result};
pub use chrono::naive::NaiveDate as Date;
pub use num_rational::Rational64;
use num_traits::{CheckedDiv, Zero};
use serde::Deserialize;

use crate::{LandType, TransactionType, Valuations, Yen};

/// One transaction as written in a case file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Case {
    pub name: String,
    pub transaction: TransactionType,
    #[serde(default = "yes")]
    pub residential: bool,
    #[serde(default)]
    pub housing_certificate: bool,
    pub land: Option<Land>,
    pub building: Option<Building>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Land {
    pub valuation: Yen,
    #[serde(default, rename = "type")]
    pub land_type: LandType,
    pub area: Option<Number>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Building {
    pub valuation: Yen,
    pub area: Option<Number>,
    pub built: Option<Date>,
    /// Overrides the deduction derived from `built`.
    pub deduction: Option<Yen>,
}

/// The acquisition-tax form: residential and other land are entered separately.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcquisitionForm {
    pub transaction: TransactionType,
    #[serde(default = "yes")]
    pub include_land: bool,
    #[serde(default = "yes")]
    pub include_building: bool,
    pub residential_land_valuation: Option<Yen>,
    pub residential_land_area: Option<Number>,
    pub other_land_valuation: Option<Yen>,
    pub building_valuation: Option<Yen>,
    pub building_area: Option<Number>,
    #[serde(default = "yes")]
    pub building_residential: bool,
    pub built: Option<Date>,
    pub deduction: Option<Yen>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationForm {
    pub transaction: TransactionType,
    #[serde(default = "yes")]
    pub include_land: bool,
    #[serde(default = "yes")]
    pub include_building: bool,
    pub land_valuation: Option<Yen>,
    pub building_valuation: Option<Yen>,
    #[serde(default = "yes")]
    pub residential: bool,
    #[serde(default = "yes")]
    pub housing_certificate: bool,
}

impl AcquisitionForm {
    /// Land is remembered as the sum of residential and other land.
    pub fn valuations(&self) -> Valuations {
        let land = self.residential_land_valuation.unwrap_or(0)
            + self.other_land_valuation.unwrap_or(0);
        Valuations {
            land_valuation: (land > 0).then_some(land),
            building_valuation: self.building_valuation,
        }
    }

    /// Imported land counts as residential land. Values present in the form
    /// are kept.
    pub fn import(&mut self, valuations: Valuations) {
        if self.residential_land_valuation.is_none() {
            self.residential_land_valuation = valuations.land_valuation;
        }
        if self.building_valuation.is_none() {
            self.building_valuation = valuations.building_valuation;
        }
    }
}

impl RegistrationForm {
    pub fn valuations(&self) -> Valuations {
        Valuations {
            land_valuation: self.land_valuation,
            building_valuation: self.building_valuation,
        }
    }

    pub fn import(&mut self, valuations: Valuations) {
        if self.land_valuation.is_none() {
            self.land_valuation = valuations.land_valuation;
        }
        if self.building_valuation.is_none() {
            self.building_valuation = valuations.building_valuation;
        }
    }
}

fn yes() -> bool {
    true
}

/// An exact number such as `120.53` or `1/3`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Cow<'_, str>")]
pub struct Number(pub Rational64);

impl TryFrom<Cow<'_, str>> for Number {
    type Error = anyhow::Error;

    fn try_from(s: Cow<'_, str>) -> Result<Self> {
        let mut split = s.trim().splitn(2, '/');
        let numer = split.next().context("expected a number")?;
        let numer = parse_decimal(numer)?;

        let Some(denom) = split.next() else {
            return Ok(Number(numer));
        };

        let denom = parse_decimal(denom)?;
        anyhow::ensure!(!denom.is_zero(), "division by zero in `{s}`");
        let number = numer
            .checked_div(&denom)
            .with_context(|| format!("`{s}` is out of range"))?;
        Ok(Number(number))
    }
}

fn parse_decimal(s: &str) -> Result<Rational64> {
    let mut split = s.trim().splitn(2, '.');
    let int = split.next().context("expected a number")?;
    let (int, sign) = if let Some(int) = int.strip_prefix('-') {
        (int, -1)
    } else {
        (int, 1)
    };
    anyhow::ensure!(is_digits(int), "expected a number, got `{s}`");
    let int = int.parse::<i64>()?;

    let Some(frac) = split.next() else {
        return Ok(Rational64::from(int * sign));
    };
    anyhow::ensure!(is_digits(frac), "invalid decimals in `{s}`");

    let factor = u32::try_from(frac.len())
        .ok()
        .and_then(|len| 10_i64.checked_pow(len))
        .context("too many decimals")?;
    let numer = int
        .checked_mul(factor)
        .and_then(|n| n.checked_add(frac.parse::<i64>().ok()?))
        .with_context(|| format!("`{s}` is out of range"))?;

    Ok(Rational64::new(numer * sign, factor))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case() {
        let contents = r#"
name: 売買 土地建物
transaction: purchase
housing_certificate: true
land:
  valuation: 20000000
  area: 120.53
building:
  valuation: 15000000
  area: 1/3
  built: 1990-06-01
        "#;
        let case: Case = serde_yaml::from_str(contents).unwrap();
        assert_eq!(case.transaction, TransactionType::Purchase);
        assert!(case.residential);
        assert!(case.housing_certificate);

        let land = case.land.unwrap();
        assert_eq!(land.land_type, LandType::Residential);
        assert_eq!(land.area, Some(Number(Rational64::new(12053, 100))));

        let building = case.building.unwrap();
        assert_eq!(building.area, Some(Number(Rational64::new(1, 3))));
        assert_eq!(building.built, Date::from_ymd_opt(1990, 6, 1));
        assert_eq!(building.deduction, None);
    }

    #[test]
    fn unknown_field() {
        let contents = r#"
name: typo
transaction: gift
land:
  valuation: 1000000
  areaa: 10
        "#;
        assert!(serde_yaml::from_str::<Case>(contents).is_err());
    }

    #[test]
    fn forms() {
        let acquisition: AcquisitionForm = serde_yaml::from_str(
            r#"
transaction: new_build
residential_land_valuation: 20000000
residential_land_area: 100
building_valuation: 15000000
building_area: 80.5
        "#,
        )
        .unwrap();
        assert!(acquisition.include_land && acquisition.include_building);
        assert!(acquisition.building_residential);
        assert_eq!(acquisition.other_land_valuation, None);
        assert_eq!(
            acquisition.building_area,
            Some(Number(Rational64::new(161, 2)))
        );

        let registration: RegistrationForm = serde_yaml::from_str(
            r#"
transaction: inheritance
include_building: false
land_valuation: 20000000
        "#,
        )
        .unwrap();
        assert!(registration.include_land && !registration.include_building);
        assert!(registration.residential && registration.housing_certificate);
    }

    #[test]
    fn valuations_between_forms() {
        let mut acquisition: AcquisitionForm = serde_yaml::from_str(
            r#"
transaction: purchase
residential_land_valuation: 20000000
other_land_valuation: 5000000
        "#,
        )
        .unwrap();
        assert_eq!(
            acquisition.valuations(),
            Valuations {
                land_valuation: Some(25_000_000),
                building_valuation: None,
            }
        );

        acquisition.import(Valuations {
            land_valuation: Some(1),
            building_valuation: Some(15_000_000),
        });
        assert_eq!(acquisition.residential_land_valuation, Some(20_000_000));
        assert_eq!(acquisition.building_valuation, Some(15_000_000));

        let mut registration: RegistrationForm =
            serde_yaml::from_str("transaction: gift").unwrap();
        assert_eq!(registration.valuations(), Valuations::default());
        registration.import(acquisition.valuations());
        assert_eq!(registration.land_valuation, Some(25_000_000));
        assert_eq!(registration.building_valuation, Some(15_000_000));
    }

    #[test]
    fn decimals() {
        let number = |s: &str| Number::try_from(Cow::Borrowed(s)).map(|n| n.0);
        assert_eq!(number("80").unwrap(), Rational64::from(80));
        assert_eq!(number(" 0.05 ").unwrap(), Rational64::new(1, 20));
        assert_eq!(number("-1.5").unwrap(), Rational64::new(-3, 2));
        assert_eq!(number("241.06/2").unwrap(), Rational64::new(12053, 100));
        assert!(number("1/0").is_err());
        assert!(number("ten").is_err());
        assert!(number("1.").is_err());
        assert!(number("1.-5").is_err());
        assert!(number("1.+5").is_err());
        assert!(number("--5").is_err());
        assert!(number("80.0000000000000000001").is_err());
        assert!(number("9223372036854775807.5").is_err());
        assert_eq!(
            number("0.000000000000000001").unwrap(),
            Rational64::new(1, 1_000_000_000_000_000_000)
        );
    }
}
