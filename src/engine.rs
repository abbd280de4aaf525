use num_traits::Zero;

use crate::formatting::{Area, Grouped, Jpy, Percent};
use crate::{LandType, Number, TaxInput, TaxResult, TransactionType, Yen};

const INHERITANCE_EXEMPT: &str = "相続のため不動産取得税は非課税 (0円)";

// 登録免許税法 第19条
const MINIMUM_REGISTRATION_TAX: Yen = 1_000;

// 地方税法 第73条の24: the larger of ¥45,000 and the per-m² formula
const MINIMUM_LAND_REDUCTION: Yen = 45_000;
const REDUCTION_AREA_CAP: i64 = 200;

/// Rate in hundredths of a percent, `150` is 1.5%.
fn basis_points(bp: i64) -> Number {
    Number::new(bp, 10_000)
}

fn floor_yen(amount: Number) -> Yen {
    amount.floor().to_integer()
}

fn truncate_to(amount: Yen, unit: Yen) -> Yen {
    amount.div_euclid(unit) * unit
}

struct Rate {
    rate: Number,
    note: &'static str,
}

impl Rate {
    fn new(bp: i64, note: &'static str) -> Self {
        Self {
            rate: basis_points(bp),
            note,
        }
    }
}

/// Computes acquisition and registration tax for the land and building
/// portions of one transaction.
pub fn calculate(input: &TaxInput) -> TaxResult {
    let mut result = TaxResult::default();

    if input.include_land && input.land_valuation > 0 {
        result.land_acq = land_acquisition(input, &mut result.process.land_acq);
        result.land_reg = registration(
            input.land_valuation,
            land_registration_rate(input.transaction),
            &mut result.process.land_reg,
        );
    }

    if input.include_building && input.building_valuation > 0 {
        result.bldg_acq = building_acquisition(input, &mut result.process.bldg_acq);
        result.bldg_reg = registration(
            input.building_valuation,
            building_registration_rate(input),
            &mut result.process.bldg_reg,
        );
    }

    result.total_acq = result.land_acq + result.bldg_acq;
    result.total_reg = result.land_reg + result.bldg_reg;
    result.total = result.total_acq + result.total_reg;

    result
}

fn land_acquisition(input: &TaxInput, process: &mut Vec<String>) -> Yen {
    // 地方税法 第73条の7
    if input.transaction == TransactionType::Inheritance {
        process.push(INHERITANCE_EXEMPT.to_owned());
        return 0;
    }

    let valuation = input.land_valuation;
    // 地方税法 附則第11条の5: half the valuation for residential land
    let base = match input.land_type {
        LandType::Residential => valuation.div_euclid(2),
        LandType::Other => valuation,
    };
    let rate = basis_points(300);
    let nominal = floor_yen(Number::from(base) * rate);

    process.push(format!("評価額: {}", Jpy(valuation)));
    if input.land_type == LandType::Residential {
        process.push(format!("課税標準額: {} (宅地特例 1/2)", Jpy(base)));
    }
    process.push(format!("計算上の税額: {} × 3% = {}", Jpy(base), Jpy(nominal)));

    let mut reduction = 0;
    if input.is_residential && input.land_area > Number::zero() && input.building_area > Number::zero()
    {
        let unit_price = Number::from(base) / input.land_area;
        let capped_area = (input.building_area * 2).min(Number::from(REDUCTION_AREA_CAP));
        let reduction_b = floor_yen(unit_price * capped_area * rate);

        reduction = reduction_b.max(MINIMUM_LAND_REDUCTION);

        let unit_price = Grouped(floor_yen(unit_price));
        process.push("--- 税額軽減 (住宅用地) ---".to_owned());
        process.push(format!("土地1m²あたりの課税標準額: {unit_price}円"));
        process.push(format!(
            "控除対象面積 (床面積×2, 上限200m²): {}m²",
            Area(capped_area)
        ));
        process.push(format!(
            "控除額計算 B: {unit_price} × {} × 3% = {}",
            Area(capped_area),
            Jpy(reduction_b)
        ));
        process.push(format!(
            "適用控除額 (45,000円と比較し大きい方): {}",
            Jpy(reduction)
        ));
    } else if input.is_residential {
        process.push(
            "※土地面積と建物床面積を入力すると、税額軽減（最大45,000円等）が計算されます"
                .to_owned(),
        );
    }

    let tax = (nominal - reduction).max(0);
    if reduction > 0 {
        process.push(format!(
            "納付税額: {} - {} = {}",
            Jpy(nominal),
            Jpy(reduction),
            Jpy(tax)
        ));
    }
    tax
}

fn building_acquisition(input: &TaxInput, process: &mut Vec<String>) -> Yen {
    if input.transaction == TransactionType::Inheritance {
        process.push(INHERITANCE_EXEMPT.to_owned());
        return 0;
    }

    let valuation = input.building_valuation;
    let deduction = input.acquisition_deduction;
    let base = (valuation - deduction).max(0);
    let rate = if input.is_residential {
        Rate::new(300, "住宅用")
    } else {
        Rate::new(400, "非住宅")
    };
    let tax = floor_yen(Number::from(base) * rate.rate);

    process.push(format!("評価額: {}", Jpy(valuation)));
    if deduction > 0 {
        process.push(format!(
            "課税標準額: {} - {}(控除) = {}",
            Jpy(valuation),
            Jpy(deduction),
            Jpy(base)
        ));
    } else {
        process.push(format!("課税標準額: {}", Jpy(base)));
    }
    process.push(format!(
        "税額: {} × {}% ({}) = {}",
        Jpy(base),
        Percent(rate.rate, 0),
        rate.note,
        Jpy(tax)
    ));
    tax
}

// 租税特別措置法 第72条 for purchases, 登録免許税法 別表第一 otherwise
fn land_registration_rate(transaction: TransactionType) -> Rate {
    match transaction {
        TransactionType::Purchase => Rate::new(150, "売買の特例税率"),
        TransactionType::Inheritance => Rate::new(40, "相続"),
        TransactionType::Gift => Rate::new(200, "贈与"),
        TransactionType::NewBuild => Rate::new(40, "所有権移転(仮)"),
    }
}

// 租税特別措置法 第72条の2 (保存) and 第73条 (移転) for certified housing
fn building_registration_rate(input: &TaxInput) -> Rate {
    let certified = input.is_residential && input.has_housing_certificate;
    match input.transaction {
        TransactionType::Purchase if certified => Rate::new(30, "住宅用家屋証明あり"),
        TransactionType::Purchase => Rate::new(200, "本則"),
        TransactionType::NewBuild if certified => Rate::new(15, "住宅用家屋証明あり"),
        TransactionType::NewBuild => Rate::new(40, "本則(保存)"),
        TransactionType::Inheritance => Rate::new(40, "相続"),
        TransactionType::Gift => Rate::new(200, "贈与"),
    }
}

// 国税通則法 第118条 / 第119条: base truncated to ¥1,000, tax to ¥100
fn registration(valuation: Yen, rate: Rate, process: &mut Vec<String>) -> Yen {
    let base = truncate_to(valuation, 1_000);
    let raw = floor_yen(Number::from(base) * rate.rate);
    let tax = truncate_to(raw, 100).max(MINIMUM_REGISTRATION_TAX);

    process.push(format!("課税標準額: {}", Jpy(base)));
    process.push(format!(
        "税額: {} × {}% ({}) = {} → {}",
        Jpy(base),
        Percent(rate.rate, 2),
        rate.note,
        Jpy(raw),
        Jpy(tax)
    ));
    tax
}
