use std::fmt;

use chrono::Datelike;

use crate::calculator::{AcquisitionOutcome, Evaluation};
use crate::deduction::Deduction;
use crate::formatting::{Jpy, Wareki};
use crate::{Date, TaxResult, TransactionType, Yen};

pub const WIDTH: usize = 70;

pub struct ReportTitle<'a> {
    pub title: &'a str,
    pub transaction: TransactionType,
}
impl fmt::Display for ReportTitle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.title, self.transaction)?;
        writeln!(f, "{:-<WIDTH$}", "")
    }
}

/// Construction date and deduction, when there is a building.
pub struct ReportBuilding<'a> {
    pub built: Option<Date>,
    pub deduction: Option<&'a Deduction>,
}
impl fmt::Display for ReportBuilding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(built) = self.built {
            writeln!(f, "建築年月日: {built} ({})", Wareki(built.year()))?;
        }
        if let Some(deduction) = self.deduction {
            writeln!(f, "控除額: {deduction}")?;
        }
        Ok(())
    }
}

pub struct ReportAmounts<'a>(pub &'a [(&'a str, Yen)]);
impl fmt::Display for ReportAmounts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, amount) in self.0 {
            writeln!(f, "{label}: {}", Jpy(*amount))?;
        }
        Ok(())
    }
}

/// One "show calculation" section. Empty sections are not printed.
pub struct ReportSteps<'a> {
    pub title: &'a str,
    pub steps: &'a [String],
}
impl fmt::Display for ReportSteps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return Ok(());
        }
        writeln!(f, "{:-<WIDTH$}", "")?;
        writeln!(f, "{}", self.title)?;
        for step in self.steps {
            if step.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, "  {step}")?;
            }
        }
        Ok(())
    }
}

pub struct ReportEvaluation<'a> {
    pub evaluation: &'a Evaluation,
}
impl fmt::Display for ReportEvaluation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let evaluation = self.evaluation;
        let result = &evaluation.result;

        let title = ReportTitle {
            title: &evaluation.name,
            transaction: evaluation.transaction,
        };
        let building = ReportBuilding {
            built: evaluation.built,
            deduction: evaluation.deduction.as_ref(),
        };
        write!(f, "{title}{building}")?;

        let amounts = [
            ("土地 不動産取得税", result.land_acq),
            ("土地 登録免許税", result.land_reg),
            ("建物 不動産取得税", result.bldg_acq),
            ("建物 登録免許税", result.bldg_reg),
            ("不動産取得税 合計", result.total_acq),
            ("登録免許税 合計", result.total_reg),
            ("合計", result.total),
        ];
        write!(f, "{}", ReportAmounts(&amounts))?;

        let process = &result.process;
        for (title, steps) in [
            ("土地 — 不動産取得税", &process.land_acq),
            ("土地 — 登録免許税", &process.land_reg),
            ("建物 — 不動産取得税", &process.bldg_acq),
            ("建物 — 登録免許税", &process.bldg_reg),
        ] {
            write!(f, "{}", ReportSteps { title, steps })?;
        }
        Ok(())
    }
}

pub struct ReportAcquisition<'a> {
    pub outcome: &'a AcquisitionOutcome,
}
impl fmt::Display for ReportAcquisition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.outcome;
        let acquisition = &outcome.result;
        let result = &acquisition.result;

        let title = ReportTitle {
            title: "不動産取得税",
            transaction: outcome.transaction,
        };
        let building = ReportBuilding {
            built: outcome.built,
            deduction: outcome.deduction.as_ref(),
        };
        let amounts = [
            ("宅地", acquisition.res_land_acq),
            ("その他の土地", acquisition.other_land_acq),
            ("建物", result.bldg_acq),
            ("合計", result.total_acq),
        ];
        write!(f, "{title}{building}{}", ReportAmounts(&amounts))?;

        let land = ReportSteps {
            title: "土地 — 不動産取得税",
            steps: &result.process.land_acq,
        };
        let building = ReportSteps {
            title: "建物 — 不動産取得税",
            steps: &result.process.bldg_acq,
        };
        write!(f, "{land}{building}")
    }
}

pub struct ReportRegistration<'a> {
    pub transaction: TransactionType,
    pub result: &'a TaxResult,
}
impl fmt::Display for ReportRegistration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        let title = ReportTitle {
            title: "登録免許税",
            transaction: self.transaction,
        };
        let amounts = [
            ("土地", result.land_reg),
            ("建物", result.bldg_reg),
            ("合計", result.total_reg),
        ];
        write!(f, "{title}{}", ReportAmounts(&amounts))?;

        let land = ReportSteps {
            title: "土地 — 登録免許税",
            steps: &result.process.land_reg,
        };
        let building = ReportSteps {
            title: "建物 — 登録免許税",
            steps: &result.process.bldg_reg,
        };
        write!(f, "{land}{building}")
    }
}
