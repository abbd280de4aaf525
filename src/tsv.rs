use std::fmt;

use crate::calculator::Evaluation;

pub struct TsvTitle;
impl fmt::Display for TsvTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_title(f)
    }
}

pub struct TsvEvaluation<'a> {
    pub evaluation: &'a Evaluation,
}
impl fmt::Display for TsvEvaluation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tsv(f, self.evaluation)
    }
}

pub fn write_title<W: fmt::Write>(w: &mut W) -> fmt::Result {
    write!(w, "名称\t取引\t控除額\t")?; // 3
    write!(w, "土地 不動産取得税\t土地 登録免許税\t")?; // 2
    write!(w, "建物 不動産取得税\t建物 登録免許税\t")?; // 2
    writeln!(w, "不動産取得税 合計\t登録免許税 合計\t合計") // 3
}

pub fn write_tsv<W: fmt::Write>(w: &mut W, evaluation: &Evaluation) -> fmt::Result {
    let result = &evaluation.result;

    write!(w, "{}\t{}\t", evaluation.name, evaluation.transaction)?;
    if let Some(deduction) = evaluation.deduction {
        write!(w, "{}", deduction.deduction)?;
    }
    w.write_char('\t')?;

    write!(w, "{}\t{}\t", result.land_acq, result.land_reg)?;
    write!(w, "{}\t{}\t", result.bldg_acq, result.bldg_reg)?;
    writeln!(w, "{}\t{}\t{}", result.total_acq, result.total_reg, result.total)
}
