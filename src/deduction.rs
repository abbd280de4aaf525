use std::fmt;

use chrono::Datelike;
use serde::Serialize;

use crate::formatting::Jpy;
use crate::{Date, TransactionType, Yen};

/// Deduction from the building valuation before acquisition tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deduction {
    pub deduction: Yen,
    pub message: &'static str,
}

struct Threshold {
    /// (year, month, day)
    since: (i32, u32, u32),
    deduction: Yen,
    message: &'static str,
}

// newest first, the first one not after the construction date applies
const THRESHOLDS: [Threshold; 5] = [
    Threshold {
        since: (1997, 4, 1),
        deduction: 12_000_000,
        message: "1997年4月1日以降 (1,200万円控除)",
    },
    Threshold {
        since: (1989, 4, 1),
        deduction: 10_000_000,
        message: "1989年4月1日～ (1,000万円控除)",
    },
    Threshold {
        since: (1985, 7, 1),
        deduction: 4_500_000,
        message: "1985年7月1日～ (450万円控除)",
    },
    Threshold {
        since: (1981, 7, 1),
        deduction: 4_200_000,
        message: "1981年7月1日～ (420万円控除)",
    },
    Threshold {
        since: (1976, 1, 1),
        deduction: 3_500_000,
        message: "1976年1月1日～ (350万円控除)",
    },
];

const NOT_RESIDENTIAL: Deduction = Deduction {
    deduction: 0,
    message: "住宅用ではないため控除なし",
};
const NEW_BUILD: Deduction = Deduction {
    deduction: 12_000_000,
    message: "新築住宅 (原則1,200万円控除)",
};
const NO_DATE: Deduction = Deduction {
    deduction: 0,
    message: "建築年月日を指定すると自動判定します",
};
const BEFORE_1976: Deduction = Deduction {
    deduction: 0,
    message: "1975年以前",
};

/// Looks up the deduction for a building constructed on `built`.
///
/// A missing date is not an error: the result is a zero deduction whose
/// message asks for the date.
pub fn resolve_deduction(
    built: Option<Date>,
    transaction: TransactionType,
    is_residential: bool,
) -> Deduction {
    if !is_residential {
        return NOT_RESIDENTIAL;
    }
    if transaction == TransactionType::NewBuild {
        return NEW_BUILD;
    }
    let Some(built) = built else {
        return NO_DATE;
    };

    let built = (built.year(), built.month(), built.day());
    THRESHOLDS
        .iter()
        .find(|t| built >= t.since)
        .map(|t| Deduction {
            deduction: t.deduction,
            message: t.message,
        })
        .unwrap_or(BEFORE_1976)
}

/// The line shown next to the deduction field.
impl fmt::Display for Deduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.deduction > 0 {
            write!(
                f,
                "建築時期により自動設定: {} ({})",
                Jpy(self.deduction),
                self.message
            )
        } else {
            f.write_str(self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<Date> {
        Date::from_ymd_opt(y, m, d)
    }

    #[test]
    fn precedence() {
        use TransactionType::*;

        // not residential wins over everything else
        let deduction = resolve_deduction(date(2000, 1, 1), NewBuild, false);
        assert_eq!(deduction, NOT_RESIDENTIAL);

        // new builds get the full deduction, with or without a date
        assert_eq!(resolve_deduction(date(2000, 1, 1), NewBuild, true), NEW_BUILD);
        assert_eq!(resolve_deduction(None, NewBuild, true), NEW_BUILD);
        assert_eq!(NEW_BUILD.message, "新築住宅 (原則1,200万円控除)");

        let deduction = resolve_deduction(None, Purchase, true);
        assert_eq!(deduction.deduction, 0);
        assert_eq!(deduction.message, "建築年月日を指定すると自動判定します");
    }

    #[test]
    fn thresholds() {
        let resolve = |d| resolve_deduction(d, TransactionType::Purchase, true);

        let deduction = resolve(date(1990, 6, 1));
        assert_eq!(deduction.deduction, 10_000_000);
        assert_eq!(deduction.message, "1989年4月1日～ (1,000万円控除)");

        assert_eq!(resolve(date(2024, 1, 1)).deduction, 12_000_000);
        assert_eq!(resolve(date(1997, 4, 1)).deduction, 12_000_000);
        assert_eq!(resolve(date(1997, 3, 31)).deduction, 10_000_000);
        assert_eq!(resolve(date(1989, 4, 1)).deduction, 10_000_000);
        assert_eq!(resolve(date(1989, 3, 31)).deduction, 4_500_000);
        assert_eq!(resolve(date(1985, 7, 1)).deduction, 4_500_000);
        assert_eq!(resolve(date(1985, 6, 30)).deduction, 4_200_000);
        assert_eq!(resolve(date(1981, 7, 1)).deduction, 4_200_000);
        assert_eq!(resolve(date(1981, 6, 30)).deduction, 3_500_000);
        assert_eq!(resolve(date(1976, 1, 1)).deduction, 3_500_000);

        let deduction = resolve(date(1975, 12, 31));
        assert_eq!(deduction.deduction, 0);
        assert_eq!(deduction.message, "1975年以前");
    }

    #[test]
    fn gift_and_inheritance_use_the_table() {
        for transaction in [TransactionType::Gift, TransactionType::Inheritance] {
            let deduction = resolve_deduction(date(1982, 1, 1), transaction, true);
            assert_eq!(deduction.deduction, 4_200_000);
            assert_eq!(deduction.message, "1981年7月1日～ (420万円控除)");
        }
    }

    #[test]
    fn notice() {
        let deduction = resolve_deduction(date(1990, 6, 1), TransactionType::Purchase, true);
        assert_eq!(
            deduction.to_string(),
            "建築時期により自動設定: ￥10,000,000 (1989年4月1日～ (1,000万円控除))"
        );
        assert_eq!(NOT_RESIDENTIAL.to_string(), "住宅用ではないため控除なし");
    }
}
