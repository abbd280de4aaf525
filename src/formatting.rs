use std::fmt;

use fixed_decimal::FixedDecimal;
use icu_decimal::FixedDecimalFormatter;
use icu_locid::{locale, Locale};
use once_cell::sync::Lazy;
use writeable::Writeable;

use crate::{Number, Yen};

const LOCALE: Locale = locale!("ja-JP");

static DECIMAL_FORMATTER: Lazy<FixedDecimalFormatter> = Lazy::new(|| {
    FixedDecimalFormatter::try_new(&LOCALE.into(), Default::default())
        .expect("decimal symbols for ja-JP are compiled in")
});

/// An amount as the office writes it: `￥1,234,567`.
pub struct Jpy(pub Yen);
impl fmt::Display for Jpy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            f.write_str("-")?;
        }
        f.write_str("￥")?;
        DECIMAL_FORMATTER
            .format(&FixedDecimal::from(self.0.unsigned_abs()))
            .write_to(f)
    }
}

/// An integer with digit grouping: `33,333`.
pub struct Grouped(pub i64);
impl fmt::Display for Grouped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DECIMAL_FORMATTER
            .format(&FixedDecimal::from(self.0))
            .write_to(f)
    }
}

/// A rate as percent with a fixed number of decimals, `0.015` → `1.50`.
pub struct Percent(pub Number, pub u32);
impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = self.1 as i16;
        let factor = 10_i64.pow(self.1);
        let number = (self.0 * 100 * factor).round().to_integer();

        let num = FixedDecimal::from(number)
            .multiplied_pow10(-places)
            .padded_start(0)
            .padded_end(-places);
        write!(f, "{num}")
    }
}

/// An area in m², without grouping and without trailing zeros.
pub struct Area(pub Number);
impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const MAX_PLACES: u32 = 6;

        let mut scaled = self.0;
        let mut places = 0;
        while !scaled.is_integer() && places < MAX_PLACES {
            scaled = scaled * 10;
            places += 1;
        }
        let number = scaled.round().to_integer();

        let num = FixedDecimal::from(number)
            .multiplied_pow10(-(places as i16))
            .padded_start(0)
            .trimmed_end();
        write!(f, "{num}")
    }
}

/// The year in the Japanese era calendar, `1990` → `平成2年`.
pub struct Wareki(pub i32);
impl fmt::Display for Wareki {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year = self.0;
        match year {
            2019.. => write!(f, "令和{}年", year - 2018),
            1989.. => write!(f, "平成{}年", year - 1988),
            1926.. => write!(f, "昭和{}年", year - 1925),
            1912.. => write!(f, "大正{}年", year - 1911),
            _ => write!(f, "明治{}年", year - 1867),
        }
    }
}
