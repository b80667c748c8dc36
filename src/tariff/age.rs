//! Insurance age at a valuation date

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Rounding convention for the insurance age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeMethod {
    /// Difference of calendar years
    CalendarYear,
    /// Age at the nearest birthday: a started half year counts as a full year
    HalfYear,
}

impl AgeMethod {
    /// "K" selects the calendar-year method, any other code half-year
    pub fn from_code(code: &str) -> Self {
        if code.trim() == "K" {
            AgeMethod::CalendarYear
        } else {
            AgeMethod::HalfYear
        }
    }
}

/// Insurance age of a person born on `birth` at `valuation`
pub fn attained_age(birth: NaiveDate, valuation: NaiveDate, method: AgeMethod) -> i32 {
    let years = valuation.year() - birth.year();
    match method {
        AgeMethod::CalendarYear => years,
        AgeMethod::HalfYear => {
            let months = valuation.month() as i32 - birth.month() as i32;
            // years + (months + 5) / 12, truncated toward zero
            (12 * years + months + 5) / 12
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_year_method() {
        let method = AgeMethod::from_code("K");
        assert_eq!(method, AgeMethod::CalendarYear);
        assert_eq!(attained_age(date(1985, 11, 30), date(2025, 1, 1), method), 40);
        assert_eq!(attained_age(date(1985, 1, 1), date(2025, 12, 31), method), 40);
    }

    #[test]
    fn test_half_year_method() {
        let method = AgeMethod::from_code("H");
        assert_eq!(method, AgeMethod::HalfYear);

        // Within six months after the birthday: not yet rounded up
        assert_eq!(attained_age(date(1985, 1, 15), date(2025, 7, 1), method), 40);
        // Seven months after the birthday month rounds up
        assert_eq!(attained_age(date(1985, 1, 15), date(2025, 8, 1), method), 41);
        // Birthday month still ahead in the year
        assert_eq!(attained_age(date(1985, 12, 1), date(2025, 7, 1), method), 40);
        assert_eq!(attained_age(date(1985, 12, 1), date(2025, 6, 1), method), 39);
    }
}
