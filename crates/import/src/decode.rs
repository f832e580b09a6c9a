//! Scalar decoders: raw cell values to dates, amounts, and text.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sheetwise_core::SheetDate;

use crate::grid::CellValue;

/// Day zero of spreadsheet date serials (1899-12-30, which absorbs the 1900
/// leap-year bug).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
/// 9999-12-31.
const MAX_SERIAL: f64 = 2_958_465.0;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%a, %d %b %Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%d-%b-%y",
    "%d %b %y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

fn re_amount_noise() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[\p{Sc}\s,\u{00A0}]").expect("invalid regex"))
}

/// Convert a day serial into a calendar date. The fractional (time) part is
/// ignored; serials outside the spreadsheet range yield `None`.
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 || serial > MAX_SERIAL {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Parse free text as a calendar date, trying common layouts. Month-first is
/// tried before day-first, so `03/04/2024` is March 4th.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            // %Y happily reads "24" as year 24.
            if fmt.contains("%y") || date.year() >= 1000 {
                return Some(date);
            }
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .map(|dt| dt.date_naive())
        .ok()
}

/// Decode a date cell. Blank cells yield `None`; anything else yields either a
/// calendar date or the original text, unchanged.
pub fn decode_date(cell: &CellValue) -> Option<SheetDate> {
    match cell {
        CellValue::Number(n) => Some(match date_from_serial(*n) {
            Some(date) => SheetDate::Calendar(date),
            None => SheetDate::Unparsed(number_text(*n)),
        }),
        CellValue::Text(s) if !s.trim().is_empty() => {
            Some(match parse_date_text(s).or_else(|| serial_from_text(s)) {
                Some(date) => SheetDate::Calendar(date),
                None => SheetDate::Unparsed(s.clone()),
            })
        }
        CellValue::Bool(b) => Some(SheetDate::Unparsed(b.to_string())),
        _ => None,
    }
}

/// A serial that arrived as text, as every CSV cell does. Only bare digits
/// qualify.
fn serial_from_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    date_from_serial(s.parse::<u32>().ok()?.into())
}

/// Parse a currency-formatted string into a signed decimal.
///
/// Currency symbols, thousands separators and whitespace are dropped.
/// `(1,234.50)` is negative, as in accounting exports.
pub fn parse_amount_text(raw: &str) -> Option<Decimal> {
    let cleaned = re_amount_noise().replace_all(raw, "");
    let s = cleaned.as_ref();

    let (negative, s) = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };
    let s = s.strip_prefix('+').unwrap_or(s);
    if s.is_empty() {
        return None;
    }

    let value = Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()?;
    Some(if negative { -value.abs() } else { value })
}

/// Decode an amount cell into a signed decimal. `None` means the cell held
/// something that is not a number.
pub fn decode_amount(cell: &CellValue) -> Option<Decimal> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Decimal::from_f64(*n),
        CellValue::Text(s) => parse_amount_text(s),
        _ => None,
    }
}

/// Coerce a cell to trimmed text. Blank cells yield `None`.
pub fn decode_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Empty => None,
        CellValue::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        CellValue::Number(n) => Some(number_text(*n)),
        CellValue::Bool(b) => Some(b.to_string()),
    }
}

fn number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
