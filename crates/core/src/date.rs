use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date as read from a sheet: either a real calendar date or the original
/// cell text when it could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SheetDate {
    Calendar(NaiveDate),
    Unparsed(String),
}

impl SheetDate {
    pub fn calendar(&self) -> Option<NaiveDate> {
        match self {
            SheetDate::Calendar(d) => Some(*d),
            SheetDate::Unparsed(_) => None,
        }
    }

    pub fn is_calendar(&self) -> bool {
        matches!(self, SheetDate::Calendar(_))
    }
}

impl From<NaiveDate> for SheetDate {
    fn from(date: NaiveDate) -> Self {
        SheetDate::Calendar(date)
    }
}

impl fmt::Display for SheetDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetDate::Calendar(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            SheetDate::Unparsed(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for SheetDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SheetDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
            Ok(d) => SheetDate::Calendar(d),
            Err(_) => SheetDate::Unparsed(s),
        })
    }
}
