// used for joining dates and any other date-like column
use chrono::{DateTime, NaiveDate, NaiveDateTime};

// used to print out readable forms of a value
use std::fmt;
// used to order values when sorting drill-down results
use std::cmp::Ordering;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

/// A single cell of a workforce record.
///
/// Values are dynamically kinded since uploaded sheets rarely agree on column
/// types. A field that is present but blank is `Empty`; a field that is not
/// present at all is represented by the record returning `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%b-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Value {
    /// Text values are trimmed, and blank text becomes `Empty`.
    pub fn text<S: AsRef<str>>(s: S) -> Self {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            Value::Empty
        } else {
            Value::Text(trimmed.to_string())
        }
    }
    pub fn number(n: f64) -> Self {
        if n.is_nan() { Value::Empty } else { Value::Number(n) }
    }
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// Numeric coercion. Values that do not parse are `None` and must be left
    /// out of any numeric aggregate rather than counted as zero.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Text(s) => {
                let s = s.trim();
                let s = s.strip_suffix('%').unwrap_or(s).trim_end();
                s.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// Date coercion, same exclusion rule as [`Value::as_number`].
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// The label this value is counted under in a breakdown, and the string an
    /// exact-match drill-down compares the clicked value against.
    pub fn key(&self) -> Option<String> {
        match self {
            Value::Empty => None,
            other => Some(other.to_string()),
        }
    }

    /// Sort key under the same coercion rules the aggregates use, so text
    /// holding `"61"` orders as the number 61.
    pub fn sort_key(&self) -> SortKey<'_> {
        match self {
            Value::Number(n) => SortKey::Number(*n),
            Value::Date(d) => SortKey::Date(*d),
            Value::Text(s) => match (self.as_number(), parse_date(s)) {
                (Some(n), _) => SortKey::Number(n),
                (None, Some(d)) => SortKey::Date(d),
                (None, None) => SortKey::Text(s),
            },
            Value::Empty => SortKey::Empty,
        }
    }

    /// Total order used for sorting: numbers, then dates, then text, with
    /// empties last.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// A value as it ranks in a sort. See [`Value::sort_key`].
#[derive(Debug, Clone, Copy)]
pub enum SortKey<'a> {
    Number(f64),
    Date(NaiveDate),
    Text(&'a str),
    Empty,
}

impl SortKey<'_> {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Date(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Empty => 3,
        }
    }
    pub fn is_empty(&self) -> bool {
        matches!(self, SortKey::Empty)
    }
}

impl Ord for SortKey<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for SortKey<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey<'_> {}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Empty => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::text(s) }
}
impl From<String> for Value {
    fn from(s: String) -> Self { Value::text(s) }
}
impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::number(n) }
}
impl From<i64> for Value {
    fn from(n: i64) -> Self { Value::Number(n as f64) }
}
impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self { Value::Date(d) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self { v.map(Into::into).unwrap_or(Value::Empty) }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(s) => serializer.serialize_str(s),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    serializer.serialize_i64(*n as i64)
                } else {
                    serializer.serialize_f64(*n)
                }
            }
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Value::Empty => serializer.serialize_none(),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;
    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a string, number, boolean or null")
    }
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::text(v))
    }
    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::text(v))
    }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::number(v))
    }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }
    // spreadsheets hand booleans over as Yes/No style flags
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Text(if v { "Yes" } else { "No" }.to_string()))
    }
    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Empty)
    }
    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Empty)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_empty() {
        assert_eq!(Value::text("   "), Value::Empty);
        assert_eq!(Value::text(" Bench "), Value::Text("Bench".into()));
    }

    #[test]
    fn numeric_coercion_excludes_garbage() {
        assert_eq!(Value::text("42").as_number(), Some(42.0));
        assert_eq!(Value::text("75%").as_number(), Some(75.0));
        assert_eq!(Value::text("n/a").as_number(), None);
        assert_eq!(Value::Empty.as_number(), None);
        assert_eq!(Value::Number(f64::INFINITY).as_number(), None);
    }

    #[test]
    fn date_coercion_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 4, 9);
        assert_eq!(Value::text("2023-04-09").as_date(), expected);
        assert_eq!(Value::text("09/04/2023").as_date(), expected);
        assert_eq!(Value::text("09-Apr-2023").as_date(), expected);
        assert_eq!(Value::text("2023-04-09 13:45:00").as_date(), expected);
        assert_eq!(Value::text("sometime").as_date(), None);
    }

    #[test]
    fn integral_numbers_key_without_fraction() {
        assert_eq!(Value::Number(5.0).key().as_deref(), Some("5"));
        assert_eq!(Value::Number(5.5).key().as_deref(), Some("5.5"));
        assert_eq!(Value::Empty.key(), None);
    }

    #[test]
    fn empties_sort_last() {
        let mut values = vec![Value::Empty, Value::text("b"), Value::Number(3.0), Value::text("a")];
        values.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(values, vec![Value::Number(3.0), Value::text("a"), Value::text("b"), Value::Empty]);
    }

    #[test]
    fn numeric_text_sorts_as_numbers() {
        let mut values = vec![Value::text("9"), Value::text("100"), Value::Number(50.0), Value::text("61")];
        values.sort_by(|a, b| a.sort_cmp(b));
        assert_eq!(
            values,
            vec![Value::text("9"), Value::Number(50.0), Value::text("61"), Value::text("100")]
        );
        assert_eq!(Value::text("2023-04-09").sort_cmp(&Value::Date(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap())), Ordering::Less);
        assert_eq!(Value::text("10abc").sort_cmp(&Value::Number(9.5)), Ordering::Greater);
    }
}
