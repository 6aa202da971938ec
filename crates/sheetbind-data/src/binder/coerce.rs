//! Conversion of canonical cell values into record field types.

use chrono::{NaiveDate, NaiveDateTime};
use sheetbind_model::{format_number, CellValue};
use thiserror::Error;

use crate::normalize::parse_datetime_text;

/// A cell value that cannot be converted to the requested type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot convert {found} value '{value}' to {target}")]
pub struct CoercionError {
    /// Type name of the source value
    pub found: &'static str,
    /// Rendered source value
    pub value: String,
    /// Target type name
    pub target: &'static str,
}

impl CoercionError {
    fn new(value: &CellValue, target: &'static str) -> Self {
        Self {
            found: value.type_name(),
            value: value.to_string(),
            target,
        }
    }
}

/// Types a record field can be bound to
pub trait Coerce: Sized {
    /// Convert a cell value, failing instead of truncating or guessing
    fn coerce(value: &CellValue) -> Result<Self, CoercionError>;
}

impl Coerce for CellValue {
    fn coerce(value: &CellValue) -> Result<Self, CoercionError> {
        Ok(value.clone())
    }
}

impl Coerce for String {
    fn coerce(value: &CellValue) -> Result<Self, CoercionError> {
        Ok(match value {
            CellValue::Absent => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            CellValue::Error(code) => code.to_string(),
        })
    }
}

impl Coerce for f64 {
    fn coerce(value: &CellValue) -> Result<Self, CoercionError> {
        match value {
            CellValue::Number(n) => Ok(*n),
            CellValue::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| CoercionError::new(value, "f64")),
            _ => Err(CoercionError::new(value, "f64")),
        }
    }
}

impl Coerce for f32 {
    fn coerce(value: &CellValue) -> Result<Self, CoercionError> {
        let n = f64::coerce(value).map_err(|_| CoercionError::new(value, "f32"))?;
        if n.is_finite() && n.abs() > f64::from(f32::MAX) {
            return Err(CoercionError::new(value, "f32"));
        }
        Ok(n as f32)
    }
}

/// Whole number behind a value, if it has one exactly
fn integral(value: &CellValue) -> Option<i128> {
    match value {
        CellValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e38 => {
            Some(*n as i128)
        }
        CellValue::Boolean(b) => Some(i128::from(*b)),
        CellValue::Text(s) => {
            let s = s.trim();
            s.parse::<i128>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite() && n.fract() == 0.0 && n.abs() < 1e38)
                    .map(|n| n as i128)
            })
        }
        _ => None,
    }
}

macro_rules! coerce_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Coerce for $ty {
                fn coerce(value: &CellValue) -> Result<Self, CoercionError> {
                    integral(value)
                        .and_then(|n| <$ty>::try_from(n).ok())
                        .ok_or_else(|| CoercionError::new(value, stringify!($ty)))
                }
            }
        )*
    };
}

coerce_integer!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl Coerce for bool {
    fn coerce(value: &CellValue) -> Result<Self, CoercionError> {
        match value {
            CellValue::Boolean(b) => Ok(*b),
            CellValue::Number(n) if !n.is_nan() => Ok(*n != 0.0),
            CellValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(CoercionError::new(value, "bool")),
            },
            _ => Err(CoercionError::new(value, "bool")),
        }
    }
}

impl Coerce for NaiveDateTime {
    fn coerce(value: &CellValue) -> Result<Self, CoercionError> {
        match value {
            CellValue::DateTime(dt) => Ok(*dt),
            CellValue::Text(s) => {
                parse_datetime_text(s).ok_or_else(|| CoercionError::new(value, "datetime"))
            }
            _ => Err(CoercionError::new(value, "datetime")),
        }
    }
}

impl Coerce for NaiveDate {
    fn coerce(value: &CellValue) -> Result<Self, CoercionError> {
        NaiveDateTime::coerce(value)
            .map(|dt| dt.date())
            .map_err(|_| CoercionError::new(value, "date"))
    }
}

impl<T: Coerce> Coerce for Option<T> {
    fn coerce(value: &CellValue) -> Result<Self, CoercionError> {
        if value.is_empty() {
            Ok(None)
        } else {
            T::coerce(value).map(Some)
        }
    }
}
