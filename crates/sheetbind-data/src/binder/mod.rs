//! Typed record binding.
//!
//! A record type lists which of its fields are filled from which row key in
//! a static table of [`FieldBinding`]s. [`RecordBinder::bind`] walks a row
//! source lazily, skipping its first (header) row, and yields one record per
//! remaining row.
//!
//! ```
//! use sheetbind_data::binder::{FieldBinding, FromRow, RecordBinder};
//! use sheetbind_data::{field_bindings, CellValue};
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Default)]
//! struct Person {
//!     name: String,
//!     age: Option<u32>,
//! }
//!
//! impl FromRow for Person {
//!     fn bindings() -> Vec<FieldBinding<Self>> {
//!         field_bindings!(Person { name => "A", age => "B" })
//!     }
//! }
//!
//! let rows = vec![
//!     Ok(HashMap::from([("A".to_string(), CellValue::from("Name"))])),
//!     Ok(HashMap::from([
//!         ("A".to_string(), CellValue::from("Alice")),
//!         ("B".to_string(), CellValue::from(30.0)),
//!     ])),
//! ];
//!
//! let people: Vec<Person> = RecordBinder::bind(rows)
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(people[0].name, "Alice");
//! assert_eq!(people[0].age, Some(30));
//! ```

mod coerce;

pub use coerce::{Coerce, CoercionError};

use std::fmt;
use std::marker::PhantomData;

use sheetbind_model::CellValue;
use tracing::debug;

use crate::error::{DataError, Result};
use crate::sources::RowMap;

/// Converts a cell value and stores it in one field of a record
pub type Assign<T> = fn(&mut T, &CellValue) -> std::result::Result<(), CoercionError>;

/// One field-to-column entry of a record's binding table
pub struct FieldBinding<T> {
    /// Record field name
    pub field: &'static str,
    /// Row key the field reads from
    pub column: &'static str,
    /// Coerce and store
    pub assign: Assign<T>,
}

impl<T> FieldBinding<T> {
    /// Create a binding
    pub fn new(field: &'static str, column: &'static str, assign: Assign<T>) -> Self {
        Self {
            field,
            column,
            assign,
        }
    }
}

impl<T> Clone for FieldBinding<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FieldBinding<T> {}

impl<T> fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("column", &self.column)
            .finish()
    }
}

/// A record type that can be built from a row
///
/// Fields not listed in [`FromRow::bindings`] keep their default value.
pub trait FromRow: Default {
    /// The binding table for this type
    fn bindings() -> Vec<FieldBinding<Self>>;
}

/// Coerce `value` into `slot`
///
/// Used by [`field_bindings!`](crate::field_bindings) so each binding is a
/// plain function pointer.
pub fn assign_field<V: Coerce>(
    slot: &mut V,
    value: &CellValue,
) -> std::result::Result<(), CoercionError> {
    *slot = V::coerce(value)?;
    Ok(())
}

/// Build a `Vec<FieldBinding<T>>` from `field => "column"` pairs
///
/// ```ignore
/// field_bindings!(Person { name => "A", age => "B" })
/// ```
#[macro_export]
macro_rules! field_bindings {
    ($ty:ty { $($field:ident => $column:expr),* $(,)? }) => {
        vec![
            $(
                $crate::binder::FieldBinding::<$ty>::new(
                    stringify!($field),
                    $column,
                    |record: &mut $ty, value: &$crate::CellValue| {
                        $crate::binder::assign_field(&mut record.$field, value)
                    },
                )
            ),*
        ]
    };
}

/// Binds rows to typed records
pub struct RecordBinder;

impl RecordBinder {
    /// Bind a row source to records of type `T`
    ///
    /// The first row is skipped unconditionally. Nothing is read until the
    /// returned iterator is advanced.
    pub fn bind<T, I>(rows: I) -> Records<T, I::IntoIter>
    where
        T: FromRow,
        I: IntoIterator<Item = Result<RowMap>>,
    {
        Records {
            rows: rows.into_iter(),
            bindings: T::bindings(),
            next_index: 0,
            done: false,
            _record: PhantomData,
        }
    }
}

/// Lazy iterator of bound records
///
/// Stops for good after the first error it yields.
pub struct Records<T, I> {
    rows: I,
    bindings: Vec<FieldBinding<T>>,
    next_index: usize,
    done: bool,
    _record: PhantomData<fn() -> T>,
}

impl<T, I> Records<T, I>
where
    T: FromRow,
{
    fn bind_row(&self, index: usize, row: &RowMap) -> Result<T> {
        let mut record = T::default();
        for binding in &self.bindings {
            if let Some(value) = row.get(binding.column) {
                (binding.assign)(&mut record, value).map_err(|source| DataError::TypeCoercion {
                    row: index,
                    field: binding.field,
                    column: binding.column,
                    source,
                })?;
            }
        }
        Ok(record)
    }
}

impl<T, I> Iterator for Records<T, I>
where
    T: FromRow,
    I: Iterator<Item = Result<RowMap>>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            let index = self.next_index;
            let row = match self.rows.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                Some(Ok(row)) => row,
            };
            self.next_index += 1;

            if index == 0 {
                debug!("Skipping header row");
                continue;
            }

            let result = self.bind_row(index, &row);
            if result.is_err() {
                self.done = true;
            }
            return Some(result);
        }
    }
}

impl<T, I> std::iter::FusedIterator for Records<T, I>
where
    T: FromRow,
    I: Iterator<Item = Result<RowMap>>,
{
}
