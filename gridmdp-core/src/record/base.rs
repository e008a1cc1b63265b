//! Base implementation of records.
use crate::error::MdpError;
use std::{
    collections::{
        hash_map::{Iter, Keys},
        HashMap,
    },
    convert::Into,
};

/// Key of the iteration index in snapshot records.
pub const ITERATION: &str = "iteration";

/// Key of the value function in snapshot records.
pub const VALUES: &str = "values";

/// Key of the policy in snapshot records.
pub const POLICY: &str = "policy";

/// Key of the change of the value function in the last iteration.
pub const DELTA: &str = "delta";

/// Key of the solver phase, used by policy iteration.
pub const PHASE: &str = "phase";

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value.
    Scalar(f64),

    /// A 1-dimensional array of floating-point values, e.g., a value function.
    Array1(Vec<f64>),

    /// A 2-dimensional array with shape information, e.g., a Q-table.
    Array2(Vec<f64>, [usize; 2]),

    /// A sequence of indices, e.g., the action of each state.
    Indices(Vec<usize>),

    /// A text value.
    String(String),
}

/// A container for storing key-value pairs of various data types.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f64) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Creates a snapshot of a solver at the given iteration.
    ///
    /// The policy is optional; leave it out when only the values were updated.
    pub fn snapshot(iteration: usize, values: &[f64], policy: Option<&[usize]>) -> Self {
        let mut record = Self::from_slice(&[
            (ITERATION, RecordValue::Scalar(iteration as f64)),
            (VALUES, RecordValue::Array1(values.to_vec())),
        ]);
        if let Some(policy) = policy {
            record.insert(POLICY, RecordValue::Indices(policy.to_vec()));
        }
        record
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records, consuming both.
    ///
    /// Values of `record` overwrite values of `self` with the same key.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f64, MdpError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(MdpError::RecordValueTypeError("Scalar".to_string())),
            None => Err(MdpError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f64>, MdpError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(MdpError::RecordValueTypeError("Array1".to_string())),
            None => Err(MdpError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 2-dimensional array and its shape from the record.
    pub fn get_array2(&self, k: &str) -> Result<(Vec<f64>, [usize; 2]), MdpError> {
        match self.0.get(k) {
            Some(RecordValue::Array2(v, s)) => Ok((v.clone(), *s)),
            Some(_) => Err(MdpError::RecordValueTypeError("Array2".to_string())),
            None => Err(MdpError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a sequence of indices from the record.
    pub fn get_indices(&self, k: &str) -> Result<Vec<usize>, MdpError> {
        match self.0.get(k) {
            Some(RecordValue::Indices(v)) => Ok(v.clone()),
            Some(_) => Err(MdpError::RecordValueTypeError("Indices".to_string())),
            None => Err(MdpError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, MdpError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(MdpError::RecordValueTypeError("String".to_string())),
            None => Err(MdpError::RecordKeyError(k.to_string())),
        }
    }

    /// The iteration index of a snapshot record.
    pub fn iteration(&self) -> Option<usize> {
        self.get_scalar(ITERATION).ok().map(|v| v as usize)
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_without_policy() {
        let record = Record::snapshot(3, &[1.0, 2.0], None);
        assert_eq!(record.iteration(), Some(3));
        assert_eq!(record.get_array1(VALUES).unwrap(), vec![1.0, 2.0]);
        assert_eq!(
            record.get_indices(POLICY),
            Err(MdpError::RecordKeyError(POLICY.to_string()))
        );
    }

    #[test]
    fn test_value_type_error() {
        let record = Record::snapshot(0, &[0.0], Some(&[2][..]));
        assert_eq!(
            record.get_scalar(POLICY),
            Err(MdpError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(record.get_indices(POLICY).unwrap(), vec![2]);
    }

    #[test]
    fn test_merge_overwrites() {
        let a = Record::from_scalar("x", 1.0);
        let b = Record::from_slice(&[
            ("x", RecordValue::Scalar(2.0)),
            ("y", RecordValue::String("s".to_string())),
        ]);
        let merged = a.merge(b);
        assert_eq!(merged.get_scalar("x").unwrap(), 2.0);
        assert_eq!(merged.get_string("y").unwrap(), "s");
        assert!(!merged.is_empty());
        assert!(Record::empty().is_empty());
    }
}
