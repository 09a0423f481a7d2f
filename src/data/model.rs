use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::SampleError;

/// Size-tag sentinel meaning "pick the biggest matching file on disk".
pub const LARGEST_AVAILABLE: &str = "largest_available";

// ---------------------------------------------------------------------------
// Datatype – which kind of fixture a file holds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    Contracts,
    Eoa,
    Transactions,
    Slots,
}

impl Datatype {
    pub const ALL: [Datatype; 4] = [
        Datatype::Contracts,
        Datatype::Eoa,
        Datatype::Transactions,
        Datatype::Slots,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Datatype::Contracts => "contracts",
            Datatype::Eoa => "eoa",
            Datatype::Transactions => "transactions",
            Datatype::Slots => "slots",
        }
    }

    /// Columns read for this datatype, in output order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Datatype::Contracts => &["contract_address"],
            Datatype::Eoa => &["eoas"],
            Datatype::Transactions => &["transaction_hash"],
            Datatype::Slots => &["contract_address", "slot"],
        }
    }
}

impl FromStr for Datatype {
    type Err = SampleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Datatype::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| SampleError::UnknownDatatype(s.to_string()))
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SizeSpec – which size-tag of a sample file to use
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SizeSpec {
    /// The file with the greatest byte size among all size-tags.
    #[default]
    LargestAvailable,
    /// A concrete size-tag such as `1k` or `100k`.
    Exact(String),
}

impl SizeSpec {
    pub fn as_str(&self) -> &str {
        match self {
            SizeSpec::LargestAvailable => LARGEST_AVAILABLE,
            SizeSpec::Exact(tag) => tag,
        }
    }
}

impl FromStr for SizeSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(Some(s)))
    }
}

impl From<Option<&str>> for SizeSpec {
    fn from(size: Option<&str>) -> Self {
        match size {
            None | Some(LARGEST_AVAILABLE) => SizeSpec::LargestAvailable,
            Some(tag) => SizeSpec::Exact(tag.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// SampleValue – a single output cell
// ---------------------------------------------------------------------------

/// One cell of a loaded sample. Binary columns arrive here as `String`
/// (`0x…`) unless hex conversion was turned off.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Binary(Vec<u8>),
    Null,
}

impl SampleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SampleValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::String(s) => write!(f, "{s}"),
            SampleValue::Integer(i) => write!(f, "{i}"),
            SampleValue::Float(v) => write!(f, "{v}"),
            SampleValue::Bool(b) => write!(f, "{b}"),
            SampleValue::Binary(bytes) => write!(f, "{bytes:?}"),
            SampleValue::Null => write!(f, "<null>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Samples – the shaped result of a sized load
// ---------------------------------------------------------------------------

/// Single-column datatypes come back flat, multi-column ones as row tuples
/// with fields in [`Datatype::columns`] order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Samples {
    Flat(Vec<SampleValue>),
    Rows(Vec<Vec<SampleValue>>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Flat(values) => values.len(),
            Samples::Rows(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_flat(self) -> Option<Vec<SampleValue>> {
        match self {
            Samples::Flat(values) => Some(values),
            Samples::Rows(_) => None,
        }
    }

    pub fn into_rows(self) -> Option<Vec<Vec<SampleValue>>> {
        match self {
            Samples::Rows(rows) => Some(rows),
            Samples::Flat(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datatype_round_trips_through_its_name() {
        for datatype in Datatype::ALL {
            assert_eq!(datatype.as_str().parse::<Datatype>().unwrap(), datatype);
        }
    }

    #[test]
    fn unknown_datatype_is_a_lookup_error() {
        let err = "unknown_type".parse::<Datatype>().unwrap_err();
        assert!(matches!(err, SampleError::UnknownDatatype(name) if name == "unknown_type"));
    }

    #[test]
    fn slots_read_two_columns_in_order() {
        assert_eq!(Datatype::Slots.columns(), &["contract_address", "slot"]);
        assert_eq!(Datatype::Eoa.columns(), &["eoas"]);
    }

    #[test]
    fn size_sentinel_maps_to_largest() {
        assert_eq!(SizeSpec::from(None), SizeSpec::LargestAvailable);
        assert_eq!(
            "largest_available".parse::<SizeSpec>().unwrap(),
            SizeSpec::LargestAvailable
        );
        assert_eq!(
            "1k".parse::<SizeSpec>().unwrap(),
            SizeSpec::Exact("1k".to_string())
        );
    }

    #[test]
    fn samples_serialize_untagged() {
        let rows = Samples::Rows(vec![vec![
            SampleValue::String("0xab".into()),
            SampleValue::Integer(7),
        ]]);
        assert_eq!(serde_json::to_string(&rows).unwrap(), r#"[["0xab",7]]"#);
    }
}
