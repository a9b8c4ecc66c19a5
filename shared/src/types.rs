//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a stored or submitted enumeration value is unknown
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// What a vendor supplies to the factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VendorType {
    RawLeather,
    Chemical,
    Service,
    #[default]
    Other,
}

impl VendorType {
    pub const ALL: [VendorType; 4] = [
        VendorType::RawLeather,
        VendorType::Chemical,
        VendorType::Service,
        VendorType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VendorType::RawLeather => "raw_leather",
            VendorType::Chemical => "chemical",
            VendorType::Service => "service",
            VendorType::Other => "other",
        }
    }
}

impl FromStr for VendorType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "vendor type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for VendorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorType::RawLeather => write!(f, "Raw Leather"),
            VendorType::Chemical => write!(f, "Chemical"),
            VendorType::Service => write!(f, "Service"),
            VendorType::Other => write!(f, "Other"),
        }
    }
}

/// Unit a chemical is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChemicalUnit {
    #[default]
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "L")]
    Litre,
    #[serde(rename = "mL")]
    Millilitre,
    #[serde(rename = "pcs")]
    Pieces,
}

impl ChemicalUnit {
    pub const ALL: [ChemicalUnit; 5] = [
        ChemicalUnit::Kilogram,
        ChemicalUnit::Gram,
        ChemicalUnit::Litre,
        ChemicalUnit::Millilitre,
        ChemicalUnit::Pieces,
    ];

    /// Symbol as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            ChemicalUnit::Kilogram => "kg",
            ChemicalUnit::Gram => "g",
            ChemicalUnit::Litre => "L",
            ChemicalUnit::Millilitre => "mL",
            ChemicalUnit::Pieces => "pcs",
        }
    }
}

impl FromStr for ChemicalUnit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "chemical unit",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ChemicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_type_round_trips_through_storage_string() {
        for t in VendorType::ALL {
            assert_eq!(t.as_str().parse::<VendorType>(), Ok(t));
        }
    }

    #[test]
    fn test_vendor_type_rejects_unknown() {
        let err = "tannery".parse::<VendorType>().unwrap_err();
        assert_eq!(err.kind, "vendor type");
        assert_eq!(err.to_string(), "unknown vendor type 'tannery'");
    }

    #[test]
    fn test_chemical_unit_symbols_are_case_sensitive() {
        assert_eq!("mL".parse::<ChemicalUnit>(), Ok(ChemicalUnit::Millilitre));
        assert_eq!("L".parse::<ChemicalUnit>(), Ok(ChemicalUnit::Litre));
        assert!("ml".parse::<ChemicalUnit>().is_err());
        assert!("KG".parse::<ChemicalUnit>().is_err());
    }

    #[test]
    fn test_chemical_unit_serde_uses_symbols() {
        let json = serde_json::to_string(&ChemicalUnit::Millilitre).unwrap();
        assert_eq!(json, "\"mL\"");
        let unit: ChemicalUnit = serde_json::from_str("\"pcs\"").unwrap();
        assert_eq!(unit, ChemicalUnit::Pieces);
    }

    #[test]
    fn test_vendor_type_serde_is_snake_case() {
        let json = serde_json::to_string(&VendorType::RawLeather).unwrap();
        assert_eq!(json, "\"raw_leather\"");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(VendorType::default(), VendorType::Other);
        assert_eq!(ChemicalUnit::default(), ChemicalUnit::Kilogram);
    }
}
