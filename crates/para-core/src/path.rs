//! Fully-qualified datapoint element names (`[System:]Datapoint.element.path`)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParaError, ParaResult};

/// A parsed datapoint element name
///
/// The element part is dotted and relative to the type's root element. An
/// empty element part addresses the root itself, written `Datapoint.`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpePath {
    /// System name prefix, without the colon
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub datapoint: String,
    pub element: String,
}

impl DpePath {
    pub fn new(datapoint: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            system: None,
            datapoint: datapoint.into(),
            element: element.into(),
        }
    }

    /// Parse `[System:]Datapoint[.element.path]`
    pub fn parse(input: &str) -> ParaResult<Self> {
        let input = input.trim();
        let (system, rest) = match input.split_once(':') {
            Some((sys, rest)) => (Some(sys.to_string()), rest),
            None => (None, input),
        };

        let (datapoint, element) = match rest.split_once('.') {
            Some((dp, el)) => (dp, el.trim_end_matches('.')),
            None => (rest, ""),
        };

        if datapoint.is_empty() {
            return Err(ParaError::InvalidPath(input.to_string()));
        }
        if !element.is_empty() && element.split('.').any(str::is_empty) {
            return Err(ParaError::InvalidPath(input.to_string()));
        }
        if system.as_deref() == Some("") {
            return Err(ParaError::InvalidPath(input.to_string()));
        }

        Ok(Self {
            system,
            datapoint: datapoint.to_string(),
            element: element.to_string(),
        })
    }

    /// True when the path addresses the type's root element
    pub fn is_root(&self) -> bool {
        self.element.is_empty()
    }
}

impl FromStr for DpePath {
    type Err = ParaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DpePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(system) = &self.system {
            write!(f, "{}:", system)?;
        }
        write!(f, "{}.{}", self.datapoint, self.element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let p = DpePath::parse("Pump1.state.speed").unwrap();
        assert_eq!(p.datapoint, "Pump1");
        assert_eq!(p.element, "state.speed");
        assert_eq!(p.system, None);
        assert_eq!(p.to_string(), "Pump1.state.speed");
    }

    #[test]
    fn test_parse_root_forms() {
        for input in ["ExampleDP_Float", "ExampleDP_Float."] {
            let p = DpePath::parse(input).unwrap();
            assert!(p.is_root());
            assert_eq!(p.to_string(), "ExampleDP_Float.");
        }
    }

    #[test]
    fn test_parse_system_prefix() {
        let p: DpePath = "System1:Pump1.cmd".parse().unwrap();
        assert_eq!(p.system.as_deref(), Some("System1"));
        assert_eq!(p.to_string(), "System1:Pump1.cmd");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(DpePath::parse("").is_err());
        assert!(DpePath::parse(".state").is_err());
        assert!(DpePath::parse("Pump1.state..speed").is_err());
        assert!(DpePath::parse(":Pump1").is_err());
    }
}
