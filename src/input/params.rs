//! Parsing of the legacy `key=value` view parameters.
//!
//! Hosts still carry view parameters as text such as `DraggerFilters=5`.
//! They are parsed once here; everything past this boundary sees
//! [`ViewParam`].

use std::str::FromStr;

use crate::error::ParamError;
use crate::gfx::gizmos::DraggerFilters;

/// Maps modifier keys and mouse buttons to camera manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManipulationMode {
    /// Middle-button drag; plain orbits, shift pans, ctrl rotates in place.
    #[default]
    Cad,
    /// Left-button drag rotates in place; middle-button drag pans.
    User,
    /// Like CAD, but steering also advances the camera and middle-button drag pans.
    Fly,
}

impl TryFrom<i32> for ManipulationMode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Cad),
            2 => Ok(Self::User),
            3 => Ok(Self::Fly),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewParam {
    DraggerFilters(DraggerFilters),
    ManipulationMode(ManipulationMode),
}

impl FromStr for ViewParam {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParamError::Empty);
        }

        let (key, value) = s.split_once('=').unwrap_or((s, ""));
        let (key, value) = (key.trim(), value.trim());
        let invalid = || ParamError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "DraggerFilters" => {
                let bits: u32 = value.parse().map_err(|_| invalid())?;
                Ok(Self::DraggerFilters(DraggerFilters::from_bits(bits)))
            }
            "ManipulationMode" => {
                let raw: i32 = value.parse().map_err(|_| invalid())?;
                let mode = ManipulationMode::try_from(raw).map_err(|_| invalid())?;
                Ok(Self::ManipulationMode(mode))
            }
            other => Err(ParamError::UnknownKey(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manipulation_mode() {
        assert_eq!(
            "ManipulationMode=2".parse::<ViewParam>(),
            Ok(ViewParam::ManipulationMode(ManipulationMode::User))
        );
        assert_eq!(
            " ManipulationMode = 3 ".parse::<ViewParam>(),
            Ok(ViewParam::ManipulationMode(ManipulationMode::Fly))
        );
        assert!(matches!(
            "ManipulationMode=7".parse::<ViewParam>(),
            Err(ParamError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_dragger_filters() {
        let param: ViewParam = "DraggerFilters=5".parse().unwrap();
        match param {
            ViewParam::DraggerFilters(filters) => {
                assert!(filters.translate);
                assert!(!filters.rotate);
                assert!(filters.scale);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<ViewParam>(), Err(ParamError::Empty));
        assert_eq!(
            "Zoom=1".parse::<ViewParam>(),
            Err(ParamError::UnknownKey("Zoom".to_string()))
        );
        assert!(matches!(
            "DraggerFilters=abc".parse::<ViewParam>(),
            Err(ParamError::InvalidValue { .. })
        ));
    }
}
