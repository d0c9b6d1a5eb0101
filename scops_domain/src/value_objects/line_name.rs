// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Line name
//!
//! A flightline identifier as it appears as an order-file section header:
//! a sensor-letter prefix (`f`enix, `e`agle, `h`awk, `o`wl) followed by the
//! flightline number, e.g. `f123`.

use std::fmt;

use crate::error::ScopsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    Fenix,
    Eagle,
    Hawk,
    Owl,
}

impl Sensor {
    fn from_letter(letter: char) -> Result<Self, ScopsError> {
        match letter.to_ascii_lowercase() {
            'f' => Ok(Sensor::Fenix),
            'e' => Ok(Sensor::Eagle),
            'h' => Ok(Sensor::Hawk),
            'o' => Ok(Sensor::Owl),
            other => Err(ScopsError::InvalidOrderFile(format!(
                "no compatible sensor for prefix '{other}': line names must begin with f, e, h, or o"
            ))),
        }
    }

    /// The hyperspectral delivery folder family this sensor's files land
    /// in; every sensor but the owl shares the `hyperspectral` family.
    pub fn delivery_folder_key(self) -> &'static str {
        match self {
            Sensor::Owl => "owl",
            _ => "hyperspectral",
        }
    }

    /// The sensor name as it appears in the view-vector file name
    /// (`<name>_fov_fullccd_vectors.bil`).
    pub fn name(self) -> &'static str {
        match self {
            Sensor::Fenix => "fenix",
            Sensor::Eagle => "eagle",
            Sensor::Hawk => "hawk",
            Sensor::Owl => "owl",
        }
    }
}

/// A `LineKey`, e.g. `f123`: the order-file section header identifying one
/// flightline, used as the map key in [`crate::entities::order::Order`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineKey(String);

impl LineKey {
    pub fn parse(text: &str) -> Result<Self, ScopsError> {
        let trimmed = text.trim();
        let first = trimmed
            .chars()
            .next()
            .ok_or_else(|| ScopsError::InvalidOrderFile("line name must not be empty".to_string()))?;
        Sensor::from_letter(first)?;
        Ok(LineKey(trimmed.to_string()))
    }

    pub fn sensor(&self) -> Sensor {
        Sensor::from_letter(self.0.chars().next().expect("non-empty by construction"))
            .expect("validated at construction")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_sensor_prefixes() {
        for name in ["f123", "e045", "h999", "o001"] {
            assert!(LineKey::parse(name).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_sensor_prefixes() {
        assert!(LineKey::parse("x123").is_err());
    }

    #[test]
    fn sensor_name_matches_the_view_vector_file_prefix() {
        assert_eq!(LineKey::parse("f001").unwrap().sensor().name(), "fenix");
        assert_eq!(LineKey::parse("e001").unwrap().sensor().name(), "eagle");
        assert_eq!(LineKey::parse("h001").unwrap().sensor().name(), "hawk");
        assert_eq!(LineKey::parse("o001").unwrap().sensor().name(), "owl");
    }

    #[test]
    fn owl_maps_to_its_own_delivery_folder() {
        assert_eq!(LineKey::parse("o001").unwrap().sensor().delivery_folder_key(), "owl");
        assert_eq!(LineKey::parse("f001").unwrap().sensor().delivery_folder_key(), "hyperspectral");
    }
}
