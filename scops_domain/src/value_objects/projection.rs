// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Projection
//!
//! Parses the order file's free-text `projection` field (e.g.
//! `"UTM zone 30N"` or `"UKBNG"`) and derives the token embedded in output
//! filenames and passed to `apltran -outproj`.

use crate::error::ScopsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    fn parse(ch: char) -> Result<Self, ScopsError> {
        match ch.to_ascii_uppercase() {
            'N' => Ok(Hemisphere::North),
            'S' => Ok(Hemisphere::South),
            other => Err(ScopsError::UnknownProjection(format!("unrecognized hemisphere: {other}"))),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Hemisphere::North => "n",
            Hemisphere::South => "s",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    Utm { zone: u8, hemisphere: Hemisphere },
    Ukbng,
}

impl Projection {
    /// Parses the order file's `projection` field. Returns
    /// [`ScopsError::UnknownProjection`] — the fatal
    /// `"ERROR - projection not identified"` state — on anything else.
    pub fn parse(text: &str) -> Result<Self, ScopsError> {
        if text.contains("UTM") {
            let parts: Vec<&str> = text.split(' ').collect();
            let token = parts
                .get(2)
                .ok_or_else(|| ScopsError::UnknownProjection(text.to_string()))?;
            let mut chars = token.chars();
            let hemisphere_ch = chars
                .next_back()
                .ok_or_else(|| ScopsError::UnknownProjection(text.to_string()))?;
            let zone_str: String = chars.collect();
            let zone: u8 = zone_str
                .parse()
                .map_err(|_| ScopsError::UnknownProjection(text.to_string()))?;
            let hemisphere = Hemisphere::parse(hemisphere_ch)?;
            Ok(Projection::Utm { zone, hemisphere })
        } else if text.contains("UKBNG") {
            Ok(Projection::Ukbng)
        } else {
            Err(ScopsError::UnknownProjection(text.to_string()))
        }
    }

    /// The token embedded in transformed filenames and passed to
    /// `apltran -outproj`, e.g. `utm_wgs84n_30` or `osng`.
    pub fn token(&self) -> String {
        match self {
            Projection::Utm { zone, hemisphere } => {
                format!("utm_wgs84{}_{}", hemisphere.as_str(), zone)
            }
            Projection::Ukbng => "osng".to_string(),
        }
    }

    /// The `-outproj` argument pair for `apltran`: hemisphere token and
    /// zone, or `osng` with no second argument.
    pub fn outproj_args(&self) -> Vec<String> {
        match self {
            Projection::Utm { zone, hemisphere } => {
                vec![format!("utm_wgs84{}", hemisphere.as_str()), zone.to_string()]
            }
            Projection::Ukbng => vec!["osng".to_string()],
        }
    }

    pub fn requires_separation_file(&self) -> bool {
        matches!(self, Projection::Ukbng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utm_north() {
        let projection = Projection::parse("UTM zone 30N").unwrap();
        assert_eq!(projection, Projection::Utm { zone: 30, hemisphere: Hemisphere::North });
        assert_eq!(projection.token(), "utm_wgs84n_30");
    }

    #[test]
    fn parses_utm_south() {
        let projection = Projection::parse("UTM zone 55S").unwrap();
        assert_eq!(projection, Projection::Utm { zone: 55, hemisphere: Hemisphere::South });
        assert_eq!(projection.token(), "utm_wgs84s_55");
    }

    #[test]
    fn parses_ukbng() {
        let projection = Projection::parse("UKBNG").unwrap();
        assert_eq!(projection, Projection::Ukbng);
        assert_eq!(projection.token(), "osng");
        assert!(projection.requires_separation_file());
    }

    #[test]
    fn unrecognized_projection_is_an_error() {
        assert!(Projection::parse("WEIRD").is_err());
    }
}
