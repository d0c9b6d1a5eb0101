// /////////////////////////////////////////////////////////////////////////////
// SCOPS
// /////////////////////////////////////////////////////////////////////////////

//! # Line record
//!
//! The per-flightline section of an order file: whether to run the main
//! hyperspectral line, which bands to carry, and which band-math
//! equations / plugins are enabled for it.

use std::collections::BTreeMap;

use crate::value_objects::band_range::BandRange;

/// One flightline's order-file section.
#[derive(Debug, Clone)]
pub struct LineRecord {
    pub process: bool,
    pub masking: String,
    pub band_range: BandRange,
    pub sortie: Option<String>,
    /// Keys retain their `eq_`/`plugin_` prefix so the two selector
    /// namespaces never collide; value is the section's boolean flag.
    pub selectors: BTreeMap<String, bool>,
}

impl LineRecord {
    /// Enabled `eq_<name>` band-math equation selectors, in key order.
    pub fn enabled_equations(&self) -> impl Iterator<Item = &str> {
        self.selectors
            .iter()
            .filter(|(key, enabled)| key.starts_with("eq_") && **enabled)
            .map(|(key, _)| key.as_str())
    }

    /// Enabled `plugin_<name>` selectors, in key order.
    pub fn enabled_plugins(&self) -> impl Iterator<Item = &str> {
        self.selectors
            .iter()
            .filter(|(key, enabled)| key.starts_with("plugin_") && **enabled)
            .map(|(key, _)| key.as_str())
    }

    /// True if the main line, any equation, or any plugin is selected —
    /// the condition under which this line contributes work to an order.
    pub fn requires_processing(&self) -> bool {
        self.process || self.enabled_equations().next().is_some() || self.enabled_plugins().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(process: bool, selectors: &[(&str, bool)]) -> LineRecord {
        LineRecord {
            process,
            masking: "none".to_string(),
            band_range: BandRange::parse("ALL").unwrap(),
            sortie: None,
            selectors: selectors.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    #[test]
    fn selectors_keep_eq_and_plugin_namespaces_distinct() {
        let line = line(false, &[("eq_ndvi", true), ("plugin_ndvi", false)]);
        assert_eq!(line.enabled_equations().collect::<Vec<_>>(), vec!["eq_ndvi"]);
        assert!(line.enabled_plugins().next().is_none());
    }

    #[test]
    fn requires_processing_when_only_a_plugin_is_enabled() {
        let line = line(false, &[("plugin_spectral_angle", true)]);
        assert!(line.requires_processing());
    }

    #[test]
    fn does_not_require_processing_when_nothing_is_selected() {
        let line = line(false, &[("eq_ndvi", false)]);
        assert!(!line.requires_processing());
    }
}
