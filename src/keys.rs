//! Enums used as keys for selecting columns of the data files.
use strum_macros::{AsRefStr, Display, EnumIter};

/// The components of the wind measured by a sonic anemometer, in a streamline rotated frame.
///
/// `as_ref()` and `to_string()` give the column name in the time series files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display)]
pub enum WindComponent {
    /// Along wind
    #[strum(serialize = "u")]
    U,
    /// Cross wind
    #[strum(serialize = "v")]
    V,
    /// Vertical
    #[strum(serialize = "w")]
    W,
}

impl WindComponent {
    /// Name of the column with the power spectral density of this component.
    pub fn spectrum_column(self) -> &'static str {
        match self {
            WindComponent::U => "Su",
            WindComponent::V => "Sv",
            WindComponent::W => "Sw",
        }
    }

    /// Upper case name for chart labels.
    pub fn label(self) -> &'static str {
        match self {
            WindComponent::U => "U",
            WindComponent::V => "V",
            WindComponent::W => "W",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_wind_component_names() {
        let names: Vec<String> = WindComponent::iter().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["u", "v", "w"]);
        assert_eq!(WindComponent::U.as_ref(), "u");

        let spectra: Vec<&str> = WindComponent::iter().map(|c| c.spectrum_column()).collect();
        assert_eq!(spectra, vec!["Su", "Sv", "Sw"]);

        assert_eq!(WindComponent::W.label(), "W");
        assert_eq!(format!("{}_prime", WindComponent::V), "v_prime");
    }
}
