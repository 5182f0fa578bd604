use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruments the API can produce a signal for. The catalog is fixed:
/// models and price histories are registered per instrument at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    Reliance,
    Tcs,
    Adani,
    Gold,
    Silver,
    Suzlon,
}

impl Instrument {
    pub fn symbol(&self) -> &'static str {
        match self {
            Instrument::Reliance => "RELIANCE",
            Instrument::Tcs => "TCS",
            Instrument::Adani => "ADANI",
            Instrument::Gold => "GOLD",
            Instrument::Silver => "SILVER",
            Instrument::Suzlon => "SUZLON",
        }
    }

    /// Human-friendly names that resolve to this instrument, as the
    /// dashboard sends them.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Instrument::Adani => &["ADANI POWER"],
            Instrument::Gold => &["TATA GOLD ETF"],
            Instrument::Silver => &["SILVER ETF"],
            _ => &[],
        }
    }

    /// Name the dashboard shows for this instrument; the first alias when
    /// one exists, the symbol otherwise.
    pub fn display_name(&self) -> &'static str {
        match self.aliases().first() {
            Some(name) => name,
            None => self.symbol(),
        }
    }

    /// CSV file holding this instrument's price history, under the
    /// configured data directory.
    pub fn data_file(&self) -> &'static str {
        match self {
            Instrument::Reliance => "RELIANCE_cleaned.csv",
            Instrument::Tcs => "TCS.csv",
            Instrument::Adani => "Adani.csv",
            Instrument::Gold => "Gold.csv",
            Instrument::Silver => "Silver.csv",
            Instrument::Suzlon => "Suzlon.csv",
        }
    }

    /// JSON weight file holding this instrument's model, under the
    /// configured models directory.
    pub fn model_file(&self) -> &'static str {
        match self {
            Instrument::Reliance => "reliance_model.json",
            Instrument::Tcs => "tcs_model.json",
            Instrument::Adani => "adani_model.json",
            Instrument::Gold => "gold_model.json",
            Instrument::Silver => "silver_model.json",
            Instrument::Suzlon => "suzlon_model.json",
        }
    }

    pub fn all() -> Vec<Instrument> {
        vec![
            Instrument::Reliance,
            Instrument::Tcs,
            Instrument::Adani,
            Instrument::Gold,
            Instrument::Silver,
            Instrument::Suzlon,
        ]
    }

    /// Case-insensitive lookup over canonical symbols first, then aliases.
    pub fn resolve(input: &str) -> Option<Self> {
        match input.to_uppercase().as_str() {
            "RELIANCE" => Some(Instrument::Reliance),
            "TCS" => Some(Instrument::Tcs),
            "ADANI" | "ADANI POWER" => Some(Instrument::Adani),
            "GOLD" | "TATA GOLD ETF" => Some(Instrument::Gold),
            "SILVER" | "SILVER ETF" => Some(Instrument::Silver),
            "SUZLON" => Some(Instrument::Suzlon),
            _ => None,
        }
    }

    /// Every accepted name (canonical symbols and aliases), sorted, for
    /// error messages and the catalog endpoint.
    pub fn supported_names() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Instrument::all()
            .into_iter()
            .flat_map(|i| {
                std::iter::once(i.symbol()).chain(i.aliases().iter().copied())
            })
            .collect();
        names.sort_unstable();
        names
    }

    pub fn supported_list() -> String {
        Self::supported_names().join(", ")
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_case_insensitive() {
        assert_eq!(Instrument::resolve("reliance"), Some(Instrument::Reliance));
        assert_eq!(Instrument::resolve("Tcs"), Some(Instrument::Tcs));
        assert_eq!(Instrument::resolve("SUZLON"), Some(Instrument::Suzlon));
    }

    #[test]
    fn test_resolve_accepts_aliases() {
        assert_eq!(Instrument::resolve("ADANI POWER"), Some(Instrument::Adani));
        assert_eq!(Instrument::resolve("tata gold etf"), Some(Instrument::Gold));
        assert_eq!(Instrument::resolve("Silver Etf"), Some(Instrument::Silver));
    }

    #[test]
    fn test_resolve_rejects_unknown_symbol() {
        assert_eq!(Instrument::resolve("XYZ"), None);
        assert_eq!(Instrument::resolve(""), None);
    }

    #[test]
    fn test_supported_names_include_aliases_and_are_sorted() {
        let names = Instrument::supported_names();
        assert_eq!(names.len(), 9);
        assert!(names.contains(&"ADANI POWER"));
        assert!(names.contains(&"TATA GOLD ETF"));
        assert!(names.contains(&"SILVER ETF"));
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_file_names_follow_catalog() {
        assert_eq!(Instrument::Reliance.data_file(), "RELIANCE_cleaned.csv");
        assert_eq!(Instrument::Gold.data_file(), "Gold.csv");
        assert_eq!(Instrument::Tcs.model_file(), "tcs_model.json");
    }

    #[test]
    fn test_display_names_match_dashboard() {
        assert_eq!(Instrument::Reliance.display_name(), "RELIANCE");
        assert_eq!(Instrument::Adani.display_name(), "ADANI POWER");
        assert_eq!(Instrument::Gold.display_name(), "TATA GOLD ETF");
        assert_eq!(Instrument::Silver.display_name(), "SILVER ETF");
        // every display name resolves back to its instrument
        for instrument in Instrument::all() {
            assert_eq!(Instrument::resolve(instrument.display_name()), Some(instrument));
        }
    }
}
