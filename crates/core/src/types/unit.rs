//! Units of measure offered by the add-product form.

use serde::{Deserialize, Serialize};

/// Unit of measure for a product quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Pieces.
    #[default]
    Pz,
    Kg,
    G,
    L,
    Ml,
    /// Packages.
    Confezioni,
}

impl Unit {
    /// All units, in the order the form lists them.
    pub const ALL: [Self; 6] = [
        Self::Pz,
        Self::Kg,
        Self::G,
        Self::L,
        Self::Ml,
        Self::Confezioni,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pz => "pz",
            Self::Kg => "kg",
            Self::G => "g",
            Self::L => "l",
            Self::Ml => "ml",
            Self::Confezioni => "confezioni",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid unit: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_round_trips_through_from_str() {
        for unit in Unit::ALL {
            assert_eq!(unit.as_str().parse::<Unit>(), Ok(unit));
        }
        assert_eq!("KG".parse::<Unit>(), Ok(Unit::Kg));
        assert!("bottiglie".parse::<Unit>().is_err());
    }

    #[test]
    fn test_unit_serde_matches_display() {
        let json = serde_json::to_string(&Unit::Confezioni).expect("serialize");
        assert_eq!(json, "\"confezioni\"");
    }
}
