use serde::{Deserialize, Serialize};
use std::fmt;

/// Star catalogs reachable through this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    /// Gaia DR3, queried through the ESA archive
    Gaia,
    /// Guide Star Catalog 2.3, local install
    Gsc23,
    /// NOMAD1, local install
    Nomad1,
}

impl Catalog {
    pub fn all() -> &'static [Catalog] {
        &[Catalog::Gaia, Catalog::Gsc23, Catalog::Nomad1]
    }

    /// Bands that may carry magnitude limits in a query
    pub fn supported_bands(&self) -> &'static [Band] {
        match self {
            Catalog::Gaia => &[Band::B, Band::R],
            Catalog::Gsc23 => &[Band::J, Band::V, Band::F, Band::N, Band::U, Band::B],
            Catalog::Nomad1 => &[Band::B, Band::V, Band::R, Band::J, Band::H, Band::K],
        }
    }

    pub fn supports(&self, band: Band) -> bool {
        self.supported_bands().contains(&band)
    }

    /// Command line flag selecting a magnitude limit in the local search program.
    /// The remote catalog filters rows itself and has no flag.
    pub fn filter_flag(&self, band: Band) -> Option<String> {
        match self {
            Catalog::Gaia => None,
            Catalog::Gsc23 => Some(format!("-l{}", band)),
            Catalog::Nomad1 => Some(format!("-lc{}", band)),
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Catalog::Gaia => "Gaia",
            Catalog::Gsc23 => "GSC",
            Catalog::Nomad1 => "NOMAD1",
        };
        write!(f, "{}", name)
    }
}

/// Photometric bands, named by the single letter the catalogs use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, schemars::JsonSchema)]
pub enum Band {
    B,
    V,
    R,
    J,
    H,
    K,
    /// Photographic red (GSC2.3)
    F,
    /// Photographic near infrared (GSC2.3)
    N,
    /// Photographic ultraviolet (GSC2.3)
    U,
}

impl Band {
    /// Parse a band from its one-letter name
    pub fn from_letter(name: &str) -> Option<Self> {
        match name {
            "B" => Some(Band::B),
            "V" => Some(Band::V),
            "R" => Some(Band::R),
            "J" => Some(Band::J),
            "H" => Some(Band::H),
            "K" => Some(Band::K),
            "F" => Some(Band::F),
            "N" => Some(Band::N),
            "U" => Some(Band::U),
            _ => None,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            Band::B => 'B',
            Band::V => 'V',
            Band::R => 'R',
            Band::J => 'J',
            Band::H => 'H',
            Band::K => 'K',
            Band::F => 'F',
            Band::N => 'N',
            Band::U => 'U',
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
