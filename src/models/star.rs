use serde::Serialize;

/// Star returned by a Gaia DR3 cone search
#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct GaiaStar {
    /// Gaia designation (e.g. "Gaia DR3 4295806720")
    pub id: String,
    /// RA and Dec as two zero-padded `%011.8f` fields, no separator
    pub radec: String,
    /// Mean BP magnitude
    pub bmag: Option<f64>,
    /// Mean RP magnitude
    pub rmag: Option<f64>,
}

/// Star returned by the local GSC2.3 search program
#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct Gsc23Star {
    /// Coordinate token as printed by the search program
    pub radec: String,
    pub fmag: Option<f64>,
    pub jmag: Option<f64>,
    pub vmag: Option<f64>,
    pub nmag: Option<f64>,
    pub umag: Option<f64>,
    pub bmag: Option<f64>,
    /// Distance column, always printed with a leading flag character
    pub r: f64,
}

/// Star returned by the local NOMAD1 search program
#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
pub struct Nomad1Star {
    /// Coordinate token as printed by the search program
    pub radec: String,
    pub bmag: Option<f64>,
    pub vmag: Option<f64>,
    pub rmag: Option<f64>,
    pub jmag: Option<f64>,
    pub hmag: Option<f64>,
    pub kmag: Option<f64>,
    /// Distance column, blank for some entries
    pub r: Option<f64>,
}

/// A star from any catalog, tagged with its origin
#[derive(Debug, Clone, PartialEq, Serialize, schemars::JsonSchema)]
#[serde(tag = "catalog", rename_all = "snake_case")]
pub enum StarRecord {
    Gaia(GaiaStar),
    Gsc23(Gsc23Star),
    Nomad1(Nomad1Star),
}

impl From<GaiaStar> for StarRecord {
    fn from(star: GaiaStar) -> Self {
        StarRecord::Gaia(star)
    }
}

impl From<Gsc23Star> for StarRecord {
    fn from(star: Gsc23Star) -> Self {
        StarRecord::Gsc23(star)
    }
}

impl From<Nomad1Star> for StarRecord {
    fn from(star: Nomad1Star) -> Self {
        StarRecord::Nomad1(star)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_with_catalog_tag() {
        let record = StarRecord::from(Nomad1Star {
            radec: "010.000000+20.000000".to_string(),
            bmag: Some(12.5),
            vmag: None,
            rmag: None,
            jmag: None,
            hmag: None,
            kmag: None,
            r: None,
        });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["catalog"], "nomad1");
        assert_eq!(value["bmag"], 12.5);
        assert!(value["vmag"].is_null());
    }
}
