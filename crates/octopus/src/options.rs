use std::str::FromStr;

use octopus_geom::PrecisionModel;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Uniformly scale node positions until no buffers overlap.
    Scale,
    /// Push half-planes apart conflict by conflict, then repair octilinearity.
    Displace,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scale => "scale",
            Self::Displace => "displace",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scale" => Ok(Self::Scale),
            "displace" => Ok(Self::Displace),
            other => Err(Error::InvalidOptions {
                message: format!("unknown strategy: {other} (expected scale|displace)"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MakeSpaceOptions {
    /// Spacing between routes inside a bundle.
    pub route_margin: f64,
    /// Spacing between an edge and anything else; also the node buffer margin.
    pub edge_margin: f64,
    pub precision_decimals: u32,
    pub max_iterations_scale: usize,
    pub max_iterations_displace: usize,
    /// Endpoints costing more than this are not moved; bends are inserted instead.
    pub max_adjustment_costs: u32,
    /// Cost reported when a correction chain runs into a node it already visited.
    pub correct_circle_penalty: u32,
    /// Refuse moves that would shorten an adjacent edge past its opposite endpoint.
    pub shortening_guard: bool,
}

impl Default for MakeSpaceOptions {
    fn default() -> Self {
        Self {
            route_margin: 5.0,
            edge_margin: 25.0,
            precision_decimals: PrecisionModel::DEFAULT_DECIMALS,
            max_iterations_scale: 100,
            max_iterations_displace: 200,
            max_adjustment_costs: 5,
            correct_circle_penalty: 1000,
            shortening_guard: false,
        }
    }
}

impl MakeSpaceOptions {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("route_margin", self.route_margin),
            ("edge_margin", self.edge_margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidOptions {
                    message: format!("{name} must be a finite, non-negative number (got {value})"),
                });
            }
        }
        if self.max_iterations_scale == 0 || self.max_iterations_displace == 0 {
            return Err(Error::InvalidOptions {
                message: "iteration caps must be at least 1".to_string(),
            });
        }
        if self.precision_decimals > 15 {
            return Err(Error::InvalidOptions {
                message: format!(
                    "precision_decimals must be at most 15 (got {})",
                    self.precision_decimals
                ),
            });
        }
        Ok(())
    }

    pub fn precision(&self) -> PrecisionModel {
        PrecisionModel::new(self.precision_decimals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(MakeSpaceOptions::default().validate().is_ok());
    }

    #[test]
    fn negative_or_nan_margins_are_rejected() {
        let opts = MakeSpaceOptions {
            edge_margin: -1.0,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(Error::InvalidOptions { .. })));
        let opts = MakeSpaceOptions {
            route_margin: f64::NAN,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn zero_caps_are_rejected() {
        let opts = MakeSpaceOptions {
            max_iterations_displace: 0,
            ..Default::default()
        };
        assert!(opts.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let opts: MakeSpaceOptions =
            serde_json::from_str(r#"{ "edge_margin": 10.0, "shortening_guard": true }"#).unwrap();
        assert_eq!(opts.edge_margin, 10.0);
        assert!(opts.shortening_guard);
        assert_eq!(opts.route_margin, 5.0);
        assert_eq!(opts.max_iterations_scale, 100);
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Scale".parse::<Strategy>().unwrap(), Strategy::Scale);
        assert_eq!(" displace ".parse::<Strategy>().unwrap(), Strategy::Displace);
        assert!("shuffle".parse::<Strategy>().is_err());
    }
}
