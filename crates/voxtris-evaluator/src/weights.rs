use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use voxtris_engine::Playfield;

/// Weights of the four-feature board heuristic.
///
/// A board is scored as
/// `height * aggregate_height + lines * full_lines + bumpiness * bumpiness
/// + holes * hole_count`, all features measured before any clearing.
/// Weight vectors are compared by direction only, so they are kept at
/// unit length; [`WeightVector::normalized`] maps the degenerate zero
/// vector to a fixed unit vector instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub height: f64,
    pub lines: f64,
    pub bumpiness: f64,
    pub holes: f64,
}

/// Norms below this are treated as zero.
const NORM_EPS: f64 = 1e-9;

impl WeightVector {
    /// Replacement for the zero vector: reward lines, ignore the rest.
    pub const UNIT_FALLBACK: Self = Self {
        height: 0.0,
        lines: 1.0,
        bumpiness: 0.0,
        holes: 0.0,
    };

    #[must_use]
    pub fn as_array(self) -> [f64; 4] {
        [self.height, self.lines, self.bumpiness, self.holes]
    }

    #[must_use]
    pub fn from_array([height, lines, bumpiness, holes]: [f64; 4]) -> Self {
        Self {
            height,
            lines,
            bumpiness,
            holes,
        }
    }

    #[must_use]
    pub fn norm(self) -> f64 {
        self.as_array().iter().map(|w| w * w).sum::<f64>().sqrt()
    }

    /// Scales the vector to unit length. The zero vector becomes
    /// [`Self::UNIT_FALLBACK`].
    #[must_use]
    pub fn normalized(self) -> Self {
        let norm = self.norm();
        if norm < NORM_EPS {
            return Self::UNIT_FALLBACK;
        }
        Self::from_array(self.as_array().map(|w| w / norm))
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.as_array()
            .iter()
            .zip(other.as_array())
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Scores a board state: higher is better. Features are read from the
    /// board as it stands, with full lines counted but not cleared.
    #[must_use]
    pub fn score_board<F: Playfield>(&self, board: &F) -> f64 {
        #[expect(clippy::cast_precision_loss)]
        let score = self.height * board.aggregate_height() as f64
            + self.lines * board.count_full_lines() as f64
            + self.bumpiness * board.bumpiness() as f64
            + self.holes * board.hole_count() as f64;
        score
    }
}

impl Default for WeightVector {
    /// The classic hand-published linear-heuristic constants, normalized.
    /// A reasonable starting point, not an optimum; training replaces it.
    fn default() -> Self {
        Self {
            height: -0.510_066,
            lines: 0.760_666,
            bumpiness: -0.184_483,
            holes: -0.356_630,
        }
        .normalized()
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "height = {}", self.height)?;
        writeln!(f, "lines = {}", self.lines)?;
        writeln!(f, "bumpiness = {}", self.bumpiness)?;
        writeln!(f, "holes = {}", self.holes)?;
        Ok(())
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParseWeightsError {
    #[display("malformed weight line: {line:?}")]
    MalformedLine { line: String },
    #[display("unknown weight name: {name:?}")]
    UnknownName { name: String },
    #[display("duplicate weight name: {name:?}")]
    DuplicateName { name: String },
    #[display("invalid weight value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },
    #[display("missing weight name: {name}")]
    MissingName { name: String },
}

impl FromStr for WeightVector {
    type Err = ParseWeightsError;

    /// Parses the `name = value` line format emitted by `Display`. All
    /// four weights must appear exactly once; blank lines are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const NAMES: [&str; 4] = ["height", "lines", "bumpiness", "holes"];
        let mut values: [Option<f64>; 4] = [None; 4];
        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let (name, value) =
                line.split_once('=')
                    .ok_or_else(|| ParseWeightsError::MalformedLine {
                        line: line.to_owned(),
                    })?;
            let (name, value) = (name.trim(), value.trim());
            let idx = NAMES.iter().position(|&n| n == name).ok_or_else(|| {
                ParseWeightsError::UnknownName {
                    name: name.to_owned(),
                }
            })?;
            if values[idx].is_some() {
                return Err(ParseWeightsError::DuplicateName {
                    name: name.to_owned(),
                });
            }
            let parsed = value
                .parse()
                .map_err(|_| ParseWeightsError::InvalidValue {
                    name: name.to_owned(),
                    value: value.to_owned(),
                })?;
            values[idx] = Some(parsed);
        }
        for (idx, name) in NAMES.iter().enumerate() {
            if values[idx].is_none() {
                return Err(ParseWeightsError::MissingName {
                    name: (*name).to_owned(),
                });
            }
        }
        Ok(Self::from_array(values.map(|v| v.unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use voxtris_engine::Board2;

    use super::*;

    #[test]
    fn test_normalized_has_unit_length() {
        let raw = WeightVector {
            height: -3.0,
            lines: 4.0,
            bumpiness: 0.0,
            holes: 0.0,
        };
        let unit = raw.normalized();
        assert!((unit.norm() - 1.0).abs() < 1e-12);
        assert!((unit.height - -0.6).abs() < 1e-12);
        assert!((unit.lines - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_normalizes_to_fallback() {
        let zero = WeightVector {
            height: 0.0,
            lines: 0.0,
            bumpiness: 0.0,
            holes: 0.0,
        };
        assert_eq!(zero.normalized(), WeightVector::UNIT_FALLBACK);
        assert!((WeightVector::UNIT_FALLBACK.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_is_normalized() {
        assert!((WeightVector::default().norm() - 1.0).abs() < 1e-12);
        assert!(WeightVector::default().height < 0.0);
        assert!(WeightVector::default().lines > 0.0);
    }

    #[test]
    fn test_score_board_combines_features() {
        let board = Board2::from_ascii(
            "
            ....
            #...
            ####
            #.##
            ",
        );
        // aggregate 3+2+2+2 = 9, full lines 1, bumpiness 1+0+0 = 1, holes 1
        let weights = WeightVector {
            height: -1.0,
            lines: 10.0,
            bumpiness: -0.5,
            holes: -2.0,
        };
        let expected = -9.0 + 10.0 - 0.5 - 2.0;
        assert!((weights.score_board(&board) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_text_round_trip() {
        let weights = WeightVector::default();
        let text = weights.to_string();
        let parsed: WeightVector = text.parse().unwrap();
        assert!((parsed.height - weights.height).abs() < 1e-12);
        assert!((parsed.holes - weights.holes).abs() < 1e-12);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "height = 1".parse::<WeightVector>(),
            Err(ParseWeightsError::MissingName { .. })
        ));
        assert!(matches!(
            "gravity = 1".parse::<WeightVector>(),
            Err(ParseWeightsError::UnknownName { .. })
        ));
        assert!(matches!(
            "height 1".parse::<WeightVector>(),
            Err(ParseWeightsError::MalformedLine { .. })
        ));
        assert!(matches!(
            "height = one".parse::<WeightVector>(),
            Err(ParseWeightsError::InvalidValue { .. })
        ));
        let doubled = "height = 1\nheight = 2";
        assert!(matches!(
            doubled.parse::<WeightVector>(),
            Err(ParseWeightsError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let weights = WeightVector::default();
        let json = serde_json::to_string(&weights).unwrap();
        let back: WeightVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, weights);
    }
}
