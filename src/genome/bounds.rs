//! Gene space bounds
//!
//! A [`GeneSpace`] is an ordered table of `[low, high]` rows, one per gene,
//! together with the [`ElementKind`] every gene of a chromosome shares.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError, GenomeError};

/// Bounds for a single gene (both ends inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneBounds {
    /// Lower bound (inclusive)
    pub low: f64,
    /// Upper bound (inclusive)
    pub high: f64,
}

impl GeneBounds {
    /// Create new gene bounds without validation
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Get the range (high - low)
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

impl From<(f64, f64)> for GeneBounds {
    fn from((low, high): (f64, f64)) -> Self {
        Self::new(low, high)
    }
}

/// Numeric kind shared by every gene of a chromosome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Genes are `bool`, bounds restricted to {0, 1}
    Boolean,
    /// Genes are `i64`
    Integer,
    /// Genes are `f64`
    Float,
}

impl ElementKind {
    /// Tag byte used in canonical chromosome encodings
    pub(crate) fn tag(self) -> u8 {
        match self {
            Self::Boolean => b'?',
            Self::Integer => b'i',
            Self::Float => b'f',
        }
    }

    pub fn is_float(self) -> bool {
        self == Self::Float
    }

    pub fn is_integer(self) -> bool {
        self == Self::Integer
    }

    pub fn is_boolean(self) -> bool {
        self == Self::Boolean
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
        };
        f.write_str(name)
    }
}

impl FromStr for ElementKind {
    type Err = EvolutionError;

    /// Parse a dtype-style name (`"bool"`, `"int32"`, `"uint8"`, `"float64"`, `"f64"`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" | "bool_" | "?" => Ok(Self::Boolean),
            "int" | "integer" | "int8" | "int16" | "int32" | "int64" | "uint8" | "uint16"
            | "uint32" | "uint64" | "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32"
            | "u64" | "isize" | "usize" => Ok(Self::Integer),
            "float" | "double" | "float16" | "float32" | "float64" | "half" | "single"
            | "f16" | "f32" | "f64" => Ok(Self::Float),
            other => Err(EvolutionError::config(format!(
                "chromosome type must be a boolean, integer or float kind, got '{other}'"
            ))),
        }
    }
}

/// How the initial population draws the upper end of each gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingBounds {
    /// Each gene is drawn from its own `[low, high]`
    #[default]
    PerGene,
    /// Every gene uses the first gene's `high` as its upper end (legacy behavior).
    /// Float draws are taken from `[low, first_high + 1)`, integer and boolean draws
    /// from `[low, first_high]`.
    FirstGeneUpper,
}

/// Search space: per-gene bounds plus the shared element kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeneSpace")]
pub struct GeneSpace {
    bounds: Vec<GeneBounds>,
    kind: ElementKind,
}

#[derive(Deserialize)]
struct RawGeneSpace {
    bounds: Vec<GeneBounds>,
    kind: ElementKind,
}

impl TryFrom<RawGeneSpace> for GeneSpace {
    type Error = EvolutionError;

    fn try_from(raw: RawGeneSpace) -> Result<Self, Self::Error> {
        Self::new(raw.bounds, raw.kind)
    }
}

impl GeneSpace {
    /// Create a validated gene space
    pub fn new<B: Into<GeneBounds>>(
        bounds: impl IntoIterator<Item = B>,
        kind: ElementKind,
    ) -> EvoResult<Self> {
        let space = Self {
            bounds: bounds.into_iter().map(Into::into).collect(),
            kind,
        };
        space.validate()?;
        Ok(space)
    }

    /// Create a gene space from a numeric table, one `[low, high]` row per gene
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R], kind: ElementKind) -> EvoResult<Self> {
        let bounds = rows
            .iter()
            .enumerate()
            .map(|(i, row)| match row.as_ref() {
                [low, high] => Ok(GeneBounds::new(*low, *high)),
                other => Err(EvolutionError::config(format!(
                    "bounds must be a table with two columns [low, high]; row {i} has {} columns",
                    other.len()
                ))),
            })
            .collect::<EvoResult<Vec<_>>>()?;
        Self::new(bounds, kind)
    }

    /// Same bounds for every gene
    pub fn uniform(low: f64, high: f64, genes: usize, kind: ElementKind) -> EvoResult<Self> {
        Self::new(vec![GeneBounds::new(low, high); genes], kind)
    }

    fn validate(&self) -> EvoResult<()> {
        if self.bounds.is_empty() {
            return Err(EvolutionError::config(
                "bounds table must declare at least one gene",
            ));
        }

        for (i, b) in self.bounds.iter().enumerate() {
            if !b.low.is_finite() || !b.high.is_finite() {
                return Err(EvolutionError::config(format!(
                    "bounds of gene {i} must be finite numbers, got [{}, {}]",
                    b.low, b.high
                )));
            }
            if b.low > b.high {
                return Err(EvolutionError::config(format!(
                    "bounds of gene {i} are inverted: low ({}) > high ({})",
                    b.low, b.high
                )));
            }
            match self.kind {
                ElementKind::Boolean => {
                    let is_bit = |v: f64| v == 0.0 || v == 1.0;
                    if !is_bit(b.low) || !is_bit(b.high) {
                        return Err(EvolutionError::config(format!(
                            "boolean chromosomes require bounds of 0 or 1; gene {i} has [{}, {}]",
                            b.low, b.high
                        )));
                    }
                }
                ElementKind::Integer => {
                    if b.low.fract() != 0.0 || b.high.fract() != 0.0 {
                        return Err(EvolutionError::config(format!(
                            "integer chromosomes require integral bounds; gene {i} has [{}, {}]",
                            b.low, b.high
                        )));
                    }
                }
                ElementKind::Float => {}
            }
        }
        Ok(())
    }

    /// Check that `mode` can draw a value for every gene
    pub fn check_seeding(&self, mode: SeedingBounds) -> Result<(), GenomeError> {
        if mode == SeedingBounds::FirstGeneUpper {
            let first_high = self.bounds[0].high;
            if let Some((i, b)) = self
                .bounds
                .iter()
                .enumerate()
                .find(|(_, b)| b.low > first_high)
            {
                return Err(GenomeError::InvalidStructure(format!(
                    "first-gene-upper seeding needs every low <= {first_high}; gene {i} has low {}",
                    b.low
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn validate_seeding(&self, mode: SeedingBounds) -> EvoResult<()> {
        self.check_seeding(mode).map_err(|e| EvolutionError::config(e.to_string()))
    }

    /// Number of genes
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Always false for a validated gene space
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Element kind
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Bounds of one gene
    pub fn get(&self, index: usize) -> Option<&GeneBounds> {
        self.bounds.get(index)
    }

    pub fn bounds(&self) -> &[GeneBounds] {
        &self.bounds
    }

    /// Check if every value lies inside its gene's bounds
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.len()
            && values
                .iter()
                .zip(&self.bounds)
                .all(|(&v, b)| b.contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gene_space_new() {
        let space = GeneSpace::new(vec![(0.0, 10.0), (-1.0, 1.0)], ElementKind::Float).unwrap();
        assert_eq!(space.len(), 2);
        assert_eq!(space.kind(), ElementKind::Float);
        assert_eq!(space.get(1), Some(&GeneBounds::new(-1.0, 1.0)));
        assert_eq!(space.get(2), None);
    }

    #[test]
    fn test_from_rows_rejects_wrong_column_count() {
        let rows = vec![vec![0.0, 1.0], vec![0.0, 1.0, 2.0]];
        let err = GeneSpace::from_rows(&rows, ElementKind::Float).unwrap_err();
        assert!(matches!(err, EvolutionError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("row 1 has 3 columns"));
    }

    #[test]
    fn test_from_rows_accepts_arrays() {
        let rows = [[0.0, 10.0], [0.0, 10.0], [0.0, 10.0]];
        let space = GeneSpace::from_rows(&rows, ElementKind::Integer).unwrap();
        assert_eq!(space.len(), 3);
    }

    #[test]
    fn test_boolean_bounds_must_be_bits() {
        assert!(GeneSpace::uniform(0.0, 1.0, 4, ElementKind::Boolean).is_ok());
        let err = GeneSpace::uniform(0.0, 2.0, 4, ElementKind::Boolean).unwrap_err();
        assert!(err.to_string().contains("0 or 1"));
        assert!(GeneSpace::uniform(-1.0, 1.0, 4, ElementKind::Boolean).is_err());
    }

    #[test]
    fn test_integer_bounds_must_be_integral() {
        assert!(GeneSpace::uniform(0.5, 3.0, 2, ElementKind::Integer).is_err());
        assert!(GeneSpace::uniform(0.5, 3.0, 2, ElementKind::Float).is_ok());
    }

    #[test]
    fn test_inverted_and_non_finite_bounds() {
        assert!(GeneSpace::uniform(5.0, 1.0, 2, ElementKind::Float).is_err());
        assert!(GeneSpace::uniform(f64::NAN, 1.0, 2, ElementKind::Float).is_err());
        assert!(GeneSpace::uniform(0.0, f64::INFINITY, 2, ElementKind::Float).is_err());
    }

    #[test]
    fn test_empty_gene_space() {
        let err = GeneSpace::new(Vec::<(f64, f64)>::new(), ElementKind::Float).unwrap_err();
        assert!(err.to_string().contains("at least one gene"));
    }

    #[test]
    fn test_element_kind_parse() {
        assert_eq!("bool".parse::<ElementKind>().unwrap(), ElementKind::Boolean);
        assert_eq!("int32".parse::<ElementKind>().unwrap(), ElementKind::Integer);
        assert_eq!("uint8".parse::<ElementKind>().unwrap(), ElementKind::Integer);
        assert_eq!("float64".parse::<ElementKind>().unwrap(), ElementKind::Float);
        assert_eq!("F32".parse::<ElementKind>().unwrap(), ElementKind::Float);

        let err = "str".parse::<ElementKind>().unwrap_err();
        assert!(matches!(err, EvolutionError::InvalidConfiguration(_)));
        assert!("complex128".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_first_gene_upper_seeding_validation() {
        let space = GeneSpace::new(vec![(0.0, 3.0), (5.0, 9.0)], ElementKind::Integer).unwrap();
        assert!(space.validate_seeding(SeedingBounds::PerGene).is_ok());
        assert!(space.validate_seeding(SeedingBounds::FirstGeneUpper).is_err());
    }

    #[test]
    fn test_gene_space_contains() {
        let space = GeneSpace::uniform(0.0, 1.0, 2, ElementKind::Float).unwrap();
        assert!(space.contains(&[0.0, 1.0]));
        assert!(!space.contains(&[0.0, 1.5]));
        assert!(!space.contains(&[0.0]));
    }

    #[test]
    fn test_gene_space_deserialize_validates() {
        let ok: GeneSpace =
            serde_json::from_str(r#"{"bounds":[{"low":0,"high":1}],"kind":"boolean"}"#).unwrap();
        assert_eq!(ok.len(), 1);

        let bad = serde_json::from_str::<GeneSpace>(
            r#"{"bounds":[{"low":0,"high":3}],"kind":"boolean"}"#,
        );
        assert!(bad.is_err());
    }
}
