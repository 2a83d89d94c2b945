//! Chromosome representation
//!
//! A chromosome is a fixed-length sequence of genes that all share one
//! [`ElementKind`]. Its canonical byte encoding ([`GenomeKey`]) is the
//! identity used by the fitness cache.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::bounds::{ElementKind, GeneSpace, SeedingBounds};

/// Typed gene storage
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Genes {
    Boolean(Vec<bool>),
    Integer(Vec<i64>),
    Float(Vec<f64>),
}

/// Canonical encoding of a chromosome: kind tag followed by little-endian genes
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenomeKey(Vec<u8>);

impl GenomeKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// One candidate solution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Chromosome {
    genes: Genes,
}

impl Chromosome {
    pub fn new(genes: Genes) -> Self {
        Self { genes }
    }

    pub fn from_bools(genes: Vec<bool>) -> Self {
        Self::new(Genes::Boolean(genes))
    }

    pub fn from_ints(genes: Vec<i64>) -> Self {
        Self::new(Genes::Integer(genes))
    }

    pub fn from_floats(genes: Vec<f64>) -> Self {
        Self::new(Genes::Float(genes))
    }

    /// Draw a random chromosome from the gene space
    ///
    /// Float genes are drawn continuously, integer and boolean genes discretely
    /// with both ends inclusive. See [`SeedingBounds`] for the upper-end convention;
    /// a gene space the convention cannot draw from is rejected.
    pub fn generate<R: Rng>(
        rng: &mut R,
        space: &GeneSpace,
        seeding: SeedingBounds,
    ) -> Result<Self, GenomeError> {
        space.check_seeding(seeding)?;
        let first_high = space.bounds()[0].high;
        let ranges = space.bounds().iter().map(|b| match seeding {
            SeedingBounds::PerGene => (b.low, b.high),
            SeedingBounds::FirstGeneUpper => (b.low, first_high),
        });

        let genes = match space.kind() {
            ElementKind::Float => Genes::Float(
                ranges
                    .map(|(low, high)| match seeding {
                        SeedingBounds::PerGene => rng.gen_range(low..=high),
                        SeedingBounds::FirstGeneUpper => rng.gen_range(low..high + 1.0),
                    })
                    .collect(),
            ),
            ElementKind::Integer => Genes::Integer(
                ranges
                    .map(|(low, high)| rng.gen_range(low as i64..=high as i64))
                    .collect(),
            ),
            ElementKind::Boolean => Genes::Boolean(
                ranges
                    .map(|(low, high)| rng.gen_range(low as u8..=high as u8) == 1)
                    .collect(),
            ),
        };
        Ok(Self::new(genes))
    }

    pub fn kind(&self) -> ElementKind {
        match self.genes {
            Genes::Boolean(_) => ElementKind::Boolean,
            Genes::Integer(_) => ElementKind::Integer,
            Genes::Float(_) => ElementKind::Float,
        }
    }

    /// Number of genes
    pub fn len(&self) -> usize {
        match &self.genes {
            Genes::Boolean(g) => g.len(),
            Genes::Integer(g) => g.len(),
            Genes::Float(g) => g.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn genes(&self) -> &Genes {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut Genes {
        &mut self.genes
    }

    pub fn into_genes(self) -> Genes {
        self.genes
    }

    pub fn as_floats(&self) -> Option<&[f64]> {
        match &self.genes {
            Genes::Float(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match &self.genes {
            Genes::Integer(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_bools(&self) -> Option<&[bool]> {
        match &self.genes {
            Genes::Boolean(g) => Some(g),
            _ => None,
        }
    }

    /// Gene values widened to f64 (booleans become 0.0 / 1.0)
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match &self.genes {
            Genes::Boolean(g) => g.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect(),
            Genes::Integer(g) => g.iter().map(|&v| v as f64).collect(),
            Genes::Float(g) => g.clone(),
        }
    }

    /// Canonical identity used by the fitness cache
    pub fn key(&self) -> GenomeKey {
        let mut bytes = Vec::with_capacity(1 + 8 * self.len());
        bytes.push(self.kind().tag());
        match &self.genes {
            Genes::Boolean(g) => bytes.extend(g.iter().map(|&b| b as u8)),
            Genes::Integer(g) => g.iter().for_each(|v| bytes.extend(v.to_le_bytes())),
            Genes::Float(g) => g.iter().for_each(|v| bytes.extend(v.to_le_bytes())),
        }
        GenomeKey(bytes)
    }

    /// Genes `[..cut]` of `head` followed by genes `[cut..]` of `tail`
    pub fn splice(head: &Self, tail: &Self, cut: usize) -> Result<Self, GenomeError> {
        if head.len() != tail.len() {
            return Err(GenomeError::DimensionMismatch {
                expected: head.len(),
                actual: tail.len(),
            });
        }
        if cut > head.len() {
            return Err(GenomeError::InvalidStructure(format!(
                "cut point {cut} beyond chromosome length {}",
                head.len()
            )));
        }

        fn join<T: Clone>(a: &[T], b: &[T], cut: usize) -> Vec<T> {
            a[..cut].iter().chain(&b[cut..]).cloned().collect()
        }

        let genes = match (&head.genes, &tail.genes) {
            (Genes::Boolean(a), Genes::Boolean(b)) => Genes::Boolean(join(a, b, cut)),
            (Genes::Integer(a), Genes::Integer(b)) => Genes::Integer(join(a, b, cut)),
            (Genes::Float(a), Genes::Float(b)) => Genes::Float(join(a, b, cut)),
            _ => {
                return Err(GenomeError::KindMismatch {
                    expected: head.kind(),
                    actual: tail.kind(),
                })
            }
        };
        Ok(Self::new(genes))
    }

    /// Check that this chromosome has the gene space's length and kind
    pub fn check_fits(&self, space: &GeneSpace) -> Result<(), GenomeError> {
        if self.kind() != space.kind() {
            return Err(GenomeError::KindMismatch {
                expected: space.kind(),
                actual: self.kind(),
            });
        }
        if self.len() != space.len() {
            return Err(GenomeError::DimensionMismatch {
                expected: space.len(),
                actual: self.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{item}")?;
            }
            f.write_str("]")
        }
        match &self.genes {
            Genes::Boolean(g) => list(f, g),
            Genes::Integer(g) => list(f, g),
            Genes::Float(g) => list(f, g),
        }
    }
}
