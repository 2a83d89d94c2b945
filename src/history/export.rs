//! History persistence
//!
//! Histories can be saved as JSON or, with the `history-binary` feature, as
//! bincode behind a version and magic header. [`History::load`] detects the
//! format. [`History::write_text`] produces a human-readable dump of every
//! generation.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::recorder::History;
use crate::error::HistoryError;
use crate::fitness::traits::FitnessValue;

/// Current history file version
pub const HISTORY_VERSION: u32 = 1;

/// Marker stored in JSON history files
const JSON_FORMAT_MARKER: &str = "evo-min-history";

#[cfg(feature = "history-binary")]
const BINARY_MAGIC: &[u8; 4] = b"EVOH";

/// On-disk encoding of a history
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryFormat {
    /// JSON format (human-readable, larger)
    #[default]
    Json,
    /// Binary format (compact, fast)
    #[cfg(feature = "history-binary")]
    Binary,
}

#[derive(Serialize)]
#[serde(bound = "")]
struct JsonEnvelope<'a, F: FitnessValue> {
    format: &'static str,
    version: u32,
    history: &'a History<F>,
}

impl<F: FitnessValue> History<F> {
    /// Save to a file
    pub fn save(&self, path: impl AsRef<Path>, format: HistoryFormat) -> Result<(), HistoryError> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);

        match format {
            HistoryFormat::Json => {
                let envelope = JsonEnvelope {
                    format: JSON_FORMAT_MARKER,
                    version: HISTORY_VERSION,
                    history: self,
                };
                serde_json::to_writer_pretty(&mut writer, &envelope)
                    .map_err(|e| HistoryError::Serialization(e.to_string()))?;
            }
            #[cfg(feature = "history-binary")]
            HistoryFormat::Binary => {
                writer.write_all(&HISTORY_VERSION.to_le_bytes())?;
                writer.write_all(BINARY_MAGIC)?;
                bincode::serialize_into(&mut writer, self)
                    .map_err(|e| HistoryError::Serialization(e.to_string()))?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Load a history saved in either format
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Decode a history from the contents of a history file
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HistoryError> {
        if let Some(decoded) = decode_binary(bytes) {
            return decoded;
        }
        Self::from_json_slice(bytes)
    }

    fn from_json_slice(bytes: &[u8]) -> Result<Self, HistoryError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)
            .map_err(|e| HistoryError::InvalidFormat(e.to_string()))?;

        let serde_json::Value::Object(mut fields) = value else {
            return Err(HistoryError::InvalidFormat(
                "expected a JSON object".to_string(),
            ));
        };
        if fields.get("format").and_then(|v| v.as_str()) != Some(JSON_FORMAT_MARKER) {
            return Err(HistoryError::InvalidFormat(format!(
                "missing \"format\": \"{JSON_FORMAT_MARKER}\""
            )));
        }
        let version = fields
            .get("version")
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| HistoryError::InvalidFormat("missing version".to_string()))?;
        if version > HISTORY_VERSION {
            return Err(HistoryError::VersionTooNew(version));
        }
        let history = fields
            .remove("history")
            .ok_or_else(|| HistoryError::InvalidFormat("missing history".to_string()))?;

        serde_json::from_value(history).map_err(|e| HistoryError::Deserialization(e.to_string()))
    }

    /// Write a readable dump of every generation
    pub fn write_text<W: Write>(&self, writer: &mut W) -> Result<(), HistoryError> {
        let banner = "#".repeat(29);
        let rule = "#".repeat(48);
        for (i, (population, best)) in self.populations().iter().zip(self.best()).enumerate() {
            writeln!(writer, "#### Iteration {} {banner}", i + 1)?;
            writeln!(writer)?;
            for (k, chromosome) in population.iter().enumerate() {
                match self.fitness_of(chromosome) {
                    Some(fitness) => {
                        writeln!(writer, "\tIndividual {}: {} -> {:?}", k + 1, chromosome, fitness)?
                    }
                    None => writeln!(writer, "\tIndividual {}: {} -> ?", k + 1, chromosome)?,
                }
            }
            writeln!(writer)?;
            writeln!(writer, "\tBest: {best}")?;
            writeln!(writer)?;
            writeln!(writer, "{rule}")?;
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Write the readable dump to a file
    pub fn export_text(&self, path: impl AsRef<Path>) -> Result<(), HistoryError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_text(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(feature = "history-binary")]
fn decode_binary<F: FitnessValue>(bytes: &[u8]) -> Option<Result<History<F>, HistoryError>> {
    if bytes.len() < 8 || &bytes[4..8] != BINARY_MAGIC {
        return None;
    }
    let version = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if version > HISTORY_VERSION {
        return Some(Err(HistoryError::VersionTooNew(version)));
    }
    Some(
        bincode::deserialize(&bytes[8..])
            .map_err(|e| HistoryError::Deserialization(e.to_string())),
    )
}

#[cfg(not(feature = "history-binary"))]
fn decode_binary<F: FitnessValue>(_bytes: &[u8]) -> Option<Result<History<F>, HistoryError>> {
    None
}
