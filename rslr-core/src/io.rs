//! Reading and writing fields as JSON documents
//!
//! A field file is a self-describing JSON object:
//!
//! ```json
//! {
//!   "name": "temperature",
//!   "units": "K",
//!   "dims": ["model", "time"],
//!   "shape": [2, 3],
//!   "data": [0.1, 0.2, 0.3, 0.2, null, 0.4],
//!   "time": {"values": ["2006-07-02T12:00:00", "..."], "bounds": [["2006-01-01T00:00:00", "2007-01-01T00:00:00"], "..."]},
//!   "models": ["model-a", "model-b"]
//! }
//! ```
//!
//! `data` is stored in row-major order. `null` marks a missing value, which is held as NaN
//! once the file is read.

use crate::errors::{RSLRError, RSLRResult};
use crate::field::{AxisKind, Field};
use crate::timeseries::{FloatValue, TimeAxis};
use log::debug;
use ndarray::{ArrayD, IxDyn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// On-disk representation of a [`Field`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldFile {
    pub name: String,
    #[serde(default = "default_units")]
    pub units: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    pub dims: Vec<AxisKind>,
    pub shape: Vec<usize>,
    pub data: Vec<Option<FloatValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeAxis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<String>>,
}

fn default_units() -> String {
    "1".to_string()
}

impl FieldFile {
    pub fn from_field(field: &Field) -> Self {
        let data = field
            .data()
            .as_standard_layout()
            .iter()
            .map(|v| if v.is_nan() { None } else { Some(*v) })
            .collect();
        Self {
            name: field.name().to_string(),
            units: field.units().to_string(),
            standard_name: None,
            long_name: None,
            dims: field.axes().to_vec(),
            shape: field.shape().to_vec(),
            data,
            time: field.time().cloned(),
            models: field.models().map(|m| m.to_vec()),
        }
    }

    pub fn into_field(self) -> RSLRResult<Field> {
        let values: Vec<FloatValue> = self
            .data
            .into_iter()
            .map(|v| v.unwrap_or(FloatValue::NAN))
            .collect();
        let found = values.len();
        let data = ArrayD::from_shape_vec(IxDyn(&self.shape), values).map_err(|_| {
            RSLRError::ShapeMismatch {
                what: format!("data of field {}", self.name),
                expected: self.shape.clone(),
                found: vec![found],
            }
        })?;
        let field = Field::new(self.name, self.units, self.dims, data, self.time)?;
        match self.models {
            Some(models) => field.with_models(models),
            None => Ok(field),
        }
    }
}

/// Read and deserialise a JSON document
pub fn read_json<T: DeserializeOwned>(path: &Path) -> RSLRResult<T> {
    let file = File::open(path).map_err(|source| RSLRError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| RSLRError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialise a value and write it as a JSON document
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> RSLRResult<()> {
    let io_error = |source: std::io::Error| RSLRError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|source| RSLRError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(io_error)
}

/// Read a field from a JSON field file
pub fn read_field(path: &Path) -> RSLRResult<Field> {
    if !path.is_file() {
        return Err(RSLRError::MissingInput(path.to_path_buf()));
    }
    let file: FieldFile = read_json(path)?;
    let field = file.into_field().map_err(|e| match e {
        RSLRError::Validation(msg) => {
            RSLRError::Validation(format!("{} in file {}", msg, path.display()))
        }
        e => e,
    })?;
    debug!("read field {} {:?} from {}", field.name(), field.shape(), path.display());
    Ok(field)
}

/// Write a field to a JSON field file
pub fn write_field(path: &Path, field: &Field) -> RSLRResult<()> {
    write_json(path, &FieldFile::from_field(field))?;
    debug!("wrote field {} {:?} to {}", field.name(), field.shape(), path.display());
    Ok(())
}
