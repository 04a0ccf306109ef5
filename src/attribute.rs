use crate::error::{MeshError, Result};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The closed set of vertex attributes a mesh can carry. Declaration order
/// is the order attribute values are concatenated in a welded vertex key.
#[derive(
  Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
  Position,
  Normal,
  TexCoord,
}

impl AttributeKind {
  pub const COUNT: usize = 3;

  pub const ALL: [AttributeKind; AttributeKind::COUNT] = [
    AttributeKind::Position,
    AttributeKind::Normal,
    AttributeKind::TexCoord,
  ];

  pub fn name(self) -> &'static str {
    match self {
      AttributeKind::Position => "position",
      AttributeKind::Normal => "normal",
      AttributeKind::TexCoord => "texcoord",
    }
  }

  pub(crate) fn slot(self) -> usize {
    self as usize
  }
}

impl fmt::Display for AttributeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for AttributeKind {
  type Err = MeshError;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "position" => Ok(AttributeKind::Position),
      "normal" => Ok(AttributeKind::Normal),
      "texcoord" | "texCoord" => Ok(AttributeKind::TexCoord),
      other => Err(MeshError::UnknownAttribute(other.to_string())),
    }
  }
}

/// One attribute's samples, stored flat: `values.len() == dimension * len()`.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeStream {
  dimension: usize,
  values: Vec<f32>,
}

impl AttributeStream {
  pub fn new(
    kind: AttributeKind,
    values: Vec<f32>,
    dimension: usize,
  ) -> Result<Self> {
    if dimension == 0 {
      return Err(MeshError::invalid_attribute(
        kind,
        "dimension must be positive",
      ));
    }

    if values.len() % dimension != 0 {
      return Err(MeshError::invalid_attribute(
        kind,
        format!(
          "{} values is not a multiple of dimension {}",
          values.len(),
          dimension
        ),
      ));
    }

    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
      return Err(MeshError::invalid_attribute(
        kind,
        format!("value {} at offset {} is not a number", values[pos], pos),
      ));
    }

    Ok(AttributeStream { dimension, values })
  }

  pub fn dimension(&self) -> usize {
    self.dimension
  }

  pub fn values(&self) -> &[f32] {
    &self.values
  }

  /// Number of samples, not values.
  pub fn len(&self) -> usize {
    self.values.len() / self.dimension
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn sample(&self, idx: u32) -> Option<&[f32]> {
    let start = (idx as usize).checked_mul(self.dimension)?;
    self.values.get(start..start + self.dimension)
  }
}

/// Registered streams keyed by kind. Registering a kind twice replaces the
/// earlier stream; callers that want to accumulate merge before registering.
#[derive(Clone, Debug, Default)]
pub struct AttributeTable {
  streams: BTreeMap<AttributeKind, AttributeStream>,
}

impl AttributeTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(
    &mut self,
    kind: AttributeKind,
    values: Vec<f32>,
    dimension: usize,
  ) -> Result<()> {
    let stream = AttributeStream::new(kind, values, dimension)?;
    self.streams.insert(kind, stream);
    Ok(())
  }

  pub fn get(&self, kind: AttributeKind) -> Option<&AttributeStream> {
    self.streams.get(&kind)
  }

  pub fn contains(&self, kind: AttributeKind) -> bool {
    self.streams.contains_key(&kind)
  }

  pub fn kinds(&self) -> impl Iterator<Item = AttributeKind> + '_ {
    self.streams.keys().copied()
  }
}
