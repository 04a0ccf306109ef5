use crate::attribute::AttributeKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MeshError>;

#[derive(Error, Debug)]
pub enum MeshError {
  #[error("invalid {attribute} attribute: {reason}")]
  InvalidAttribute {
    attribute: AttributeKind,
    reason: String,
  },

  #[error(
    "face {face} corner {corner} references {attribute} sample {index} \
     but the stream only has {len}"
  )]
  IndexOutOfRange {
    attribute: AttributeKind,
    face: usize,
    corner: usize,
    index: u32,
    len: usize,
  },

  #[error("face {face} is degenerate: {reason}")]
  DegenerateFace { face: usize, reason: String },

  #[error(
    "edge {origin} -> {destination} of face {face} is already used by \
     another face in the same direction"
  )]
  NonManifoldEdge {
    origin: u32,
    destination: u32,
    face: usize,
  },

  #[error("face {face} corner {corner} has no {attribute} stream to read")]
  MissingAttribute {
    attribute: AttributeKind,
    face: usize,
    corner: usize,
  },

  #[error("mesh has no faces")]
  EmptyMesh,

  #[error("unknown attribute name {0:?}")]
  UnknownAttribute(String),

  #[error("failed to load model: {0}")]
  Load(#[from] tobj::LoadError),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl MeshError {
  pub(crate) fn invalid_attribute<S: Into<String>>(
    attribute: AttributeKind,
    reason: S,
  ) -> Self {
    MeshError::InvalidAttribute {
      attribute,
      reason: reason.into(),
    }
  }
}
