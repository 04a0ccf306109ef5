use crate::attribute::AttributeKind;
use crate::data_structure::Vector3;
use crate::error::{MeshError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjConfig {
  /// Pad positions and normals to four components with `w = 1`.
  pub homogeneous: bool,
  /// 2, or 3 to pad texture coordinates with a zero `w`.
  pub texcoord_dimension: usize,
}

impl Default for ObjConfig {
  fn default() -> Self {
    ObjConfig {
      homogeneous: false,
      texcoord_dimension: 2,
    }
  }
}

impl ObjConfig {
  pub fn validate(&self) -> Result<()> {
    match self.texcoord_dimension {
      2 | 3 => Ok(()),
      other => Err(MeshError::invalid_attribute(
        AttributeKind::TexCoord,
        format!("texcoord dimension {other} is not 2 or 3"),
      )),
    }
  }

  pub(crate) fn position_dimension(&self) -> usize {
    if self.homogeneous {
      4
    } else {
      3
    }
  }

  pub(crate) fn normal_dimension(&self) -> usize {
    self.position_dimension()
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SilhouetteConfig {
  /// Direction pointing from the surface toward the viewer.
  pub view: Vector3,
  /// Vertices whose normal makes a smaller cosine with `view` face away.
  pub cos_threshold: f32,
}

impl Default for SilhouetteConfig {
  fn default() -> Self {
    SilhouetteConfig {
      view: Vector3::new(0.0, 0.0, 1.0),
      cos_threshold: 0.5,
    }
  }
}
