// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Vector and raster brushes.
//!
//! Brushes are named by URI and looked up globally across both kinds; names
//! are unique. Raster-brush textures come either inline (PNG bytes) or by
//! URI — never both for the same role.

use crate::error::ModelError;

/// Particle rotation mode of a raster brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// The shape is not rotated.
    #[default]
    None,
    /// The shape is rotated randomly before it renders.
    Random,
    /// The shape is rotated to match the path trajectory.
    Trajectory,
}

/// Blend mode applied when a raster brush renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Draw on top of existing content (NORMAL).
    #[default]
    SourceOver,
    /// Draw behind existing content.
    DestinationOver,
    /// Keep existing content where it does not overlap the shape (ERASE).
    DestinationOut,
    /// Add colour values where shapes overlap.
    Lighter,
    /// Only the new shape is shown.
    Copy,
    /// Minimum of both colours.
    Min,
    /// Maximum of both colours.
    Max,
}

impl BlendMode {
    /// The rasterization URI of this blend mode.
    #[must_use]
    pub fn uri(self) -> &'static str {
        match self {
            Self::SourceOver => "will://rasterization/3.0/blend-mode/SourceOver",
            Self::DestinationOver => "will://rasterization/3.0/blend-mode/DestinationOver",
            Self::DestinationOut => "will://rasterization/3.0/blend-mode/DestinationOut",
            Self::Lighter => "will://rasterization/3.0/blend-mode/Lighter",
            Self::Copy => "will://rasterization/3.0/blend-mode/Copy",
            Self::Min => "will://rasterization/3.0/blend-mode/Min",
            Self::Max => "will://rasterization/3.0/blend-mode/Max",
        }
    }
}

/// One vector-brush shape: an inline polygon or a shape URI.
#[derive(Debug, Clone, PartialEq)]
pub enum BrushPrototype {
    /// Inline polygon geometry.
    Polygon {
        /// Minimum brush scale after which this shape applies.
        min_scale: f32,
        /// Polygon points as `(x, y)` pairs (a `z` may follow in `coords_z`).
        points: Vec<(f32, f32)>,
        /// Optional z coordinates, parallel to `points`.
        coords_z: Vec<f32>,
        /// Optional triangulation indices.
        indices: Vec<u32>,
    },
    /// Shape identified by URI.
    Uri {
        /// Minimum brush scale after which this shape applies.
        min_scale: f32,
        /// Shape URI, e.g. `will://brush/3.0/shape/Circle?precision=20`.
        shape_uri: String,
    },
}

/// A brush that renders the spline as a merged sequence of polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorBrush {
    /// Brush name (URI); unique across all brushes of a model.
    pub name: String,
    /// Shape prototypes, picked by brush scale. Polygon and URI prototypes
    /// may coexist within one brush.
    pub prototypes: Vec<BrushPrototype>,
    /// Spacing between consecutive shapes.
    pub spacing: f32,
}

impl VectorBrush {
    /// Builds a vector brush with default spacing 1.
    #[must_use]
    pub fn new(name: &str, prototypes: Vec<BrushPrototype>) -> Self {
        Self {
            name: name.to_string(),
            prototypes,
            spacing: 1.0,
        }
    }
}

/// A texture role of a raster brush: inline PNG bytes or a URI, exclusively.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterTexture {
    /// No texture for this role.
    None,
    /// Inline PNG byte blobs.
    Inline(Vec<Vec<u8>>),
    /// Texture URIs.
    Uris(Vec<String>),
}

impl RasterTexture {
    /// True when no texture is configured for the role.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// A brush that stamps sprite particles along the spline.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBrush {
    /// Brush name (URI); unique across all brushes of a model.
    pub name: String,
    /// Distance between neighbouring particles.
    pub spacing: f32,
    /// Scattering along the curve normal.
    pub scattering: f32,
    /// Particle rotation mode.
    pub rotation: RotationMode,
    /// Shape textures (inline or URIs, exclusively).
    pub shape: RasterTexture,
    /// Fill texture (inline or URI, exclusively; at most one entry).
    pub fill: RasterTexture,
    /// Width of the fill tile.
    pub fill_width: f32,
    /// Height of the fill tile.
    pub fill_height: f32,
    /// Whether the fill pattern is randomly displaced.
    pub randomize_fill: bool,
    /// Blend mode.
    pub blend_mode: BlendMode,
}

impl RasterBrush {
    /// Checks the inline-XOR-URI constraint on both texture roles.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] when a role mixes inline
    /// bytes and URIs. (The [`RasterTexture`] sum type cannot express the
    /// mix itself; decoders call this after assembling from wire fields
    /// where both may be populated.)
    pub fn validate(&self) -> Result<(), ModelError> {
        // The sum type enforces exclusivity; what remains checkable is an
        // empty-but-present texture list, which the wire can produce.
        for (role, texture) in [("shape", &self.shape), ("fill", &self.fill)] {
            match texture {
                RasterTexture::Inline(blobs) if blobs.iter().any(Vec::is_empty) => {
                    return Err(ModelError::InvalidArgument(format!(
                        "raster brush {}: empty inline {role} texture",
                        self.name
                    )));
                }
                RasterTexture::Uris(uris) if uris.iter().any(String::is_empty) => {
                    return Err(ModelError::InvalidArgument(format!(
                        "raster brush {}: empty {role} texture uri",
                        self.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Assembles the shape role from raw wire fields.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] when both inline blobs and
    /// URIs are present.
    pub fn shape_from_wire(
        name: &str,
        inline: Vec<Vec<u8>>,
        uris: Vec<String>,
    ) -> Result<RasterTexture, ModelError> {
        match (inline.is_empty(), uris.is_empty()) {
            (true, true) => Ok(RasterTexture::None),
            (false, true) => Ok(RasterTexture::Inline(inline)),
            (true, false) => Ok(RasterTexture::Uris(uris)),
            (false, false) => Err(ModelError::InvalidArgument(format!(
                "raster brush {name}: shape texture given both inline and by uri"
            ))),
        }
    }

    /// Assembles the fill role from raw wire fields.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] when both an inline blob and
    /// a URI are present.
    pub fn fill_from_wire(
        name: &str,
        inline: Vec<u8>,
        uri: String,
    ) -> Result<RasterTexture, ModelError> {
        match (inline.is_empty(), uri.is_empty()) {
            (true, true) => Ok(RasterTexture::None),
            (false, true) => Ok(RasterTexture::Inline(vec![inline])),
            (true, false) => Ok(RasterTexture::Uris(vec![uri])),
            (false, false) => Err(ModelError::InvalidArgument(format!(
                "raster brush {name}: fill texture given both inline and by uri"
            ))),
        }
    }
}

/// Brush repository of a model, insertion-order preserved per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Brushes {
    vector_brushes: Vec<VectorBrush>,
    raster_brushes: Vec<RasterBrush>,
}

impl Brushes {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Vector brushes in insertion order.
    #[must_use]
    pub fn vector_brushes(&self) -> &[VectorBrush] {
        &self.vector_brushes
    }

    /// Raster brushes in insertion order.
    #[must_use]
    pub fn raster_brushes(&self) -> &[RasterBrush] {
        &self.raster_brushes
    }

    /// True when no brush of either kind is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vector_brushes.is_empty() && self.raster_brushes.is_empty()
    }

    fn name_taken(&self, name: &str) -> bool {
        self.vector_brushes.iter().any(|b| b.name == name)
            || self.raster_brushes.iter().any(|b| b.name == name)
    }

    /// Adds a vector brush.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] when the name is already
    /// taken by any brush.
    pub fn add_vector_brush(&mut self, brush: VectorBrush) -> Result<(), ModelError> {
        if self.name_taken(&brush.name) {
            return Err(ModelError::InvalidArgument(format!(
                "brush name {} already registered",
                brush.name
            )));
        }
        self.vector_brushes.push(brush);
        Ok(())
    }

    /// Adds a raster brush after validating its texture roles.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] when the name is already
    /// taken or the textures are malformed.
    pub fn add_raster_brush(&mut self, brush: RasterBrush) -> Result<(), ModelError> {
        brush.validate()?;
        if self.name_taken(&brush.name) {
            return Err(ModelError::InvalidArgument(format!(
                "brush name {} already registered",
                brush.name
            )));
        }
        self.raster_brushes.push(brush);
        Ok(())
    }

    /// Removes a vector brush by name. Unknown names are a documented no-op.
    pub fn remove_vector_brush(&mut self, name: &str) {
        self.vector_brushes.retain(|b| b.name != name);
    }

    /// Removes a raster brush by name. Unknown names are a documented no-op.
    pub fn remove_raster_brush(&mut self, name: &str) {
        self.raster_brushes.retain(|b| b.name != name);
    }

    /// Looks up a vector brush by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn vector_brush(&self, name: &str) -> Result<&VectorBrush, ModelError> {
        self.vector_brushes
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| ModelError::NotFound {
                kind: "vector brush",
                id: name.to_string(),
            })
    }

    /// Looks up a raster brush by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn raster_brush(&self, name: &str) -> Result<&RasterBrush, ModelError> {
        self.raster_brushes
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| ModelError::NotFound {
                kind: "raster brush",
                id: name.to_string(),
            })
    }

    /// True when a brush of either kind carries the name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.name_taken(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(name: &str) -> RasterBrush {
        RasterBrush {
            name: name.to_string(),
            spacing: 10.0,
            scattering: 5.0,
            rotation: RotationMode::Trajectory,
            shape: RasterTexture::Inline(vec![vec![10, 20], vec![30, 20]]),
            fill: RasterTexture::None,
            fill_width: 2.0,
            fill_height: 0.3,
            randomize_fill: false,
            blend_mode: BlendMode::SourceOver,
        }
    }

    #[test]
    fn names_are_unique_across_kinds() {
        let mut brushes = Brushes::new();
        brushes
            .add_vector_brush(VectorBrush::new("app://test/brush/A", vec![]))
            .unwrap();
        assert!(brushes.add_raster_brush(raster("app://test/brush/A")).is_err());
    }

    #[test]
    fn mixed_inline_and_uri_shape_is_rejected() {
        let err = RasterBrush::shape_from_wire(
            "b",
            vec![vec![1, 2]],
            vec!["app://tex".to_string()],
        );
        assert!(err.is_err());
    }

    #[test]
    fn remove_unknown_brush_is_a_noop() {
        let mut brushes = Brushes::new();
        brushes
            .add_vector_brush(VectorBrush::new("app://test/brush/A", vec![]))
            .unwrap();
        brushes.remove_vector_brush("app://test/brush/unknown");
        brushes.remove_raster_brush("app://test/brush/unknown");
        assert_eq!(brushes.vector_brushes().len(), 1);
        // while a lookup for the same name fails loudly
        assert!(brushes.vector_brush("app://test/brush/unknown").is_err());
    }

    #[test]
    fn lookup_spans_both_kinds() {
        let mut brushes = Brushes::new();
        brushes.add_raster_brush(raster("app://test/brush/R")).unwrap();
        assert!(brushes.contains("app://test/brush/R"));
        assert!(brushes.raster_brush("app://test/brush/R").is_ok());
        assert!(brushes.vector_brush("app://test/brush/R").is_err());
    }
}
