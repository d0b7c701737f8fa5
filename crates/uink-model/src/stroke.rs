// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Stroke geometry: splines, styles, and per-point attributes.
//!
//! A stroke's geometry is a Catmull-Rom spline carried as per-sample
//! attribute channels. On construction the packed [`Spline`] array is
//! unzipped into one vector per attribute selected by the layout mask;
//! colour channels are stored as bytes (the on-disk form) and surfaced as
//! floats in `[0, 1]`.

use crate::error::ModelError;
use crate::ident::{HashBuilder, UimId};
use crate::input::SensorType;
use crate::precision::PrecisionScheme;
use crate::tree::BoundingBox;

/// URI of the default render mode (source-over blending).
pub const DEFAULT_RENDER_MODE_URI: &str = "will://rasterization/3.0/blend-mode/SourceOver";

/// Bitmask selecting which per-sample attributes a spline stores.
///
/// Seventeen attribute bits; the packed value array interleaves the selected
/// attributes per sample, so the stride equals the mask's popcount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutMask(u32);

impl LayoutMask {
    /// X coordinate.
    pub const X: u32 = 0x1;
    /// Y coordinate.
    pub const Y: u32 = 0x2;
    /// Z coordinate.
    pub const Z: u32 = 0x4;
    /// Brush size.
    pub const SIZE: u32 = 0x8;
    /// Brush rotation.
    pub const ROTATION: u32 = 0x10;
    /// Red colour component.
    pub const RED: u32 = 0x20;
    /// Green colour component.
    pub const GREEN: u32 = 0x40;
    /// Blue colour component.
    pub const BLUE: u32 = 0x80;
    /// Alpha colour component.
    pub const ALPHA: u32 = 0x100;
    /// Brush scale X.
    pub const SCALE_X: u32 = 0x200;
    /// Brush scale Y.
    pub const SCALE_Y: u32 = 0x400;
    /// Brush scale Z.
    pub const SCALE_Z: u32 = 0x800;
    /// Brush offset X.
    pub const OFFSET_X: u32 = 0x1000;
    /// Brush offset Y.
    pub const OFFSET_Y: u32 = 0x2000;
    /// Brush offset Z.
    pub const OFFSET_Z: u32 = 0x4000;
    /// Path tangent X.
    pub const TANGENT_X: u32 = 0x8000;
    /// Path tangent Y.
    pub const TANGENT_Y: u32 = 0x10000;

    /// All seventeen attribute bits.
    pub const ALL: u32 = 0x1ffff;

    /// Wraps a raw bit set (unknown bits are kept but never populated).
    #[must_use]
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// The raw bit set.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// True when `bit` is selected.
    #[must_use]
    pub fn contains(self, bit: u32) -> bool {
        self.0 & bit != 0
    }

    /// Number of attributes per sample.
    #[must_use]
    pub fn stride(self) -> usize {
        (self.0 & Self::ALL).count_ones() as usize
    }

    /// Offset of `bit` within one sample: the popcount of selected bits
    /// below it.
    #[must_use]
    pub fn offset_of(self, bit: u32) -> Option<usize> {
        if !self.contains(bit) {
            return None;
        }
        Some((self.0 & Self::ALL & (bit - 1)).count_ones() as usize)
    }
}

/// Converts a colour float in `[0, 1]` to its on-disk byte.
///
/// Round-half-to-even, saturating into `0..=255`.
#[must_use]
pub fn color_float_to_byte(v: f32) -> u8 {
    let scaled = (v * 255.0).round_ties_even();
    if scaled <= 0.0 {
        0
    } else if scaled >= 255.0 {
        255
    } else {
        scaled as u8
    }
}

/// Converts an on-disk colour byte to the surfaced float in `[0, 1]`.
#[must_use]
pub fn color_byte_to_float(v: u8) -> f32 {
    f32::from(v) / 255.0
}

/// Constant per-point values of a style: size, colour, and the transform
/// components a brush applies at every point.
///
/// Content-addressed; colour and size live in `[0, 1]`, transform
/// components are free-range.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPointProperties {
    id: UimId,
    /// Brush size.
    pub size: f32,
    /// Red component.
    pub red: f32,
    /// Green component.
    pub green: f32,
    /// Blue component.
    pub blue: f32,
    /// Alpha component.
    pub alpha: f32,
    /// Brush rotation.
    pub rotation: f32,
    /// Brush scale X.
    pub scale_x: f32,
    /// Brush scale Y.
    pub scale_y: f32,
    /// Brush scale Z.
    pub scale_z: f32,
    /// Brush offset X.
    pub offset_x: f32,
    /// Brush offset Y.
    pub offset_y: f32,
    /// Brush offset Z.
    pub offset_z: f32,
}

impl Default for PathPointProperties {
    fn default() -> Self {
        let mut p = Self {
            id: UimId::Hashed(0),
            size: 0.0,
            red: 0.0,
            green: 0.0,
            blue: 0.0,
            alpha: 0.0,
            rotation: 0.0,
            scale_x: 0.0,
            scale_y: 0.0,
            scale_z: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
            offset_z: 0.0,
        };
        p.regenerate_id();
        p
    }
}

impl PathPointProperties {
    /// Builds properties from their twelve components and derives the id.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_components(
        size: f32,
        red: f32,
        green: f32,
        blue: f32,
        alpha: f32,
        rotation: f32,
        scale_x: f32,
        scale_y: f32,
        scale_z: f32,
        offset_x: f32,
        offset_y: f32,
        offset_z: f32,
    ) -> Self {
        let mut p = Self {
            size,
            red,
            green,
            blue,
            alpha,
            rotation,
            scale_x,
            scale_y,
            scale_z,
            offset_x,
            offset_y,
            offset_z,
            ..Self::default()
        };
        p.regenerate_id();
        p
    }

    /// Content-addressed identifier (call [`regenerate_id`] after edits).
    ///
    /// [`regenerate_id`]: PathPointProperties::regenerate_id
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// Recomputes the content id from the current components.
    pub fn regenerate_id(&mut self) {
        self.id = self.compute_id();
    }

    /// The id the current components hash to.
    #[must_use]
    pub fn compute_id(&self) -> UimId {
        let mut h = HashBuilder::new("PathPointProperties");
        for v in [
            self.size,
            self.red,
            self.green,
            self.blue,
            self.alpha,
            self.rotation,
            self.scale_x,
            self.scale_y,
            self.scale_z,
            self.offset_x,
            self.offset_y,
            self.offset_z,
        ] {
            h.float(f64::from(v));
        }
        h.finish()
    }
}

/// Rendering configuration of a stroke: constant point properties, the
/// brush to rasterize with, and the blend/render mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Constant per-point values.
    pub properties: PathPointProperties,
    /// Name (URI) of the brush used for rasterization.
    pub brush_uri: Option<String>,
    /// Seed for particle strokes.
    pub particles_random_seed: u32,
    /// Render-mode URI; defaults to source-over.
    pub render_mode_uri: String,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            properties: PathPointProperties::default(),
            brush_uri: None,
            particles_random_seed: 0,
            render_mode_uri: DEFAULT_RENDER_MODE_URI.to_string(),
        }
    }
}

impl Style {
    /// Style referencing a brush by name, otherwise defaults.
    #[must_use]
    pub fn with_brush(brush_uri: &str) -> Self {
        Self {
            brush_uri: Some(brush_uri.to_string()),
            ..Self::default()
        }
    }
}

/// A packed Catmull-Rom spline: per-sample values strided by the layout
/// mask's popcount, plus the active parameter subrange `[ts, tf]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    /// Attribute selection.
    pub layout_mask: LayoutMask,
    /// Packed values, length = stride × sample count.
    pub data: Vec<f32>,
    /// Start parameter of the first segment, in `[0, 1]`.
    pub ts: f32,
    /// Final parameter of the last segment, in `[0, 1]`.
    pub tf: f32,
}

impl Spline {
    /// Builds a spline covering the full `[0, 1]` parameter range.
    #[must_use]
    pub fn new(layout_mask: LayoutMask, data: Vec<f32>) -> Self {
        Self {
            layout_mask,
            data,
            ts: 0.0,
            tf: 1.0,
        }
    }
}

/// Per-sample attribute kinds addressable in strided exports.
///
/// Spline attributes come from the stroke's own channels; sensor attributes
/// come from the referenced sensor frame through the stroke's mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeAttribute {
    /// Spline X coordinate.
    SplineX,
    /// Spline Y coordinate.
    SplineY,
    /// Spline Z coordinate.
    SplineZ,
    /// Per-point size.
    Size,
    /// Per-point rotation.
    Rotation,
    /// Per-point red, surfaced in `[0, 1]`.
    Red,
    /// Per-point green, surfaced in `[0, 1]`.
    Green,
    /// Per-point blue, surfaced in `[0, 1]`.
    Blue,
    /// Per-point alpha, surfaced in `[0, 1]`.
    Alpha,
    /// Per-point scale X.
    ScaleX,
    /// Per-point scale Y.
    ScaleY,
    /// Per-point scale Z.
    ScaleZ,
    /// Per-point offset X.
    OffsetX,
    /// Per-point offset Y.
    OffsetY,
    /// Per-point offset Z.
    OffsetZ,
    /// Sensor timestamp (milliseconds).
    SensorTimestamp,
    /// Sensor pressure.
    SensorPressure,
    /// Sensor altitude (pitch).
    SensorAltitude,
    /// Sensor azimuth (yaw).
    SensorAzimuth,
    /// Sensor touch radius X.
    SensorRadiusX,
    /// Sensor touch radius Y.
    SensorRadiusY,
    /// Sensor pen-axis rotation.
    SensorRotation,
}

impl StrokeAttribute {
    /// The sensor channel type backing a sensor-plane attribute.
    #[must_use]
    pub fn sensor_type(self) -> Option<SensorType> {
        match self {
            Self::SensorTimestamp => Some(SensorType::Timestamp),
            Self::SensorPressure => Some(SensorType::Pressure),
            Self::SensorAltitude => Some(SensorType::Altitude),
            Self::SensorAzimuth => Some(SensorType::Azimuth),
            Self::SensorRadiusX => Some(SensorType::RadiusX),
            Self::SensorRadiusY => Some(SensorType::RadiusY),
            Self::SensorRotation => Some(SensorType::Rotation),
            _ => None,
        }
    }

    /// True for attributes served by the stroke's own spline channels.
    #[must_use]
    pub fn is_spline(self) -> bool {
        self.sensor_type().is_none()
    }
}

/// Policy for attributes a stroke cannot provide during strided export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingDataPolicy {
    /// Substitute `0.0`.
    #[default]
    FillWithZeros,
    /// Substitute `NaN`.
    FillWithNan,
    /// Drop the stroke from the export.
    SkipStroke,
    /// Fail the export.
    Throw,
}

/// Stroke geometry plus its rendering and provenance references.
///
/// Channel vectors are parallel: every populated channel has `point_count`
/// entries. The layout mask is recomputed from which channels are populated.
///
/// Equality is logical: `properties_index` is a serialization detail (the
/// palette slot the style landed in) and does not participate.
#[derive(Debug, Clone, Default)]
pub struct Stroke {
    id: u128,
    /// Start parameter of the first Catmull-Rom segment.
    pub start_parameter: f32,
    /// Final parameter of the last Catmull-Rom segment.
    pub end_parameter: f32,
    /// Spline X channel.
    pub spline_x: Vec<f32>,
    /// Spline Y channel.
    pub spline_y: Vec<f32>,
    /// Spline Z channel.
    pub spline_z: Vec<f32>,
    /// Per-point sizes.
    pub sizes: Vec<f32>,
    /// Per-point rotations.
    pub rotations: Vec<f32>,
    /// Red bytes (on-disk form).
    pub red: Vec<u8>,
    /// Green bytes (on-disk form).
    pub green: Vec<u8>,
    /// Blue bytes (on-disk form).
    pub blue: Vec<u8>,
    /// Alpha bytes (on-disk form).
    pub alpha: Vec<u8>,
    /// Per-point scale X.
    pub scales_x: Vec<f32>,
    /// Per-point scale Y.
    pub scales_y: Vec<f32>,
    /// Per-point scale Z.
    pub scales_z: Vec<f32>,
    /// Per-point offset X.
    pub offsets_x: Vec<f32>,
    /// Per-point offset Y.
    pub offsets_y: Vec<f32>,
    /// Per-point offset Z.
    pub offsets_z: Vec<f32>,
    /// Per-point tangent X.
    pub tangents_x: Vec<f32>,
    /// Per-point tangent Y.
    pub tangents_y: Vec<f32>,
    /// Referenced sensor frame, when raw data exists.
    pub sensor_data_id: Option<UimId>,
    /// Index shift between spline points and sensor samples.
    pub sensor_data_offset: u32,
    /// Explicit spline-to-sensor index mapping (empty means 1:1).
    pub sensor_data_mapping: Vec<u32>,
    /// Seed for randomly generated attributes.
    pub random_seed: u32,
    /// Index into the serialized path-point-properties palette.
    pub properties_index: u32,
    /// Rendering configuration.
    pub style: Style,
    /// Fixed-point wire coding scheme; `None` round-trips floats.
    pub precision_scheme: Option<PrecisionScheme>,
}

impl PartialEq for Stroke {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.start_parameter == other.start_parameter
            && self.end_parameter == other.end_parameter
            && self.spline_x == other.spline_x
            && self.spline_y == other.spline_y
            && self.spline_z == other.spline_z
            && self.sizes == other.sizes
            && self.rotations == other.rotations
            && self.red == other.red
            && self.green == other.green
            && self.blue == other.blue
            && self.alpha == other.alpha
            && self.scales_x == other.scales_x
            && self.scales_y == other.scales_y
            && self.scales_z == other.scales_z
            && self.offsets_x == other.offsets_x
            && self.offsets_y == other.offsets_y
            && self.offsets_z == other.offsets_z
            && self.tangents_x == other.tangents_x
            && self.tangents_y == other.tangents_y
            && self.sensor_data_id == other.sensor_data_id
            && self.sensor_data_offset == other.sensor_data_offset
            && self.sensor_data_mapping == other.sensor_data_mapping
            && self.random_seed == other.random_seed
            && self.style == other.style
            && self.precision_scheme == other.precision_scheme
    }
}

impl Stroke {
    /// Creates an empty stroke with a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: UimId::random().value(),
            end_parameter: 1.0,
            ..Self::default()
        }
    }

    /// Creates a stroke from a packed spline and a style.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] when the packed array length
    /// is not a multiple of the layout stride, or the stride is zero.
    pub fn from_spline(spline: &Spline, style: Style) -> Result<Self, ModelError> {
        let mut stroke = Self::new();
        stroke.style = style;
        stroke.import_spline(spline)?;
        Ok(stroke)
    }

    /// Rebuilds a stroke with a known id (decoder path).
    #[must_use]
    pub fn with_id(id: UimId) -> Self {
        Self {
            id: id.value(),
            ..Self::default()
        }
    }

    /// Stroke identifier (random kind).
    #[must_use]
    pub fn id(&self) -> UimId {
        UimId::Random(self.id)
    }

    /// Unpacks a spline into the per-attribute channels.
    ///
    /// Colour values arrive as floats in `[0, 1]` and are stored as bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] on a stride mismatch.
    pub fn import_spline(&mut self, spline: &Spline) -> Result<(), ModelError> {
        let stride = spline.layout_mask.stride();
        if stride == 0 {
            return Err(ModelError::InvalidArgument(
                "spline layout mask selects no attributes".to_string(),
            ));
        }
        if spline.data.len() % stride != 0 {
            return Err(ModelError::InvalidArgument(format!(
                "packed spline length {} is not a multiple of stride {stride}",
                spline.data.len()
            )));
        }
        self.start_parameter = spline.ts;
        self.end_parameter = spline.tf;
        let mask = spline.layout_mask;
        for sample in spline.data.chunks_exact(stride) {
            let mut cursor = 0usize;
            let mut next = || {
                let v = sample[cursor];
                cursor += 1;
                v
            };
            if mask.contains(LayoutMask::X) {
                self.spline_x.push(next());
            }
            if mask.contains(LayoutMask::Y) {
                self.spline_y.push(next());
            }
            if mask.contains(LayoutMask::Z) {
                self.spline_z.push(next());
            }
            if mask.contains(LayoutMask::SIZE) {
                self.sizes.push(next());
            }
            if mask.contains(LayoutMask::ROTATION) {
                self.rotations.push(next());
            }
            if mask.contains(LayoutMask::RED) {
                self.red.push(color_float_to_byte(next()));
            }
            if mask.contains(LayoutMask::GREEN) {
                self.green.push(color_float_to_byte(next()));
            }
            if mask.contains(LayoutMask::BLUE) {
                self.blue.push(color_float_to_byte(next()));
            }
            if mask.contains(LayoutMask::ALPHA) {
                self.alpha.push(color_float_to_byte(next()));
            }
            if mask.contains(LayoutMask::SCALE_X) {
                self.scales_x.push(next());
            }
            if mask.contains(LayoutMask::SCALE_Y) {
                self.scales_y.push(next());
            }
            if mask.contains(LayoutMask::SCALE_Z) {
                self.scales_z.push(next());
            }
            if mask.contains(LayoutMask::OFFSET_X) {
                self.offsets_x.push(next());
            }
            if mask.contains(LayoutMask::OFFSET_Y) {
                self.offsets_y.push(next());
            }
            if mask.contains(LayoutMask::OFFSET_Z) {
                self.offsets_z.push(next());
            }
            if mask.contains(LayoutMask::TANGENT_X) {
                self.tangents_x.push(next());
            }
            if mask.contains(LayoutMask::TANGENT_Y) {
                self.tangents_y.push(next());
            }
        }
        Ok(())
    }

    /// Layout mask recomputed from the populated channels.
    #[must_use]
    pub fn layout_mask(&self) -> LayoutMask {
        let mut bits = 0u32;
        let set = |cond: bool, bit: u32| if cond { bit } else { 0 };
        bits |= set(!self.spline_x.is_empty(), LayoutMask::X);
        bits |= set(!self.spline_y.is_empty(), LayoutMask::Y);
        bits |= set(!self.spline_z.is_empty(), LayoutMask::Z);
        bits |= set(!self.sizes.is_empty(), LayoutMask::SIZE);
        bits |= set(!self.rotations.is_empty(), LayoutMask::ROTATION);
        bits |= set(!self.red.is_empty(), LayoutMask::RED);
        bits |= set(!self.green.is_empty(), LayoutMask::GREEN);
        bits |= set(!self.blue.is_empty(), LayoutMask::BLUE);
        bits |= set(!self.alpha.is_empty(), LayoutMask::ALPHA);
        bits |= set(!self.scales_x.is_empty(), LayoutMask::SCALE_X);
        bits |= set(!self.scales_y.is_empty(), LayoutMask::SCALE_Y);
        bits |= set(!self.scales_z.is_empty(), LayoutMask::SCALE_Z);
        bits |= set(!self.offsets_x.is_empty(), LayoutMask::OFFSET_X);
        bits |= set(!self.offsets_y.is_empty(), LayoutMask::OFFSET_Y);
        bits |= set(!self.offsets_z.is_empty(), LayoutMask::OFFSET_Z);
        bits |= set(!self.tangents_x.is_empty(), LayoutMask::TANGENT_X);
        bits |= set(!self.tangents_y.is_empty(), LayoutMask::TANGENT_Y);
        LayoutMask::from_bits(bits)
    }

    /// Number of spline sample points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.spline_x.len()
    }

    /// Value of a spline-plane attribute at `index`, colours as floats.
    ///
    /// `None` when the channel is absent or the index is past the end.
    #[must_use]
    pub fn spline_value(&self, attribute: StrokeAttribute, index: usize) -> Option<f64> {
        let float = |channel: &[f32]| channel.get(index).copied().map(f64::from);
        let byte = |channel: &[u8]| {
            channel
                .get(index)
                .copied()
                .map(|b| f64::from(color_byte_to_float(b)))
        };
        match attribute {
            StrokeAttribute::SplineX => float(&self.spline_x),
            StrokeAttribute::SplineY => float(&self.spline_y),
            StrokeAttribute::SplineZ => float(&self.spline_z),
            StrokeAttribute::Size => float(&self.sizes),
            StrokeAttribute::Rotation => float(&self.rotations),
            StrokeAttribute::Red => byte(&self.red),
            StrokeAttribute::Green => byte(&self.green),
            StrokeAttribute::Blue => byte(&self.blue),
            StrokeAttribute::Alpha => byte(&self.alpha),
            StrokeAttribute::ScaleX => float(&self.scales_x),
            StrokeAttribute::ScaleY => float(&self.scales_y),
            StrokeAttribute::ScaleZ => float(&self.scales_z),
            StrokeAttribute::OffsetX => float(&self.offsets_x),
            StrokeAttribute::OffsetY => float(&self.offsets_y),
            StrokeAttribute::OffsetZ => float(&self.offsets_z),
            _ => None,
        }
    }

    /// Bounding box of the X/Y channels.
    ///
    /// `None` for a stroke without X/Y samples.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.spline_x.is_empty() || self.spline_y.is_empty() {
            return None;
        }
        let fold = |values: &[f32]| {
            values.iter().fold((f32::MAX, f32::MIN), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
        };
        let (x_min, x_max) = fold(&self.spline_x);
        let (y_min, y_max) = fold(&self.spline_y);
        Some(BoundingBox::new(
            f64::from(x_min),
            f64::from(y_min),
            f64::from(x_max - x_min),
            f64::from(y_max - y_min),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_popcount() {
        let mask = LayoutMask::from_bits(LayoutMask::X | LayoutMask::Y | LayoutMask::SIZE);
        assert_eq!(mask.stride(), 3);
        assert_eq!(mask.offset_of(LayoutMask::X), Some(0));
        assert_eq!(mask.offset_of(LayoutMask::SIZE), Some(2));
        assert_eq!(mask.offset_of(LayoutMask::ALPHA), None);
    }

    #[test]
    fn spline_unpacks_by_mask_order() {
        let mask = LayoutMask::from_bits(LayoutMask::X | LayoutMask::Y | LayoutMask::SIZE);
        let spline = Spline::new(
            mask,
            vec![10.0, 10.0, 1.0, 20.0, 10.0, 1.0, 20.0, 20.0, 1.0],
        );
        let stroke = Stroke::from_spline(&spline, Style::default()).unwrap();
        assert_eq!(stroke.point_count(), 3);
        assert_eq!(stroke.spline_x, vec![10.0, 20.0, 20.0]);
        assert_eq!(stroke.spline_y, vec![10.0, 10.0, 20.0]);
        assert_eq!(stroke.sizes, vec![1.0, 1.0, 1.0]);
        assert_eq!(stroke.layout_mask(), mask);
    }

    #[test]
    fn bad_stride_is_rejected() {
        let mask = LayoutMask::from_bits(LayoutMask::X | LayoutMask::Y);
        let spline = Spline::new(mask, vec![1.0, 2.0, 3.0]);
        assert!(Stroke::from_spline(&spline, Style::default()).is_err());
    }

    #[test]
    fn colours_convert_to_bytes_and_back() {
        let mask = LayoutMask::from_bits(LayoutMask::X | LayoutMask::Y | LayoutMask::RED);
        let spline = Spline::new(mask, vec![0.0, 0.0, 0.5, 1.0, 1.0, 1.0]);
        let stroke = Stroke::from_spline(&spline, Style::default()).unwrap();
        assert_eq!(stroke.red, vec![128, 255]);
        let got = stroke.spline_value(StrokeAttribute::Red, 0).unwrap();
        assert!((got - f64::from(128.0f32 / 255.0)).abs() < 1e-9);
    }

    #[test]
    fn rounding_is_half_to_even_and_saturating() {
        assert_eq!(color_float_to_byte(0.5), 128); // 127.5 ties to even
        assert_eq!(color_float_to_byte(1.0), 255);
        assert_eq!(color_float_to_byte(-0.5), 0);
        assert_eq!(color_float_to_byte(2.0), 255);
    }

    #[test]
    fn bounding_box_spans_min_max() {
        let mask = LayoutMask::from_bits(LayoutMask::X | LayoutMask::Y);
        let spline = Spline::new(mask, vec![10.0, 5.0, 30.0, 25.0, 20.0, 15.0]);
        let stroke = Stroke::from_spline(&spline, Style::default()).unwrap();
        let bbox = stroke.bounding_box().unwrap();
        assert_eq!(
            (bbox.x, bbox.y, bbox.width, bbox.height),
            (10.0, 5.0, 20.0, 20.0)
        );
    }

    #[test]
    fn path_point_properties_hash_on_content() {
        let mut a = PathPointProperties::default();
        a.red = 1.0;
        a.regenerate_id();
        let mut b = PathPointProperties::default();
        b.red = 1.0;
        b.regenerate_id();
        assert_eq!(a.id(), b.id());
        b.blue = 0.5;
        b.regenerate_id();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn default_style_uses_source_over() {
        assert_eq!(Style::default().render_mode_uri, DEFAULT_RENDER_MODE_URI);
    }
}
