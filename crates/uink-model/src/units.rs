// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Unit conversions for sensor-channel metrics.
//!
//! Factors are derived from exact per-unit-to-SI constants rather than a
//! pairwise table, so converting there and back is stable:
//! `convert(u2, u1, convert(u1, u2, v))` matches `v` within 1e-9 relative
//! error for every supported pair.

use crate::error::ModelError;

/// Measurement units carried by sensor channels and document metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Unit not declared; conversions are the identity.
    Undefined,
    /// Meters.
    M,
    /// Centimeters.
    Cm,
    /// Millimeters.
    Mm,
    /// Inches.
    In,
    /// Points (1 pt = 1/72 in).
    Pt,
    /// Picas (1 pc = 12 pt).
    Pc,
    /// Device-independent pixels (1 DIP = 1/96 in).
    Dip,
    /// Seconds.
    S,
    /// Milliseconds.
    Ms,
    /// Nanoseconds.
    Ns,
    /// Newtons.
    N,
    /// Radians.
    Rad,
    /// Degrees.
    Deg,
    /// Fraction of the channel's `max - min` range (1.0 = 100%).
    Percentage,
    /// Dimensionless logical value.
    Logical,
}

/// Dimension a unit measures; conversions only exist within one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Length,
    Time,
    Force,
    Angle,
    Ratio,
    None,
}

const INCH_M: f64 = 0.0254;

impl Unit {
    fn dimension(self) -> Dimension {
        match self {
            Self::M | Self::Cm | Self::Mm | Self::In | Self::Pt | Self::Pc | Self::Dip => {
                Dimension::Length
            }
            Self::S | Self::Ms | Self::Ns => Dimension::Time,
            Self::N => Dimension::Force,
            Self::Rad | Self::Deg => Dimension::Angle,
            Self::Percentage | Self::Logical => Dimension::Ratio,
            Self::Undefined => Dimension::None,
        }
    }

    /// Factor converting one of this unit into its dimension's SI unit.
    fn si_factor(self) -> f64 {
        match self {
            Self::M | Self::S | Self::N | Self::Rad | Self::Percentage | Self::Logical
            | Self::Undefined => 1.0,
            Self::Cm => 0.01,
            Self::Mm => 0.001,
            Self::In => INCH_M,
            Self::Pt => INCH_M / 72.0,
            Self::Pc => INCH_M / 6.0,
            Self::Dip => INCH_M / 96.0,
            Self::Ms => 1e-3,
            Self::Ns => 1e-9,
            Self::Deg => core::f64::consts::PI / 180.0,
        }
    }
}

/// The SI base unit for a unit's dimension.
///
/// Returns [`Unit::Undefined`] for dimensionless units.
#[must_use]
pub fn si_unit(unit: Unit) -> Unit {
    match unit.dimension() {
        Dimension::Length => Unit::M,
        Dimension::Time => Unit::S,
        Dimension::Force => Unit::N,
        Dimension::Angle => Unit::Rad,
        Dimension::Ratio | Dimension::None => Unit::Undefined,
    }
}

/// Resolution expressing how many increments of `unit` make up one SI unit.
///
/// E.g. `virtual_resolution(Unit::Mm) == 1000.0`. Dimensionless units report
/// `1.0`.
#[must_use]
pub fn virtual_resolution(unit: Unit) -> f64 {
    if si_unit(unit) == Unit::Undefined {
        return 1.0;
    }
    1.0 / unit.si_factor()
}

/// Converts `value` from `source` into `target`.
///
/// [`Unit::Undefined`] on either side is the identity conversion.
///
/// # Errors
///
/// Returns [`ModelError::InvalidArgument`] when the units measure different
/// dimensions.
pub fn convert(source: Unit, target: Unit, value: f64) -> Result<f64, ModelError> {
    if source == Unit::Undefined || target == Unit::Undefined {
        return Ok(value);
    }
    if source.dimension() != target.dimension() {
        return Err(ModelError::InvalidArgument(format!(
            "cannot convert {source:?} into {target:?}"
        )));
    }
    Ok(value * (source.si_factor() / target.si_factor()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Unit; 15] = [
        Unit::M,
        Unit::Cm,
        Unit::Mm,
        Unit::In,
        Unit::Pt,
        Unit::Pc,
        Unit::Dip,
        Unit::S,
        Unit::Ms,
        Unit::Ns,
        Unit::N,
        Unit::Rad,
        Unit::Deg,
        Unit::Percentage,
        Unit::Logical,
    ];

    #[test]
    fn known_factors() {
        assert!((convert(Unit::In, Unit::Dip, 1.0).unwrap() - 96.0).abs() < 1e-12);
        assert!((convert(Unit::In, Unit::Pt, 1.0).unwrap() - 72.0).abs() < 1e-12);
        assert!((convert(Unit::Pc, Unit::Pt, 1.0).unwrap() - 12.0).abs() < 1e-12);
        assert!((convert(Unit::S, Unit::Ms, 2.0).unwrap() - 2000.0).abs() < 1e-12);
        assert!((convert(Unit::M, Unit::Cm, 1.5).unwrap() - 150.0).abs() < 1e-12);
        assert!(
            (convert(Unit::Deg, Unit::Rad, 180.0).unwrap() - core::f64::consts::PI).abs() < 1e-12
        );
    }

    #[test]
    fn cross_dimension_conversion_fails() {
        assert!(convert(Unit::M, Unit::S, 1.0).is_err());
        assert!(convert(Unit::Deg, Unit::N, 1.0).is_err());
    }

    #[test]
    fn undefined_is_identity() {
        assert_eq!(convert(Unit::Undefined, Unit::M, 7.5).unwrap(), 7.5);
        assert_eq!(convert(Unit::Ms, Unit::Undefined, 7.5).unwrap(), 7.5);
    }

    #[test]
    fn si_units_and_resolutions() {
        assert_eq!(si_unit(Unit::Dip), Unit::M);
        assert_eq!(si_unit(Unit::Ns), Unit::S);
        assert_eq!(si_unit(Unit::Percentage), Unit::Undefined);
        assert!((virtual_resolution(Unit::Mm) - 1000.0).abs() < 1e-9);
        assert!((virtual_resolution(Unit::Ms) - 1000.0).abs() < 1e-9);
        assert!((virtual_resolution(Unit::Logical) - 1.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn every_pair_round_trips(
            a in 0usize..ALL.len(),
            b in 0usize..ALL.len(),
            v in prop::num::f64::NORMAL.prop_filter("nonzero finite", |v| v.abs() > 1e-6 && v.abs() < 1e9)
        ) {
            let (ua, ub) = (ALL[a], ALL[b]);
            if let Ok(forward) = convert(ua, ub, v) {
                let back = convert(ub, ua, forward).unwrap();
                prop_assert!(((back - v) / v).abs() < 1e-9, "{ua:?}->{ub:?}: {v} vs {back}");
            }
        }
    }
}
