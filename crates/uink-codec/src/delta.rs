// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Delta-plus-scale integer coding of numeric streams.
//!
//! Floats are scaled by `resolution × 10^precision`, rounded to integers,
//! then whole-sequence delta coded: the first wire value is the scaled
//! absolute value, every following value is the difference to its
//! predecessor. The integers travel as signed varints inside the protobuf
//! payloads. Without a precision scheme (precision 0, resolution 1) integer
//! values round-trip exactly; fractional values round to the declared
//! precision.

/// Scales and delta-codes a float stream.
#[must_use]
pub fn encode_stream(values: &[f64], precision: u32, resolution: f64) -> Vec<i64> {
    if values.is_empty() {
        return Vec::new();
    }
    let factor = 10f64.powi(precision.min(18) as i32) * resolution;
    let mut out = Vec::with_capacity(values.len());
    let mut last: i64 = 0;
    for (i, v) in values.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        let scaled = (v * factor).round() as i64;
        if i == 0 {
            out.push(scaled);
        } else {
            out.push(scaled - last);
        }
        last = scaled;
    }
    out
}

/// Reverses [`encode_stream`].
#[must_use]
pub fn decode_stream(raw: &[i64], precision: u32, resolution: f64) -> Vec<f64> {
    let factor = 10f64.powi(precision.min(18) as i32) * resolution;
    let mut out = Vec::with_capacity(raw.len());
    let mut acc: i64 = 0;
    for &delta in raw {
        acc += delta;
        #[allow(clippy::cast_precision_loss)]
        out.push(acc as f64 / factor);
    }
    out
}

/// [`encode_stream`] for `f32` channels.
#[must_use]
pub fn encode_f32_stream(values: &[f32], precision: u32) -> Vec<i64> {
    let widened: Vec<f64> = values.iter().copied().map(f64::from).collect();
    encode_stream(&widened, precision, 1.0)
}

/// [`decode_stream`] for `f32` channels.
#[must_use]
pub fn decode_f32_stream(raw: &[i64], precision: u32) -> Vec<f32> {
    decode_stream(raw, precision, 1.0)
        .into_iter()
        .map(|v| v as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_delta_to_first_differences() {
        let encoded = encode_stream(&[100.0, 107.0, 115.0], 0, 1.0);
        assert_eq!(encoded, vec![100, 7, 8]);
        assert_eq!(decode_stream(&encoded, 0, 1.0), vec![100.0, 107.0, 115.0]);
    }

    #[test]
    fn precision_bounds_the_round_trip_error() {
        let values: Vec<f64> = (0..1000).map(|i| f64::from(i) * 0.0175).collect();
        let encoded = encode_stream(&values, 2, 1.0);
        let decoded = decode_stream(&encoded, 2, 1.0);
        for (a, b) in values.iter().zip(&decoded) {
            assert!((a - b).abs() <= 0.005, "{a} vs {b}");
        }
    }

    #[test]
    fn resolution_scales_samples() {
        let encoded = encode_stream(&[0.0015, 0.0030], 0, 100_000.0);
        assert_eq!(encoded, vec![150, 150]);
        let decoded = decode_stream(&encoded, 0, 100_000.0);
        assert!((decoded[0] - 0.0015).abs() < 1e-12);
        assert!((decoded[1] - 0.0030).abs() < 1e-12);
    }

    #[test]
    fn empty_streams_stay_empty() {
        assert!(encode_stream(&[], 2, 1.0).is_empty());
        assert!(decode_stream(&[], 2, 1.0).is_empty());
    }

    #[test]
    fn negative_deltas_survive() {
        let values = vec![5.0, 3.0, 4.0, -2.0];
        let encoded = encode_stream(&values, 0, 1.0);
        assert_eq!(encoded, vec![5, -2, 1, -6]);
        assert_eq!(decode_stream(&encoded, 0, 1.0), values);
    }
}
