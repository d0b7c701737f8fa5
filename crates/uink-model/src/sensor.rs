// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Raw sensor-sample frames and their repository.
//!
//! A [`SensorData`] frame groups the samples captured for one stroke into
//! per-channel sequences. Timestamp channels hold absolute milliseconds in
//! memory; the wire codec stores the first value absolute and the remainder
//! as positive deltas. All other channels hold absolute values in memory and
//! are whole-sequence delta coded on the wire with the owning channel's
//! precision and resolution.

use crate::error::ModelError;
use crate::ident::UimId;
use crate::input::{SensorChannel, SensorType};

/// State of the input provider while a frame was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InkState {
    /// Writing on a surface.
    #[default]
    Plane,
    /// Hovering over a surface.
    Hovering,
    /// Moving in a volume (VR/AR) with active inking.
    InVolume,
    /// Moving in a volume with inking disabled.
    VolumeHovering,
    /// Proximity-sensor or VR tracking started.
    StartTracking,
    /// Proximity-sensor or VR tracking stopped.
    StopTracking,
}

/// Samples of one channel within a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelData {
    sensor_channel_id: UimId,
    values: Vec<f64>,
}

impl ChannelData {
    /// Builds channel data referencing the channel definition by id.
    #[must_use]
    pub fn new(sensor_channel_id: UimId, values: Vec<f64>) -> Self {
        Self {
            sensor_channel_id,
            values,
        }
    }

    /// Referenced [`SensorChannel`] id.
    #[must_use]
    pub fn sensor_channel_id(&self) -> UimId {
        self.sensor_channel_id
    }

    /// The sample values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// One raw data frame: every channel's samples for a single stroke.
///
/// Frames are identity objects (random id). Once added to the repository a
/// frame is treated as immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorData {
    id: UimId,
    input_context_id: UimId,
    state: InkState,
    timestamp_ms: u64,
    channels: Vec<ChannelData>,
}

impl SensorData {
    /// Creates an empty frame bound to an input context.
    #[must_use]
    pub fn new(id: UimId, input_context_id: UimId, state: InkState) -> Self {
        Self {
            id,
            input_context_id,
            state,
            timestamp_ms: 0,
            channels: Vec::new(),
        }
    }

    /// Frame identifier.
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// Input-context reference; must resolve in the model's configuration.
    #[must_use]
    pub fn input_context_id(&self) -> UimId {
        self.input_context_id
    }

    /// Capture state.
    #[must_use]
    pub fn state(&self) -> InkState {
        self.state
    }

    /// Absolute milliseconds of the first sample.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// Overrides the first-sample timestamp (decoder path).
    pub fn set_timestamp_ms(&mut self, timestamp_ms: u64) {
        self.timestamp_ms = timestamp_ms;
    }

    /// Channel sequences in insertion order.
    #[must_use]
    pub fn channels(&self) -> &[ChannelData] {
        &self.channels
    }

    /// Adds timestamp samples (absolute milliseconds).
    ///
    /// The frame's first-sample timestamp is taken from the first value.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidArgument`] when the channel is not a
    /// timestamp channel.
    pub fn add_timestamp_data(
        &mut self,
        channel: &SensorChannel,
        values: Vec<f64>,
    ) -> Result<(), ModelError> {
        if channel.channel_type() != SensorType::Timestamp {
            return Err(ModelError::InvalidArgument(format!(
                "channel {} is not a timestamp channel",
                channel.id()
            )));
        }
        if let Some(first) = values.first() {
            self.timestamp_ms = first.round() as u64;
        }
        self.push_channel(channel.id(), values);
        Ok(())
    }

    /// Adds samples for a non-timestamp channel (absolute values).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OutOfRange`] when the channel declares a
    /// non-degenerate `[min, max]` range and a sample falls outside it.
    pub fn add_data(
        &mut self,
        channel: &SensorChannel,
        values: Vec<f64>,
    ) -> Result<(), ModelError> {
        check_channel_bounds(channel, &values)?;
        self.push_channel(channel.id(), values);
        Ok(())
    }

    /// Adds an already-decoded channel sequence (decoder path).
    pub fn push_channel(&mut self, channel_id: UimId, values: Vec<f64>) {
        if values.is_empty() {
            return;
        }
        if let Some(existing) = self
            .channels
            .iter_mut()
            .find(|c| c.sensor_channel_id().value() == channel_id.value())
        {
            existing.values = values;
        } else {
            self.channels.push(ChannelData::new(channel_id, values));
        }
    }

    /// Samples of the given channel, when present.
    #[must_use]
    pub fn channel_values(&self, channel_id: UimId) -> Option<&[f64]> {
        self.channels
            .iter()
            .find(|c| c.sensor_channel_id().value() == channel_id.value())
            .map(ChannelData::values)
    }
}

/// Checks samples against a channel's declared range.
///
/// A degenerate range (`min ≥ max`, or either bound non-finite) declares no
/// bounds and passes everything.
///
/// # Errors
///
/// Returns [`ModelError::OutOfRange`] naming the first offending sample.
pub fn check_channel_bounds(channel: &SensorChannel, values: &[f64]) -> Result<(), ModelError> {
    let (min, max) = (f64::from(channel.min()), f64::from(channel.max()));
    if !(min.is_finite() && max.is_finite() && min < max) {
        return Ok(());
    }
    for (i, v) in values.iter().enumerate() {
        if *v < min || *v > max {
            return Err(ModelError::OutOfRange {
                what: "channel sample",
                detail: format!(
                    "sample {i} of channel {} is {v}, outside [{min}, {max}]",
                    channel.id()
                ),
            });
        }
    }
    Ok(())
}

/// Mapping from frame id to frame, insertion-order preserved for round-trip
/// stability.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorDataRepository {
    frames: Vec<SensorData>,
}

impl SensorDataRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames in insertion order.
    #[must_use]
    pub fn frames(&self) -> &[SensorData] {
        &self.frames
    }

    /// Number of stored frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when no frame is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Adds a frame. Re-adding an id replaces the content in place; the
    /// public contract nevertheless declares frames immutable once added,
    /// so the writer never takes that path.
    pub fn add(&mut self, frame: SensorData) {
        if let Some(existing) = self
            .frames
            .iter_mut()
            .find(|f| f.id().value() == frame.id().value())
        {
            *existing = frame;
        } else {
            self.frames.push(frame);
        }
    }

    /// Looks up a frame by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn by_id(&self, id: UimId) -> Result<&SensorData, ModelError> {
        self.frames
            .iter()
            .find(|f| f.id().value() == id.value())
            .ok_or_else(|| ModelError::NotFound {
                kind: "sensor data",
                id: id.s_form(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MetricKind;

    fn timestamp_channel() -> SensorChannel {
        SensorChannel::new(SensorType::Timestamp, MetricKind::Time, 1.0)
    }

    #[test]
    fn first_timestamp_becomes_frame_timestamp() {
        let channel = timestamp_channel();
        let mut frame = SensorData::new(UimId::random(), UimId::Hashed(1), InkState::Plane);
        frame
            .add_timestamp_data(&channel, vec![100.0, 107.0, 115.0])
            .unwrap();
        assert_eq!(frame.timestamp_ms(), 100);
        assert_eq!(
            frame.channel_values(channel.id()).unwrap(),
            &[100.0, 107.0, 115.0]
        );
    }

    #[test]
    fn non_timestamp_channel_is_rejected_for_timestamp_data() {
        let channel = SensorChannel::new(SensorType::Pressure, MetricKind::Force, 1.0);
        let mut frame = SensorData::new(UimId::random(), UimId::Hashed(1), InkState::Plane);
        assert!(frame.add_timestamp_data(&channel, vec![1.0]).is_err());
    }

    #[test]
    fn empty_value_lists_are_dropped() {
        let channel = SensorChannel::new(SensorType::Pressure, MetricKind::Force, 1.0);
        let mut frame = SensorData::new(UimId::random(), UimId::Hashed(1), InkState::Plane);
        frame.add_data(&channel, vec![]).unwrap();
        assert!(frame.channels().is_empty());
    }

    #[test]
    fn declared_bounds_are_enforced() {
        let channel = SensorChannel::with_bounds(
            SensorType::Pressure,
            MetricKind::Force,
            1.0,
            0.0,
            4096.0,
            2,
        );
        let mut frame = SensorData::new(UimId::random(), UimId::Hashed(1), InkState::Plane);
        frame.add_data(&channel, vec![0.0, 1024.0, 4096.0]).unwrap();
        let err = frame.add_data(&channel, vec![1.0, 5000.0]).unwrap_err();
        assert!(matches!(err, ModelError::OutOfRange { .. }));

        // A degenerate range declares no bounds.
        let unbounded = SensorChannel::new(SensorType::Pressure, MetricKind::Force, 1.0);
        frame.add_data(&unbounded, vec![-1e9, 1e9]).unwrap();
    }

    #[test]
    fn repository_preserves_insertion_order() {
        let mut repo = SensorDataRepository::new();
        let a = UimId::random();
        let b = UimId::random();
        repo.add(SensorData::new(a, UimId::Hashed(1), InkState::Plane));
        repo.add(SensorData::new(b, UimId::Hashed(1), InkState::Hovering));
        assert_eq!(repo.frames()[0].id(), a);
        assert_eq!(repo.frames()[1].id(), b);
        assert!(repo.by_id(b).is_ok());
        assert!(repo.by_id(UimId::random()).is_err());
    }
}
