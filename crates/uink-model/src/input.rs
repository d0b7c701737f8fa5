// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Input-configuration model: where raw ink came from.
//!
//! The five context tiers — environment, provider, device, channel context,
//! sensor context, input context — are all content-addressed: their id is a
//! tagged MD5 over their components, so equal configurations share one id
//! anywhere in a model and repository inserts are idempotent.

use crate::error::ModelError;
use crate::ident::{HashBuilder, UimId};

/// Data type of the samples reported by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    /// Boolean samples.
    Boolean,
    /// 32-bit floats (the common case).
    #[default]
    Float32,
    /// 64-bit floats.
    Float64,
    /// Signed 32-bit integers.
    Int32,
    /// Signed 64-bit integers.
    Int64,
    /// Unsigned 32-bit integers.
    Uint32,
    /// Unsigned 64-bit integers.
    Uint64,
}

/// The kind of hardware that produced the ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputProviderKind {
    /// Stylus, smart pen, pen display, signature pad.
    Pen,
    /// Touch controller: finger or passive stylus.
    Touch,
    /// Mouse.
    Mouse,
    /// 3-DOF or 6-DOF controller.
    Controller,
}

impl InputProviderKind {
    /// Canonical token used when hashing and in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Pen => "PEN",
            Self::Touch => "TOUCH",
            Self::Mouse => "MOUSE",
            Self::Controller => "CONTROLLER",
        }
    }
}

/// SI metric a sensor channel reports in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Length; SI unit meter.
    Length,
    /// Time; SI unit second.
    Time,
    /// Force; SI unit newton.
    Force,
    /// Angle; SI unit radian.
    Angle,
    /// Fraction of `max - min` (1.0 = 100%).
    Normalized,
}

impl MetricKind {
    /// Canonical token used when hashing and in diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Length => "LENGTH",
            Self::Time => "TIME",
            Self::Force => "FORCE",
            Self::Angle => "ANGLE",
            Self::Normalized => "NORMALIZED",
        }
    }
}

/// Well-known sensor channel types, identified by URI on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorType {
    /// Horizontal pen position on the writing surface.
    X,
    /// Vertical pen position on the writing surface.
    Y,
    /// Height of the pen above the writing surface.
    Z,
    /// Sample timestamp.
    Timestamp,
    /// Tip pressure.
    Pressure,
    /// Touch radius along X.
    RadiusX,
    /// Touch radius along Y.
    RadiusY,
    /// Azimuth angle of the pen (yaw).
    Azimuth,
    /// Elevation angle of the pen (pitch).
    Altitude,
    /// Counter-clockwise rotation about the pen axis.
    Rotation,
}

impl SensorType {
    /// The channel-type URI carried on the wire.
    #[must_use]
    pub fn uri(self) -> &'static str {
        match self {
            Self::X => "will://input/3.0/channel/X",
            Self::Y => "will://input/3.0/channel/Y",
            Self::Z => "will://input/3.0/channel/Z",
            Self::Timestamp => "will://input/3.0/channel/Timestamp",
            Self::Pressure => "will://input/3.0/channel/Pressure",
            Self::RadiusX => "will://input/3.0/channel/RadiusX",
            Self::RadiusY => "will://input/3.0/channel/RadiusY",
            Self::Azimuth => "will://input/3.0/channel/Azimuth",
            Self::Altitude => "will://input/3.0/channel/Altitude",
            Self::Rotation => "will://input/3.0/channel/Rotation",
        }
    }

    /// Resolves a channel-type URI back to the enum.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        [
            Self::X,
            Self::Y,
            Self::Z,
            Self::Timestamp,
            Self::Pressure,
            Self::RadiusX,
            Self::RadiusY,
            Self::Azimuth,
            Self::Altitude,
            Self::Rotation,
        ]
        .into_iter()
        .find(|t| t.uri() == uri)
    }
}

/// The virtual environment the ink was captured in (OS, SDK versions, …).
///
/// Properties are an ordered `(key, value)` list; iteration order is
/// preserved on the wire while hashing sorts by key.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    id: UimId,
    properties: Vec<(String, String)>,
}

impl Environment {
    /// Builds an environment and derives its content id.
    #[must_use]
    pub fn new(properties: Vec<(String, String)>) -> Self {
        let mut env = Self {
            id: UimId::Hashed(0),
            properties,
        };
        env.regenerate_id();
        env
    }

    /// Rebuilds with a known id (decoder path); the id is trusted as-is.
    #[must_use]
    pub fn with_id(id: UimId, properties: Vec<(String, String)>) -> Self {
        Self { id, properties }
    }

    /// Content-addressed identifier.
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// Ordered property list.
    #[must_use]
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// Appends a property. Callers must regenerate the id afterwards.
    pub fn add_property(&mut self, key: &str, value: &str) {
        self.properties.push((key.to_string(), value.to_string()));
    }

    /// Recomputes the content id from the current components.
    pub fn regenerate_id(&mut self) {
        self.id = self.compute_id();
    }

    /// The id the current components hash to.
    #[must_use]
    pub fn compute_id(&self) -> UimId {
        let mut h = HashBuilder::new("Environment");
        h.properties(&self.properties);
        h.finish()
    }
}

/// Generic input source: identifies *how* the ink was generated.
#[derive(Debug, Clone, PartialEq)]
pub struct InkInputProvider {
    id: UimId,
    kind: InputProviderKind,
    properties: Vec<(String, String)>,
}

impl InkInputProvider {
    /// Builds a provider and derives its content id.
    #[must_use]
    pub fn new(kind: InputProviderKind, properties: Vec<(String, String)>) -> Self {
        let mut provider = Self {
            id: UimId::Hashed(0),
            kind,
            properties,
        };
        provider.regenerate_id();
        provider
    }

    /// Rebuilds with a known id (decoder path).
    #[must_use]
    pub fn with_id(
        id: UimId,
        kind: InputProviderKind,
        properties: Vec<(String, String)>,
    ) -> Self {
        Self {
            id,
            kind,
            properties,
        }
    }

    /// Content-addressed identifier.
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// Hardware kind.
    #[must_use]
    pub fn kind(&self) -> InputProviderKind {
        self.kind
    }

    /// Ordered property list.
    #[must_use]
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// Recomputes the content id from the current components.
    pub fn regenerate_id(&mut self) {
        self.id = self.compute_id();
    }

    /// The id the current components hash to.
    #[must_use]
    pub fn compute_id(&self) -> UimId {
        let mut h = HashBuilder::new("InkInputProvider");
        h.text(self.kind.name());
        h.properties(&self.properties);
        h.finish()
    }
}

/// The hardware device the sensor data was produced on.
#[derive(Debug, Clone, PartialEq)]
pub struct InputDevice {
    id: UimId,
    properties: Vec<(String, String)>,
}

impl InputDevice {
    /// Builds a device and derives its content id.
    #[must_use]
    pub fn new(properties: Vec<(String, String)>) -> Self {
        let mut device = Self {
            id: UimId::Hashed(0),
            properties,
        };
        device.regenerate_id();
        device
    }

    /// Rebuilds with a known id (decoder path).
    #[must_use]
    pub fn with_id(id: UimId, properties: Vec<(String, String)>) -> Self {
        Self { id, properties }
    }

    /// Content-addressed identifier.
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// Ordered property list.
    #[must_use]
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// Recomputes the content id from the current components.
    pub fn regenerate_id(&mut self) {
        self.id = self.compute_id();
    }

    /// The id the current components hash to.
    #[must_use]
    pub fn compute_id(&self) -> UimId {
        let mut h = HashBuilder::new("InputDevice");
        h.properties(&self.properties);
        h.finish()
    }
}

/// One sensor channel definition.
///
/// `resolution` is a power-of-10 factor converting stored integer samples to
/// the declared SI metric; `precision` is the decimal-digit count used when
/// samples are fixed-point coded on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorChannel {
    id: UimId,
    channel_type: SensorType,
    metric: MetricKind,
    resolution: f64,
    min: f32,
    max: f32,
    precision: u32,
    index: u32,
    name: String,
    data_type: DataType,
    provider_id: Option<UimId>,
    device_id: Option<UimId>,
}

impl SensorChannel {
    /// Builds a channel with default provenance and derives its content id.
    #[must_use]
    pub fn new(channel_type: SensorType, metric: MetricKind, resolution: f64) -> Self {
        Self::with_bounds(channel_type, metric, resolution, 0.0, 0.0, 2)
    }

    /// Builds a channel with explicit bounds and precision.
    #[must_use]
    pub fn with_bounds(
        channel_type: SensorType,
        metric: MetricKind,
        resolution: f64,
        min: f32,
        max: f32,
        precision: u32,
    ) -> Self {
        let mut channel = Self {
            id: UimId::Hashed(0),
            channel_type,
            metric,
            resolution,
            min,
            max,
            precision,
            index: 0,
            name: String::new(),
            data_type: DataType::Float32,
            provider_id: None,
            device_id: None,
        };
        channel.regenerate_id();
        channel
    }

    /// Rebuilds with a known id and full provenance (decoder path).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn with_id(
        id: UimId,
        channel_type: SensorType,
        metric: MetricKind,
        resolution: f64,
        min: f32,
        max: f32,
        precision: u32,
        provider_id: Option<UimId>,
        device_id: Option<UimId>,
    ) -> Self {
        Self {
            id,
            channel_type,
            metric,
            resolution,
            min,
            max,
            precision,
            index: 0,
            name: String::new(),
            data_type: DataType::Float32,
            provider_id,
            device_id,
        }
    }

    /// Content-addressed identifier.
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// Channel type.
    #[must_use]
    pub fn channel_type(&self) -> SensorType {
        self.channel_type
    }

    /// Declared metric.
    #[must_use]
    pub fn metric(&self) -> MetricKind {
        self.metric
    }

    /// Power-of-10 sample-to-SI factor.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Lower bound of the reported range.
    #[must_use]
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound of the reported range.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Decimal digits used for fixed-point wire coding.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Channel index within a sample tuple.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Human-readable channel name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample data type.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Owning provider reference, when bound to a channel context.
    #[must_use]
    pub fn provider_id(&self) -> Option<UimId> {
        self.provider_id
    }

    /// Owning device reference, when bound to a channel context.
    #[must_use]
    pub fn device_id(&self) -> Option<UimId> {
        self.device_id
    }

    /// Binds provenance references; regenerates the content id.
    pub fn bind(&mut self, provider_id: Option<UimId>, device_id: Option<UimId>) {
        self.provider_id = provider_id;
        self.device_id = device_id;
        self.regenerate_id();
    }

    /// Recomputes the content id from the current components.
    pub fn regenerate_id(&mut self) {
        self.id = self.compute_id();
    }

    /// The id the current components hash to.
    #[must_use]
    pub fn compute_id(&self) -> UimId {
        let mut h = HashBuilder::new("SensorChannel");
        h.id(self.provider_id);
        h.id(self.device_id);
        h.text(self.channel_type.uri());
        h.text(self.metric.name());
        h.float(self.resolution);
        h.float(f64::from(self.min));
        h.float(f64::from(self.max));
        h.uint(u64::from(self.precision));
        h.finish()
    }
}

/// A provider/device pairing plus the channels they report together.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorChannelsContext {
    id: UimId,
    channels: Vec<SensorChannel>,
    sampling_rate: Option<u32>,
    latency_ms: Option<u32>,
    provider_id: Option<UimId>,
    device_id: Option<UimId>,
}

impl SensorChannelsContext {
    /// Builds a channel context, binding every channel to the given
    /// provider/device (their ids are regenerated), then derives its own id.
    #[must_use]
    pub fn new(
        mut channels: Vec<SensorChannel>,
        sampling_rate: Option<u32>,
        latency_ms: Option<u32>,
        provider_id: Option<UimId>,
        device_id: Option<UimId>,
    ) -> Self {
        for channel in &mut channels {
            channel.bind(provider_id, device_id);
        }
        let mut ctx = Self {
            id: UimId::Hashed(0),
            channels,
            sampling_rate,
            latency_ms,
            provider_id,
            device_id,
        };
        ctx.regenerate_id();
        ctx
    }

    /// Rebuilds with a known id (decoder path); channels are taken as-is.
    #[must_use]
    pub fn with_id(
        id: UimId,
        channels: Vec<SensorChannel>,
        sampling_rate: Option<u32>,
        latency_ms: Option<u32>,
        provider_id: Option<UimId>,
        device_id: Option<UimId>,
    ) -> Self {
        Self {
            id,
            channels,
            sampling_rate,
            latency_ms,
            provider_id,
            device_id,
        }
    }

    /// Content-addressed identifier.
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// The channels reported in this context.
    #[must_use]
    pub fn channels(&self) -> &[SensorChannel] {
        &self.channels
    }

    /// Intended sampling rate, when the producer declared one.
    #[must_use]
    pub fn sampling_rate(&self) -> Option<u32> {
        self.sampling_rate
    }

    /// Measured latency in milliseconds, when declared.
    #[must_use]
    pub fn latency_ms(&self) -> Option<u32> {
        self.latency_ms
    }

    /// Provider reference.
    #[must_use]
    pub fn provider_id(&self) -> Option<UimId> {
        self.provider_id
    }

    /// Device reference.
    #[must_use]
    pub fn device_id(&self) -> Option<UimId> {
        self.device_id
    }

    /// True when a channel of the given type is present.
    #[must_use]
    pub fn has_channel_type(&self, channel_type: SensorType) -> bool {
        self.channels
            .iter()
            .any(|c| c.channel_type() == channel_type)
    }

    /// Finds a channel by type.
    #[must_use]
    pub fn channel_by_type(&self, channel_type: SensorType) -> Option<&SensorChannel> {
        self.channels
            .iter()
            .find(|c| c.channel_type() == channel_type)
    }

    /// Recomputes the content id from the current components.
    pub fn regenerate_id(&mut self) {
        self.id = self.compute_id();
    }

    /// The id the current components hash to.
    #[must_use]
    pub fn compute_id(&self) -> UimId {
        let mut h = HashBuilder::new("SensorChannelsContext");
        for channel in &self.channels {
            h.id(Some(channel.id()));
        }
        h.opt_uint(self.sampling_rate.map(u64::from));
        h.opt_uint(self.latency_ms.map(u64::from));
        h.id(self.provider_id);
        h.id(self.device_id);
        h.finish()
    }
}

/// The full set of channel contexts available on one input source.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorContext {
    id: UimId,
    channel_contexts: Vec<SensorChannelsContext>,
}

impl SensorContext {
    /// Builds a sensor context and derives its content id.
    #[must_use]
    pub fn new(channel_contexts: Vec<SensorChannelsContext>) -> Self {
        let mut ctx = Self {
            id: UimId::Hashed(0),
            channel_contexts,
        };
        ctx.regenerate_id();
        ctx
    }

    /// Rebuilds with a known id (decoder path).
    #[must_use]
    pub fn with_id(id: UimId, channel_contexts: Vec<SensorChannelsContext>) -> Self {
        Self {
            id,
            channel_contexts,
        }
    }

    /// Content-addressed identifier.
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// The channel contexts.
    #[must_use]
    pub fn channel_contexts(&self) -> &[SensorChannelsContext] {
        &self.channel_contexts
    }

    /// True when any channel context carries the given type.
    #[must_use]
    pub fn has_channel_type(&self, channel_type: SensorType) -> bool {
        self.channel_contexts
            .iter()
            .any(|c| c.has_channel_type(channel_type))
    }

    /// Finds a channel anywhere in the context by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] when no channel carries the id.
    pub fn channel_by_id(&self, channel_id: UimId) -> Result<&SensorChannel, ModelError> {
        self.channel_contexts
            .iter()
            .flat_map(|ctx| ctx.channels())
            .find(|c| c.id().value() == channel_id.value())
            .ok_or_else(|| ModelError::NotFound {
                kind: "sensor channel",
                id: channel_id.s_form(),
            })
    }

    /// Finds the first channel of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] when no channel has the type.
    pub fn channel_by_type(&self, channel_type: SensorType) -> Result<&SensorChannel, ModelError> {
        self.channel_contexts
            .iter()
            .find_map(|ctx| ctx.channel_by_type(channel_type))
            .ok_or_else(|| ModelError::NotFound {
                kind: "sensor channel",
                id: channel_type.uri().to_string(),
            })
    }

    /// Recomputes the content id from the current components.
    pub fn regenerate_id(&mut self) {
        self.id = self.compute_id();
    }

    /// The id the current components hash to.
    #[must_use]
    pub fn compute_id(&self) -> UimId {
        let mut h = HashBuilder::new("SensorContext");
        for ctx in &self.channel_contexts {
            h.id(Some(ctx.id()));
        }
        h.finish()
    }
}

/// Capturing context: environment plus sensor context, both by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct InputContext {
    id: UimId,
    environment_id: Option<UimId>,
    sensor_context_id: Option<UimId>,
}

impl InputContext {
    /// Builds an input context and derives its content id.
    #[must_use]
    pub fn new(environment_id: Option<UimId>, sensor_context_id: Option<UimId>) -> Self {
        let mut ctx = Self {
            id: UimId::Hashed(0),
            environment_id,
            sensor_context_id,
        };
        ctx.regenerate_id();
        ctx
    }

    /// Rebuilds with a known id (decoder path).
    #[must_use]
    pub fn with_id(
        id: UimId,
        environment_id: Option<UimId>,
        sensor_context_id: Option<UimId>,
    ) -> Self {
        Self {
            id,
            environment_id,
            sensor_context_id,
        }
    }

    /// Content-addressed identifier.
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// Environment reference.
    #[must_use]
    pub fn environment_id(&self) -> Option<UimId> {
        self.environment_id
    }

    /// Sensor-context reference.
    #[must_use]
    pub fn sensor_context_id(&self) -> Option<UimId> {
        self.sensor_context_id
    }

    /// Recomputes the content id from the current components.
    pub fn regenerate_id(&mut self) {
        self.id = self.compute_id();
    }

    /// The id the current components hash to.
    #[must_use]
    pub fn compute_id(&self) -> UimId {
        let mut h = HashBuilder::new("InputContext");
        h.id(self.environment_id);
        h.id(self.sensor_context_id);
        h.finish()
    }
}

/// Repository of input-configuration entities, insertion-order preserved.
///
/// Inserts are idempotent on the content id: adding a value equal to an
/// existing one is a no-op that returns the id of the live instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputConfiguration {
    environments: Vec<Environment>,
    providers: Vec<InkInputProvider>,
    devices: Vec<InputDevice>,
    sensor_contexts: Vec<SensorContext>,
    input_contexts: Vec<InputContext>,
}

impl InputConfiguration {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered environments, in insertion order.
    #[must_use]
    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    /// Registered providers, in insertion order.
    #[must_use]
    pub fn providers(&self) -> &[InkInputProvider] {
        &self.providers
    }

    /// Registered devices, in insertion order.
    #[must_use]
    pub fn devices(&self) -> &[InputDevice] {
        &self.devices
    }

    /// Registered sensor contexts, in insertion order.
    #[must_use]
    pub fn sensor_contexts(&self) -> &[SensorContext] {
        &self.sensor_contexts
    }

    /// Registered input contexts, in insertion order.
    #[must_use]
    pub fn input_contexts(&self) -> &[InputContext] {
        &self.input_contexts
    }

    /// Adds an environment; idempotent on the content id.
    pub fn add_environment(&mut self, environment: Environment) -> UimId {
        let id = environment.id();
        if !self
            .environments
            .iter()
            .any(|e| e.id().value() == id.value())
        {
            self.environments.push(environment);
        }
        id
    }

    /// Adds a provider; idempotent on the content id.
    pub fn add_provider(&mut self, provider: InkInputProvider) -> UimId {
        let id = provider.id();
        if !self.providers.iter().any(|p| p.id().value() == id.value()) {
            self.providers.push(provider);
        }
        id
    }

    /// Adds a device; idempotent on the content id.
    pub fn add_device(&mut self, device: InputDevice) -> UimId {
        let id = device.id();
        if !self.devices.iter().any(|d| d.id().value() == id.value()) {
            self.devices.push(device);
        }
        id
    }

    /// Adds a sensor context; idempotent on the content id.
    pub fn add_sensor_context(&mut self, ctx: SensorContext) -> UimId {
        let id = ctx.id();
        if !self
            .sensor_contexts
            .iter()
            .any(|c| c.id().value() == id.value())
        {
            self.sensor_contexts.push(ctx);
        }
        id
    }

    /// Adds an input context; idempotent on the content id.
    pub fn add_input_context(&mut self, ctx: InputContext) -> UimId {
        let id = ctx.id();
        if !self
            .input_contexts
            .iter()
            .any(|c| c.id().value() == id.value())
        {
            self.input_contexts.push(ctx);
        }
        id
    }

    /// Looks up an environment by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn environment(&self, id: UimId) -> Result<&Environment, ModelError> {
        self.environments
            .iter()
            .find(|e| e.id().value() == id.value())
            .ok_or_else(|| ModelError::NotFound {
                kind: "environment",
                id: id.s_form(),
            })
    }

    /// Looks up a provider by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn provider(&self, id: UimId) -> Result<&InkInputProvider, ModelError> {
        self.providers
            .iter()
            .find(|p| p.id().value() == id.value())
            .ok_or_else(|| ModelError::NotFound {
                kind: "input provider",
                id: id.s_form(),
            })
    }

    /// Looks up a device by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn device(&self, id: UimId) -> Result<&InputDevice, ModelError> {
        self.devices
            .iter()
            .find(|d| d.id().value() == id.value())
            .ok_or_else(|| ModelError::NotFound {
                kind: "input device",
                id: id.s_form(),
            })
    }

    /// Looks up a sensor context by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn sensor_context(&self, id: UimId) -> Result<&SensorContext, ModelError> {
        self.sensor_contexts
            .iter()
            .find(|c| c.id().value() == id.value())
            .ok_or_else(|| ModelError::NotFound {
                kind: "sensor context",
                id: id.s_form(),
            })
    }

    /// Looks up an input context by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn input_context(&self, id: UimId) -> Result<&InputContext, ModelError> {
        self.input_contexts
            .iter()
            .find(|c| c.id().value() == id.value())
            .ok_or_else(|| ModelError::NotFound {
                kind: "input context",
                id: id.s_form(),
            })
    }

    /// True when any of providers, devices, or sensor contexts is non-empty.
    #[must_use]
    pub fn has_configuration(&self) -> bool {
        !self.providers.is_empty() || !self.devices.is_empty() || !self.sensor_contexts.is_empty()
    }

    /// True when nothing at all has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
            && self.providers.is_empty()
            && self.devices.is_empty()
            && self.sensor_contexts.is_empty()
            && self.input_contexts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_channels() -> Vec<SensorChannel> {
        vec![
            SensorChannel::new(SensorType::Timestamp, MetricKind::Time, 1.0),
            SensorChannel::new(SensorType::X, MetricKind::Length, 1.0),
            SensorChannel::new(SensorType::Y, MetricKind::Length, 1.0),
        ]
    }

    #[test]
    fn equal_values_share_one_id() {
        let a = Environment::new(vec![("os.name".into(), "Windows".into())]);
        let b = Environment::new(vec![("os.name".into(), "Windows".into())]);
        assert_eq!(a.id(), b.id());

        let c = Environment::new(vec![("os.name".into(), "Linux".into())]);
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn provider_kind_feeds_the_hash() {
        let pen = InkInputProvider::new(InputProviderKind::Pen, vec![]);
        let touch = InkInputProvider::new(InputProviderKind::Touch, vec![]);
        let mouse = InkInputProvider::new(InputProviderKind::Mouse, vec![]);
        assert_ne!(pen.id(), touch.id());
        assert_ne!(touch.id(), mouse.id());
        assert_ne!(pen.id(), mouse.id());
    }

    #[test]
    fn channel_context_binds_channels() {
        let provider = InkInputProvider::new(InputProviderKind::Pen, vec![]);
        let device = InputDevice::new(vec![("dev.id".into(), "123".into())]);
        let unbound_id = xy_channels()[1].id();
        let ctx = SensorChannelsContext::new(
            xy_channels(),
            None,
            None,
            Some(provider.id()),
            Some(device.id()),
        );
        assert_eq!(ctx.channels()[1].provider_id(), Some(provider.id()));
        assert_ne!(ctx.channels()[1].id(), unbound_id);
    }

    #[test]
    fn repository_inserts_are_idempotent() {
        let mut repo = InputConfiguration::new();
        let id1 = repo.add_device(InputDevice::new(vec![("dev.id".into(), "1".into())]));
        let id2 = repo.add_device(InputDevice::new(vec![("dev.id".into(), "1".into())]));
        assert_eq!(id1, id2);
        assert_eq!(repo.devices().len(), 1);
    }

    #[test]
    fn missing_lookup_fails_not_found() {
        let repo = InputConfiguration::new();
        let err = repo.input_context(UimId::Hashed(7)).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn has_configuration_ignores_environments() {
        let mut repo = InputConfiguration::new();
        repo.add_environment(Environment::new(vec![]));
        assert!(!repo.has_configuration());
        repo.add_device(InputDevice::new(vec![]));
        assert!(repo.has_configuration());
    }

    #[test]
    fn regeneration_is_idempotent() {
        let mut channel = SensorChannel::with_bounds(
            SensorType::Pressure,
            MetricKind::Force,
            1.0,
            0.0,
            4096.0,
            2,
        );
        let before = channel.id();
        channel.regenerate_id();
        assert_eq!(channel.id(), before);
    }

    #[test]
    fn sensor_type_uris_round_trip() {
        for t in [
            SensorType::X,
            SensorType::Timestamp,
            SensorType::Altitude,
            SensorType::Rotation,
        ] {
            assert_eq!(SensorType::from_uri(t.uri()), Some(t));
        }
        assert_eq!(SensorType::from_uri("will://input/3.0/channel/Nope"), None);
    }
}
