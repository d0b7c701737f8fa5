// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Identifier and hashing utilities.
//!
//! Every addressable entity in a UIM document carries a 128-bit identifier.
//! Mutable leaves (strokes, sensor-data frames, tree nodes, named entities)
//! use ids drawn uniformly at construction time; value objects (environment,
//! device, channel, the context tiers, path-point properties) derive their
//! id deterministically from their content, so equal values hash identically
//! across files and processes.
//!
//! The content hash is a tagged MD5: the class tag and the ordered component
//! list are fed through the digest separated by NUL bytes, and the 16 digest
//! bytes are the id. Tags are fixed per class (`"Environment"`,
//! `"SensorChannel"`, …); [`HashBuilder`] owns the canonical textual forms.
//!
//! Two string renderings exist and parsers accept either:
//!
//! * S-form — 32 lowercase hex digits, e.g. `fa70390871c84d91b83c9b56549043ca`
//! * H-form — 8-4-4-4-12 groups, e.g. `fa703908-71c8-4d91-b83c-9b56549043ca`

use core::fmt;

use md5::{Digest, Md5};

use crate::error::ModelError;

/// Separator fed between hash components (and after the tag).
const SEPARATOR: u8 = 0;

/// A 128-bit UIM identifier.
///
/// The variant records how the id was produced. `Random` ids are identity by
/// value alone; `Hashed` ids are recomputable from the owning object's
/// content. Code that keys collections by identifier must use [`value`],
/// never object identity — the variant tag is provenance, not identity, and
/// both renderings drop it.
///
/// [`value`]: UimId::value
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum UimId {
    /// Drawn uniformly at construction time (UUID v4).
    Random(u128),
    /// First 16 bytes of a tagged MD5 over the object's components.
    Hashed(u128),
}

impl UimId {
    /// Draws a fresh random identifier.
    pub fn random() -> Self {
        Self::Random(uuid::Uuid::new_v4().as_u128())
    }

    /// The raw 128-bit value, regardless of provenance.
    #[must_use]
    pub fn value(self) -> u128 {
        match self {
            Self::Random(v) | Self::Hashed(v) => v,
        }
    }

    /// Big-endian byte rendering, as carried on the wire.
    #[must_use]
    pub fn to_bytes(self) -> [u8; 16] {
        self.value().to_be_bytes()
    }

    /// Reconstructs a random-kind id from wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Format`] when `bytes` is not exactly 16 bytes.
    pub fn random_from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(Self::Random(value_from_bytes(bytes)?))
    }

    /// Reconstructs a hashed-kind id from wire bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Format`] when `bytes` is not exactly 16 bytes.
    pub fn hashed_from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(Self::Hashed(value_from_bytes(bytes)?))
    }

    /// Parses an S-form or H-form string into a random-kind id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Format`] when the text is neither rendering.
    pub fn parse_random(text: &str) -> Result<Self, ModelError> {
        Ok(Self::Random(parse_value(text)?))
    }

    /// Parses an S-form or H-form string into a hashed-kind id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Format`] when the text is neither rendering.
    pub fn parse_hashed(text: &str) -> Result<Self, ModelError> {
        Ok(Self::Hashed(parse_value(text)?))
    }

    /// Simple hexadecimal rendering: 32 lowercase hex digits.
    #[must_use]
    pub fn s_form(self) -> String {
        format!("{:032x}", self.value())
    }

    /// Hyphenated rendering: 8-4-4-4-12 lowercase hex groups.
    #[must_use]
    pub fn h_form(self) -> String {
        let s = self.s_form();
        format!(
            "{}-{}-{}-{}-{}",
            &s[0..8],
            &s[8..12],
            &s[12..16],
            &s[16..20],
            &s[20..32]
        )
    }
}

impl fmt::Display for UimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.s_form())
    }
}

fn value_from_bytes(bytes: &[u8]) -> Result<u128, ModelError> {
    let arr: [u8; 16] = bytes.try_into().map_err(|_| {
        ModelError::Format(format!("identifier must be 16 bytes, got {}", bytes.len()))
    })?;
    Ok(u128::from_be_bytes(arr))
}

fn parse_value(text: &str) -> Result<u128, ModelError> {
    let compact: String = match text.len() {
        32 => text.to_string(),
        36 => {
            let groups: Vec<&str> = text.split('-').collect();
            let lens: Vec<usize> = groups.iter().map(|g| g.len()).collect();
            if lens != [8, 4, 4, 4, 12] {
                return Err(ModelError::Format(format!("{text} is not a valid id")));
            }
            groups.concat()
        }
        _ => return Err(ModelError::Format(format!("{text} is not a valid id"))),
    };
    u128::from_str_radix(&compact, 16)
        .map_err(|e| ModelError::Format(format!("{text} is not a valid id: {e}")))
}

/// Canonical textual form of a float hash component.
///
/// Six decimal digits after the point, trailing zeros trimmed, and the point
/// itself trimmed when nothing remains after it. Negative zero normalizes to
/// `0`. Re-hashing an untouched value is therefore idempotent across
/// platforms.
#[must_use]
pub fn canonical_float(v: f64) -> String {
    let v = if v == 0.0 { 0.0 } else { v };
    let mut s = format!("{v:.6}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    s
}

/// Incremental builder for content-addressed identifiers.
///
/// Feeds `tag ‖ NUL ‖ c₁ ‖ NUL ‖ c₂ ‖ NUL …` through MD5. Absent optional
/// components contribute an empty token with the separator preserved, so
/// `Some("")` and `None` hash identically but a shifted component list does
/// not.
pub struct HashBuilder {
    digest: Md5,
}

impl HashBuilder {
    /// Starts a builder for the given class tag.
    pub fn new(tag: &str) -> Self {
        let mut digest = Md5::new();
        digest.update(tag.as_bytes());
        digest.update([SEPARATOR]);
        Self { digest }
    }

    fn token(&mut self, bytes: &[u8]) {
        self.digest.update(bytes);
        self.digest.update([SEPARATOR]);
    }

    /// Appends an unsigned integer component in decimal form.
    pub fn uint(&mut self, v: u64) {
        self.token(v.to_string().as_bytes());
    }

    /// Appends an optional unsigned integer; absence is an empty token.
    pub fn opt_uint(&mut self, v: Option<u64>) {
        match v {
            Some(v) => self.uint(v),
            None => self.token(b""),
        }
    }

    /// Appends a float component in canonical form (see [`canonical_float`]).
    pub fn float(&mut self, v: f64) {
        self.token(canonical_float(v).as_bytes());
    }

    /// Appends a UTF-8 string component.
    pub fn text(&mut self, s: &str) {
        self.token(s.as_bytes());
    }

    /// Appends an identifier component as its S-form; absence is an empty
    /// token.
    pub fn id(&mut self, id: Option<UimId>) {
        match id {
            Some(id) => self.token(id.s_form().as_bytes()),
            None => self.token(b""),
        }
    }

    /// Appends an ordered `(key, value)` property list.
    ///
    /// Pairs are hashed sorted by key so that two lists with equal content
    /// in different order produce the same id; each key and value is its own
    /// token.
    pub fn properties(&mut self, props: &[(String, String)]) {
        let mut sorted: Vec<&(String, String)> = props.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        for (key, value) in sorted {
            self.token(key.as_bytes());
            self.token(value.as_bytes());
        }
    }

    /// Finalizes the digest into a hashed-kind identifier.
    #[must_use]
    pub fn finish(self) -> UimId {
        let out = self.digest.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&out[..16]);
        UimId::Hashed(u128::from_be_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s_and_h_forms_round_trip() {
        let id = UimId::Random(0xfa70390871c84d91b83c9b56549043ca);
        assert_eq!(id.s_form(), "fa70390871c84d91b83c9b56549043ca");
        assert_eq!(id.h_form(), "fa703908-71c8-4d91-b83c-9b56549043ca");
        assert_eq!(UimId::parse_random(&id.s_form()), Ok(id));
        assert_eq!(UimId::parse_random(&id.h_form()), Ok(id));
    }

    #[test]
    fn malformed_ids_are_rejected() {
        assert!(UimId::parse_random("not-an-id").is_err());
        assert!(UimId::parse_random("fa703908-71c84d91-b83c-9b56-549043ca").is_err());
        assert!(UimId::random_from_bytes(&[0u8; 5]).is_err());
    }

    #[test]
    fn tag_separates_hash_domains() {
        let mut a = HashBuilder::new("Environment");
        a.text("x");
        let mut b = HashBuilder::new("InputDevice");
        b.text("x");
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn equal_components_hash_identically() {
        let build = || {
            let mut h = HashBuilder::new("SensorChannel");
            h.id(None);
            h.text("will://input/3.0/channel/X");
            h.float(1.0);
            h.finish()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn component_order_matters_but_property_order_does_not() {
        let with_props = |props: &[(&str, &str)]| {
            let owned: Vec<(String, String)> = props
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect();
            let mut h = HashBuilder::new("Environment");
            h.properties(&owned);
            h.finish()
        };
        assert_eq!(
            with_props(&[("a", "1"), ("b", "2")]),
            with_props(&[("b", "2"), ("a", "1")])
        );
        assert_ne!(
            with_props(&[("a", "1"), ("b", "2")]),
            with_props(&[("a", "2"), ("b", "1")])
        );
    }

    #[test]
    fn absent_components_keep_their_slot() {
        let mut a = HashBuilder::new("T");
        a.id(None);
        a.text("x");
        let mut b = HashBuilder::new("T");
        b.text("x");
        b.id(None);
        assert_ne!(a.finish(), b.finish());
    }

    #[test]
    fn canonical_float_trims() {
        assert_eq!(canonical_float(1.0), "1");
        assert_eq!(canonical_float(1.5), "1.5");
        assert_eq!(canonical_float(0.0175), "0.0175");
        assert_eq!(canonical_float(-0.0), "0");
        assert_eq!(canonical_float(2.000001), "2.000001");
    }

    #[test]
    fn random_and_hashed_do_not_compare_equal() {
        let v = 42u128;
        assert_ne!(UimId::Random(v), UimId::Hashed(v));
        assert_eq!(UimId::Random(v).value(), UimId::Hashed(v).value());
    }
}
