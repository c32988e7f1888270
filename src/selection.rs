// =============================================================================
// Overlay / Indicator Selection
// =============================================================================
//
// The chart asks for derived series by tag: overlays drawn on the price pane
// (`sma20`, `sma50`, `sma200`, `bbands`) and indicators drawn in their own
// panes (`rsi`, `macd`, `volume`, plus the not-yet-implemented `stochRsi`,
// `vwap`, `atr`).
//
// Selections are sets: order does not matter and duplicates collapse.
// Unrecognised tags are skipped, never rejected.
// =============================================================================

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// A closed enum addressable by a stable string tag.
pub trait Tag: Copy + Ord + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn tag(self) -> &'static str;

    fn from_tag(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.tag() == s)
    }
}

// =============================================================================
// Tags
// =============================================================================

/// Series drawn on top of the price pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Overlay {
    Sma20,
    Sma50,
    Sma200,
    Bbands,
}

impl Overlay {
    /// Window length for the SMA overlays; `None` for Bollinger Bands.
    pub fn sma_period(self) -> Option<usize> {
        match self {
            Self::Sma20 => Some(20),
            Self::Sma50 => Some(50),
            Self::Sma200 => Some(200),
            Self::Bbands => None,
        }
    }
}

impl Tag for Overlay {
    const ALL: &'static [Self] = &[Self::Sma20, Self::Sma50, Self::Sma200, Self::Bbands];

    fn tag(self) -> &'static str {
        match self {
            Self::Sma20 => "sma20",
            Self::Sma50 => "sma50",
            Self::Sma200 => "sma200",
            Self::Bbands => "bbands",
        }
    }
}

/// Series drawn in a separate pane below the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndicatorKind {
    Rsi,
    Macd,
    Volume,
    StochRsi,
    Vwap,
    Atr,
}

impl IndicatorKind {
    /// Placeholders are accepted in a selection but produce no output.
    pub fn is_implemented(self) -> bool {
        matches!(self, Self::Rsi | Self::Macd | Self::Volume)
    }
}

impl Tag for IndicatorKind {
    const ALL: &'static [Self] = &[
        Self::Rsi,
        Self::Macd,
        Self::Volume,
        Self::StochRsi,
        Self::Vwap,
        Self::Atr,
    ];

    fn tag(self) -> &'static str {
        match self {
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::Volume => "volume",
            Self::StochRsi => "stochRsi",
            Self::Vwap => "vwap",
            Self::Atr => "atr",
        }
    }
}

// =============================================================================
// TagSet
// =============================================================================

/// An order-insensitive, duplicate-free selection of tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagSet<T: Tag> {
    tags: BTreeSet<T>,
}

pub type OverlaySet = TagSet<Overlay>;
pub type IndicatorSet = TagSet<IndicatorKind>;

impl<T: Tag> Default for TagSet<T> {
    fn default() -> Self {
        Self {
            tags: BTreeSet::new(),
        }
    }
}

impl<T: Tag> TagSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from tag strings, skipping anything unrecognised.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for raw in tags {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }
            match T::from_tag(raw) {
                Some(tag) => {
                    set.tags.insert(tag);
                }
                None => debug!(tag = raw, "ignoring unrecognised selection tag"),
            }
        }
        set
    }

    /// Parse a comma-separated list such as `"sma20,bbands"`.
    pub fn from_csv(csv: &str) -> Self {
        Self::from_tags(csv.split(','))
    }

    pub fn insert(&mut self, tag: T) -> bool {
        self.tags.insert(tag)
    }

    pub fn remove(&mut self, tag: T) -> bool {
        self.tags.remove(&tag)
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle(&mut self, tag: T) {
        if !self.tags.remove(&tag) {
            self.tags.insert(tag);
        }
    }

    pub fn contains(&self, tag: T) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.tags.iter().copied()
    }

    /// Tags in canonical order.
    pub fn tag_strings(&self) -> Vec<&'static str> {
        self.iter().map(Tag::tag).collect()
    }
}

impl<T: Tag> FromIterator<T> for TagSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tags: iter.into_iter().collect(),
        }
    }
}

impl<T: Tag> Serialize for TagSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.tags.len()))?;
        for tag in &self.tags {
            seq.serialize_element(tag.tag())?;
        }
        seq.end()
    }
}

struct TagSetVisitor<T>(PhantomData<T>);

impl<'de, T: Tag> Visitor<'de> for TagSetVisitor<T> {
    type Value = TagSet<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of tag strings")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut raw: Vec<String> = Vec::new();
        while let Some(value) = seq.next_element::<serde_json::Value>()? {
            match value {
                serde_json::Value::String(tag) => raw.push(tag),
                other => debug!(value = %other, "ignoring non-string selection tag"),
            }
        }
        Ok(TagSet::from_tags(raw))
    }
}

impl<'de, T: Tag> Deserialize<'de> for TagSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(TagSetVisitor(PhantomData))
    }
}
