//! Static per-object records.
//!
//! Definitions are authored data (title, blurb, colour, physical thickness,
//! page layout) owned by the content pipeline. The engine looks them up by
//! [`ObjectId`] and never mutates them.

use std::collections::HashMap;
use std::fmt;

use crate::scene::ObjectId;

/// Effect family a scent dispenser (or other ambient source) drives, e.g. "scent"
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EffectCategory(pub String);

impl EffectCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for EffectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub title: String,
    pub description: String,
    pub color: [f32; 4],
    /// Height the item adds when lying flat in a stack
    pub thickness: f32,
    /// Number of two-page spreads (books only)
    pub spreads: usize,
    /// Spreads that hide a collectible
    pub hidden_item_spreads: Vec<usize>,
    pub effect: Option<EffectCategory>,
}

impl Definition {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color: [0.8, 0.8, 0.8, 1.0],
            thickness: 0.04,
            spreads: 1,
            hidden_item_spreads: Vec::new(),
            effect: None,
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    pub fn with_spreads(mut self, spreads: usize) -> Self {
        self.spreads = spreads;
        self
    }

    pub fn with_hidden_item_on(mut self, spread: usize) -> Self {
        if !self.hidden_item_spreads.contains(&spread) {
            self.hidden_item_spreads.push(spread);
        }
        self
    }

    pub fn with_effect(mut self, effect: EffectCategory) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn hides_item_on(&self, spread: usize) -> bool {
        self.hidden_item_spreads.contains(&spread)
    }
}

/// Read-only lookup of definitions by object
#[derive(Debug, Default, Clone)]
pub struct DefinitionRegistry {
    records: HashMap<ObjectId, Definition>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: ObjectId, definition: Definition) {
        self.records.insert(object, definition);
    }

    pub fn get(&self, object: ObjectId) -> Option<&Definition> {
        self.records.get(&object)
    }

    /// Stack thickness, falling back to the default record's value
    pub fn thickness(&self, object: ObjectId) -> f32 {
        self.get(object)
            .map(|d| d.thickness)
            .unwrap_or_else(|| Definition::new("", "").thickness)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<(ObjectId, Definition)> for DefinitionRegistry {
    fn from_iter<I: IntoIterator<Item = (ObjectId, Definition)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
