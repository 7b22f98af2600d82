//! Read-only statistics over a screen's block XML.
//!
//! Block XML (`.bky`) is a Blockly document: an `<xml>` root whose direct
//! `<block>` children are the top-level blocks, with further blocks nested
//! under `<value>`, `<statement>` and `<next>`. This module only counts
//! elements; it never follows block connections.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use tracing::warn;

/// Block kinds summarized in overview displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCategory {
    /// `component_event`
    Event,
    /// `component_method`
    Method,
    /// `component_set_get`
    PropertyAccessor,
    /// `procedures_defnoreturn` and `procedures_defreturn`
    Procedure,
    /// `global_declaration`
    GlobalVariable,
}

impl BlockCategory {
    /// Maps a block's `type` attribute to its category.
    pub fn from_block_type(block_type: &str) -> Option<Self> {
        match block_type {
            "component_event" => Some(Self::Event),
            "component_method" => Some(Self::Method),
            "component_set_get" => Some(Self::PropertyAccessor),
            "procedures_defnoreturn" | "procedures_defreturn" => Some(Self::Procedure),
            "global_declaration" => Some(Self::GlobalVariable),
            _ => None,
        }
    }
}

/// Number of blocks per [`BlockCategory`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCategoryCounts {
    pub events: usize,
    pub methods: usize,
    pub property_accessors: usize,
    pub procedures: usize,
    pub global_variables: usize,
}

impl BlockCategoryCounts {
    fn bump(&mut self, category: BlockCategory) {
        match category {
            BlockCategory::Event => self.events += 1,
            BlockCategory::Method => self.methods += 1,
            BlockCategory::PropertyAccessor => self.property_accessors += 1,
            BlockCategory::Procedure => self.procedures += 1,
            BlockCategory::GlobalVariable => self.global_variables += 1,
        }
    }

    /// Adds another screen's counts into these.
    pub fn accumulate(&mut self, other: &Self) {
        self.events += other.events;
        self.methods += other.methods;
        self.property_accessors += other.property_accessors;
        self.procedures += other.procedures;
        self.global_variables += other.global_variables;
    }
}

/// Counts extracted from one block XML document.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStats {
    /// `<block>` elements that are direct children of the `<xml>` root.
    pub top_level_blocks: usize,
    /// Every `<block>` element, at any depth.
    pub total_blocks: usize,
    pub categories: BlockCategoryCounts,
    /// Every `<block>` counted by its `type` attribute.
    pub by_type: BTreeMap<String, usize>,
}

impl BlockStats {
    /// Scans `xml` and counts its blocks.
    ///
    /// Empty input yields all-zero stats. Malformed XML stops the scan; the
    /// counts gathered up to that point are returned.
    pub fn from_xml(xml: &str) -> Self {
        let mut stats = Self::default();
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut depth = 0usize;
        let mut root_is_xml = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    if depth == 0 {
                        root_is_xml = e.local_name().as_ref() == b"xml";
                    }
                    stats.visit(e, root_is_xml && depth == 1);
                    depth += 1;
                }
                Ok(Event::Empty(ref e)) => {
                    stats.visit(e, root_is_xml && depth == 1);
                }
                Ok(Event::End(_)) => {
                    depth = depth.saturating_sub(1);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    warn!(
                        position = reader.buffer_position(),
                        "block xml is malformed, counts are partial: {e}"
                    );
                    break;
                }
                _ => {}
            }
            buf.clear();
        }

        stats
    }

    fn visit(&mut self, element: &BytesStart<'_>, top_level: bool) {
        if element.local_name().as_ref() != b"block" {
            return;
        }
        self.total_blocks += 1;
        if top_level {
            self.top_level_blocks += 1;
        }

        let block_type = element
            .attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.as_ref() == b"type")
            .map(|a| String::from_utf8_lossy(&a.value).into_owned());

        if let Some(block_type) = block_type {
            if let Some(category) = BlockCategory::from_block_type(&block_type) {
                self.categories.bump(category);
            }
            *self.by_type.entry(block_type).or_insert(0) += 1;
        }
    }
}
