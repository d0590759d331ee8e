// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identifiers and descriptions.

use kurbo::{Rect, Size, Vec2};
use smallvec::SmallVec;
use understory_anchor::host::Overflow;

/// Identifier for an element in a [`HeadlessDom`](crate::HeadlessDom).
///
/// A slot index plus a generation. Removing an element frees its slot; a later
/// insert into the same slot bumps the generation, so stale ids never alias a new
/// element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(pub(crate) u32, pub(crate) u32);

impl ElementId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Description of an element to insert.
///
/// `bounds` are relative to the parent's content origin (the parent's top-left
/// minus its scroll offset). Elements without a parent are positioned in document
/// coordinates.
#[derive(Clone, Debug, Default)]
pub struct ElementSpec {
    data: ElementData,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct ElementData {
    pub(crate) tag: String,
    pub(crate) id: Option<String>,
    pub(crate) classes: SmallVec<[String; 4]>,
    pub(crate) attrs: SmallVec<[(String, String); 2]>,
    pub(crate) bounds: Rect,
    pub(crate) overflow_x: Overflow,
    pub(crate) overflow_y: Overflow,
    pub(crate) content_size: Option<Size>,
    pub(crate) scroll: Vec2,
}

impl ElementSpec {
    /// Start describing an element with tag name `tag`.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            data: ElementData {
                tag: tag.into(),
                ..ElementData::default()
            },
        }
    }

    /// Set the `id` attribute.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.data.id = Some(id.into());
        self
    }

    /// Add a class.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.data.classes.push(class.into());
        self
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.attrs.push((name.into(), value.into()));
        self
    }

    /// Set the border box relative to the parent's content origin.
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.data.bounds = bounds;
        self
    }

    /// Make the element a scroll container with `content` size on both axes.
    pub fn scrollable(mut self, overflow: Overflow, content: Size) -> Self {
        self.data.overflow_x = overflow;
        self.data.overflow_y = overflow;
        self.data.content_size = Some(content);
        self
    }

    pub(crate) fn into_data(self) -> ElementData {
        self.data
    }
}

impl ElementData {
    /// Largest scroll offset the content allows.
    pub(crate) fn max_scroll(&self) -> Vec2 {
        let content = self.content_size.unwrap_or(self.bounds.size());
        Vec2::new(
            (content.width - self.bounds.width()).max(0.0),
            (content.height - self.bounds.height()).max(0.0),
        )
    }
}
