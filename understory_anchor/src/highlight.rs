// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Highlight overlay: the emphasis rectangle plus the marker class on the target.
//!
//! The class mutation is the only side effect the engine performs on a node it does
//! not own. It is recorded as an [`OwnedMark`], which can only be released by value,
//! so each mark is reverted exactly once.

use alloc::string::String;
use kurbo::Rect;

use crate::host::Document;
use crate::types::Resolution;

/// A marker class the engine added to a host element, and how to take it off again.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "an OwnedMark must be released or the marker class stays on the element"]
pub struct OwnedMark<E> {
    element: E,
    class: String,
}

impl<E: Copy + Eq + core::fmt::Debug> OwnedMark<E> {
    /// Add `class` to `element` and record it.
    pub fn apply<D: Document<Element = E> + ?Sized>(doc: &mut D, element: E, class: &str) -> Self {
        doc.add_class(element, class);
        Self {
            element,
            class: String::from(class),
        }
    }

    /// Element carrying the class.
    pub fn element(&self) -> E {
        self.element
    }

    /// Revert the mutation.
    pub fn release<D: Document<Element = E> + ?Sized>(self, doc: &mut D) {
        doc.remove_class(self.element, &self.class);
    }
}

/// Rectangle and marker state for the current step.
#[derive(Clone, Debug)]
pub struct HighlightOverlay<E> {
    class: String,
    rect: Option<Rect>,
    mark: Option<OwnedMark<E>>,
}

impl<E: Copy + Eq + core::fmt::Debug> HighlightOverlay<E> {
    /// Create an empty overlay that marks targets with `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            rect: None,
            mark: None,
        }
    }

    /// Follow a fresh resolution.
    ///
    /// A found target gets the marker (moving it off any previously marked element)
    /// and the rectangle; anything else clears both. Returns true if the rendered
    /// state changed.
    pub fn apply<D: Document<Element = E> + ?Sized>(
        &mut self,
        doc: &mut D,
        resolution: &Resolution<E>,
    ) -> bool {
        match *resolution {
            Resolution::Found { element, rect } => {
                let remark = self.mark.as_ref().map(OwnedMark::element) != Some(element);
                if remark {
                    if let Some(old) = self.mark.take() {
                        old.release(doc);
                    }
                    self.mark = Some(OwnedMark::apply(doc, element, &self.class));
                }
                let moved = self.rect != Some(rect);
                self.rect = Some(rect);
                remark || moved
            }
            Resolution::NotFound => self.clear(doc),
        }
    }

    /// Remove the marker and the rectangle. Returns true if anything was shown.
    pub fn clear<D: Document<Element = E> + ?Sized>(&mut self, doc: &mut D) -> bool {
        let had_mark = match self.mark.take() {
            Some(mark) => {
                mark.release(doc);
                true
            }
            None => false,
        };
        had_mark | self.rect.take().is_some()
    }

    /// Rectangle to draw, in document coordinates.
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Element currently carrying the marker class.
    pub fn marked(&self) -> Option<E> {
        self.mark.as_ref().map(OwnedMark::element)
    }

    /// Marker class name.
    pub fn class(&self) -> &str {
        &self.class
    }
}
