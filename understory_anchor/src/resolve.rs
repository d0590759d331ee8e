// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target resolution: locator → element → document-space rectangle.
//!
//! Both functions are pure reads of the [`Document`]. Missing or detached elements
//! produce [`Resolution::NotFound`]; nothing here fails.

use kurbo::Rect;

use crate::host::Document;
use crate::types::Resolution;

/// Resolve `locator` to its first match and measure it.
pub fn resolve<D: Document + ?Sized>(doc: &D, locator: &str) -> Resolution<D::Element> {
    match doc.query_first(locator) {
        Some(element) => measure(doc, element),
        None => {
            tracing::debug!(locator, "locator did not match");
            Resolution::NotFound
        }
    }
}

/// Re-measure an element captured by an earlier [`resolve`].
///
/// A detached element is reported as [`Resolution::NotFound`].
pub fn measure<D: Document + ?Sized>(doc: &D, element: D::Element) -> Resolution<D::Element> {
    if !doc.is_attached(element) {
        tracing::debug!(?element, "target detached");
        return Resolution::NotFound;
    }
    Resolution::Found {
        element,
        rect: to_document(doc, doc.client_rect(element)),
    }
}

fn to_document<D: Document + ?Sized>(doc: &D, client: Rect) -> Rect {
    client + doc.viewport().scroll
}
