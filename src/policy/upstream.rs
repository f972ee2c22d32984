// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hand-off with a hosting layer that manages headers on its own.

use axum::http::HeaderName;

/// A layer outside the pipeline that may own some response headers.
///
/// A FORCE_SET rule only sticks if the owning layer lets go of the header
/// first; otherwise it rewrites the header after the pipeline has run.
pub trait UpstreamControl {
    /// Stop managing `name`. Returns `true` if the header was managed.
    fn relinquish(&mut self, name: &HeaderName) -> bool;
}

