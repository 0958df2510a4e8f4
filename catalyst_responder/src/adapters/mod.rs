// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters that provide parent lookups for concrete trees.

#[cfg(feature = "dom_adapter")]
pub mod dom;
