// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Catalyst Responder: a deterministic, `no_std` propagation-path builder for DOM events.
//!
//! ## Overview
//!
//! This crate computes the order in which nodes see an event (capture → target → bubble)
//! for a given target. It does not invoke listeners. Feed it a target and a
//! [`ParentLookup`](crate::types::ParentLookup); it emits a sequence of
//! [`Dispatch`](crate::types::Dispatch) steps a runtime can walk.
//!
//! ## Composed paths
//!
//! Whether an event escapes a shadow tree is a property of the parent lookup. The
//! `dom_adapter` feature provides [`DomParents`](crate::adapters::dom::DomParents), which
//! steps from a shadow root to its host only when built as composed.
//!
//! ## Dispatcher sketch
//!
//! ```no_run
//! use catalyst_responder::types::{Dispatch, Outcome, Phase};
//!
//! /// Deliver a single dispatch item and report whether to continue.
//! fn deliver<K>(_d: &Dispatch<K>) -> Outcome {
//!     Outcome::Continue
//! }
//!
//! /// Walk the dispatch sequence. Returns true if the event was consumed.
//! fn run_dispatch<K>(seq: &[Dispatch<K>]) -> bool {
//!     for d in seq {
//!         match deliver(d) {
//!             Outcome::Continue => {}
//!             Outcome::Stop => return false,
//!             Outcome::StopAndConsume => return true,
//!         }
//!     }
//!     false
//! }
//!
//! # fn _example<K>(seq: &[Dispatch<K>]) { let _ = run_dispatch(seq); }
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod router;
pub mod types;
