// Copyright 2025 the Catalyst Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime configuration.

/// Which attribute mutations a root subscription listens for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AttributeFilter {
    /// Only `data-action`.
    #[default]
    ActionOnly,
    /// Every attribute name registered by a mark when the subscription is created.
    AllRegistered,
}

/// Runtime policies.
///
/// ```
/// use catalyst::{AttributeFilter, Config};
///
/// let config = Config::default().with_attribute_filter(AttributeFilter::AllRegistered);
/// assert!(config.auto_connect);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Attribute mutations observed per root.
    pub attribute_filter: AttributeFilter,
    /// Connect defined custom elements as soon as they are inserted into a document
    /// through [`Runtime::append_child`](crate::Runtime::append_child).
    pub auto_connect: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            attribute_filter: AttributeFilter::default(),
            auto_connect: true,
        }
    }
}

impl Config {
    /// Set the attribute filter.
    #[must_use]
    pub fn with_attribute_filter(mut self, filter: AttributeFilter) -> Self {
        self.attribute_filter = filter;
        self
    }

    /// Enable or disable connecting on insertion.
    #[must_use]
    pub fn with_auto_connect(mut self, auto_connect: bool) -> Self {
        self.auto_connect = auto_connect;
        self
    }
}
