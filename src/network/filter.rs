//! Interface filtering for selective monitoring.
//!
//! # Design
//!
//! - **Pure Matchers**: [`KindFilter`], [`NameRegexFilter`] and [`VirtualFilter`]
//!   only answer "does this interface match?" without include/exclude semantics.
//! - **Filter Chain**: [`FilterChain`] combines matchers:
//!   - Exclude filters: AND logic (must pass ALL excludes)
//!   - Include filters: OR logic (pass ANY include, empty = match all)
//! - **Decorator**: [`FilteredFetcher`] applies filtering transparently
//!   to any [`InterfaceFetcher`] implementation.

use std::collections::HashSet;

use regex::Regex;

use super::{FetchError, Interface, InterfaceFetcher, InterfaceKind, Interfaces};

/// Decides whether an interface takes part in monitoring.
pub trait InterfaceFilter: Send + Sync {
    /// Returns `true` if the interface should be included, `false` to filter it out.
    fn matches(&self, interface: &Interface) -> bool;
}

// ============================================================================
// KindFilter - Pure matcher by interface kind
// ============================================================================

/// Matches interfaces whose kind is in the configured set.
///
/// # Examples
///
/// ```
/// use netif_watch::network::filter::{InterfaceFilter, KindFilter};
/// use netif_watch::network::{Interface, InterfaceKind};
///
/// let filter = KindFilter::new([InterfaceKind::WiFi, InterfaceKind::Ethernet]);
///
/// assert!(filter.matches(&Interface::new("eth0", InterfaceKind::Ethernet)));
/// assert!(!filter.matches(&Interface::new("lo", InterfaceKind::Loopback)));
/// ```
#[derive(Debug, Clone)]
pub struct KindFilter {
    kinds: HashSet<InterfaceKind>,
}

impl KindFilter {
    /// Creates a kind filter matching any of the specified kinds.
    #[must_use]
    pub fn new(kinds: impl IntoIterator<Item = InterfaceKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Returns true if no kinds are configured (matches nothing).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Returns the number of kinds in the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }
}

impl InterfaceFilter for KindFilter {
    fn matches(&self, interface: &Interface) -> bool {
        self.kinds.contains(&interface.kind)
    }
}

// ============================================================================
// VirtualFilter
// ============================================================================

/// Matches software-backed interfaces (bridges, tunnels, loopback).
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualFilter;

impl InterfaceFilter for VirtualFilter {
    fn matches(&self, interface: &Interface) -> bool {
        interface.is_virtual
    }
}

// ============================================================================
// NameRegexFilter - Pure matcher by name pattern
// ============================================================================

/// Matches interfaces whose id or alias matches a regex.
///
/// On Windows the id is an adapter GUID, so users usually write patterns
/// against the alias ("Ethernet", "Wi-Fi").
///
/// # Examples
///
/// ```
/// use netif_watch::network::filter::{InterfaceFilter, NameRegexFilter};
/// use netif_watch::network::{Interface, InterfaceKind};
///
/// let filter = NameRegexFilter::new(r"^eth").unwrap();
///
/// assert!(filter.matches(&Interface::new("eth0", InterfaceKind::Ethernet)));
/// assert!(!filter.matches(&Interface::new("wlan0", InterfaceKind::WiFi)));
/// ```
#[derive(Debug, Clone)]
pub struct NameRegexFilter {
    pattern: Regex,
}

impl NameRegexFilter {
    /// Creates a name filter with the given regex pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Wraps an already compiled regex.
    #[must_use]
    pub const fn from_regex(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Returns a reference to the regex pattern.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Regex is not a const type
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

impl InterfaceFilter for NameRegexFilter {
    fn matches(&self, interface: &Interface) -> bool {
        self.pattern.is_match(&interface.id) || self.pattern.is_match(&interface.alias)
    }
}

// ============================================================================
// FilterChain - Include OR / Exclude AND semantics
// ============================================================================

/// Filter chain with include/exclude semantics.
///
/// Evaluation order:
/// 1. **Exclude filters (AND)**: Any match → reject.
/// 2. **Include filters (OR)**: Any match → accept. Empty includes = match all.
///
/// # Examples
///
/// ```
/// use netif_watch::network::filter::{FilterChain, InterfaceFilter, KindFilter, VirtualFilter};
/// use netif_watch::network::{Interface, InterfaceKind};
///
/// let chain = FilterChain::new()
///     .exclude(VirtualFilter)
///     .include(KindFilter::new([InterfaceKind::WiFi, InterfaceKind::Ethernet]));
///
/// let eth = Interface::new("eth0", InterfaceKind::Ethernet);
/// let bridge = Interface::new("br0", InterfaceKind::Ethernet).with_virtual(true);
/// let loopback = Interface::new("lo", InterfaceKind::Loopback);
///
/// assert!(chain.matches(&eth));
/// assert!(!chain.matches(&bridge));
/// assert!(!chain.matches(&loopback));
/// ```
#[derive(Default)]
pub struct FilterChain {
    includes: Vec<Box<dyn InterfaceFilter>>,
    excludes: Vec<Box<dyn InterfaceFilter>>,
}

impl FilterChain {
    /// Creates an empty filter chain (matches all interfaces).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an include filter (OR semantics).
    #[must_use]
    pub fn include<F: InterfaceFilter + 'static>(mut self, filter: F) -> Self {
        self.includes.push(Box::new(filter));
        self
    }

    /// Adds an exclude filter (AND semantics - must not match ANY).
    #[must_use]
    pub fn exclude<F: InterfaceFilter + 'static>(mut self, filter: F) -> Self {
        self.excludes.push(Box::new(filter));
        self
    }

    /// Returns the number of include filters.
    #[must_use]
    pub fn include_count(&self) -> usize {
        self.includes.len()
    }

    /// Returns the number of exclude filters.
    #[must_use]
    pub fn exclude_count(&self) -> usize {
        self.excludes.len()
    }

    /// Returns true if no filters are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}

impl InterfaceFilter for FilterChain {
    fn matches(&self, interface: &Interface) -> bool {
        if self.excludes.iter().any(|f| f.matches(interface)) {
            return false;
        }

        self.includes.is_empty() || self.includes.iter().any(|f| f.matches(interface))
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("include_count", &self.includes.len())
            .field("exclude_count", &self.excludes.len())
            .finish()
    }
}

// ============================================================================
// FilteredFetcher
// ============================================================================

/// A fetcher decorator that drops interfaces rejected by a filter.
///
/// Filtered-out interfaces look absent to the monitor, so an interface
/// that starts matching is reported as added and one that stops is
/// reported as removed.
#[derive(Debug)]
pub struct FilteredFetcher<F, A> {
    inner: F,
    filter: A,
}

impl<F, A> FilteredFetcher<F, A> {
    /// Creates a new filtered fetcher.
    #[must_use]
    pub const fn new(inner: F, filter: A) -> Self {
        Self { inner, filter }
    }

    /// Returns a reference to the inner fetcher.
    pub const fn inner(&self) -> &F {
        &self.inner
    }

    /// Returns a reference to the filter.
    pub const fn filter(&self) -> &A {
        &self.filter
    }
}

impl<F: InterfaceFetcher, A: InterfaceFilter> InterfaceFetcher for FilteredFetcher<F, A> {
    fn fetch(&self) -> Result<Interfaces, FetchError> {
        let mut interfaces = self.inner.fetch()?;
        interfaces.retain(|_, interface| self.filter.matches(interface));
        Ok(interfaces)
    }
}

impl<T: InterfaceFilter + ?Sized> InterfaceFilter for &T {
    fn matches(&self, interface: &Interface) -> bool {
        (*self).matches(interface)
    }
}

impl InterfaceFilter for Box<dyn InterfaceFilter> {
    fn matches(&self, interface: &Interface) -> bool {
        self.as_ref().matches(interface)
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
