//! Exit region directory
//!
//! Read-only catalog of the two-letter region codes Tor accepts in
//! `ExitNodes {cc}` together with a human-readable name. Used both for the
//! keyword query and for strict validation before any host mutation.

mod catalog;

use std::fmt;

/// One catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Upper-case ISO 3166-1 alpha-2 code
    pub code: &'static str,
    pub name: &'static str,
}

impl Region {
    pub(crate) const fn new(code: &'static str, name: &'static str) -> Self {
        Self { code, name }
    }

    /// Code as written into torrc (`{us}`)
    pub fn tor_code(&self) -> String {
        self.code.to_ascii_lowercase()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.name)
    }
}

/// Region lookup over the compiled-in catalog
#[derive(Debug, Clone, Copy)]
pub struct RegionDirectory {
    regions: &'static [Region],
}

impl RegionDirectory {
    pub fn new() -> Self {
        Self { regions: catalog::REGIONS }
    }

    /// Case-insensitive substring search over the rendered `[CODE] Name` form
    ///
    /// Matches come back in catalog order. An empty keyword matches every entry.
    pub fn search(&self, keyword: &str) -> Vec<&'static Region> {
        let needle = keyword.to_lowercase();
        self.regions
            .iter()
            .filter(|region| region.to_string().to_lowercase().contains(&needle))
            .collect()
    }

    /// Exact, case-insensitive code membership
    pub fn is_valid(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    /// Catalog entry for a code, if any
    ///
    /// The input must be the bare code; surrounding whitespace does not match.
    pub fn lookup(&self, code: &str) -> Option<&'static Region> {
        self.regions.iter().find(|region| region.code.eq_ignore_ascii_case(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for RegionDirectory {
    fn default() -> Self {
        Self::new()
    }
}
