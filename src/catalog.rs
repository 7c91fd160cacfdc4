//! The strand catalog: the fixed, ordered set of learning strands.
//!
//! The catalog is static configuration loaded once at startup (built-in
//! defaults or the `[catalog]` section of `.classlens.toml`) and never
//! mutated afterwards. Every aggregation walks strands in catalog order.

use serde::{Deserialize, Serialize};

/// One learning strand: a display name plus the key used to index into
/// a student's per-strand record map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strand {
    /// Display name, e.g. "Letter Identification".
    pub name: String,
    /// Wire key into `StudentRecord::strands`, e.g. `letterIdentification`.
    pub key: String,
}

impl Strand {
    pub fn new(name: &str, key: &str) -> Self {
        Self {
            name: name.to_string(),
            key: key.to_string(),
        }
    }
}

/// Ordered strand catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrandCatalog {
    strands: Vec<Strand>,
}

impl Default for StrandCatalog {
    /// The built-in literacy catalog.
    fn default() -> Self {
        Self {
            strands: vec![
                Strand::new("Letter Identification", "letterIdentification"),
                Strand::new("Letter Naming", "letterNaming"),
                Strand::new("Letter Formation", "letterFormation"),
                Strand::new("Phonemic Awareness", "phonemicAwareness"),
            ],
        }
    }
}

impl StrandCatalog {
    /// Build a catalog from an explicit strand list (config override).
    pub fn new(strands: Vec<Strand>) -> Self {
        Self { strands }
    }

    pub fn len(&self) -> usize {
        self.strands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strands.is_empty()
    }

    /// Strands in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Strand> {
        self.strands.iter()
    }

    /// Look up a strand by its display name (case-insensitive, so CLI
    /// arguments like `"letter naming"` resolve).
    pub fn by_name(&self, name: &str) -> Option<&Strand> {
        self.strands
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Look up a strand by its wire key.
    #[allow(dead_code)] // Utility for key-based lookups
    pub fn by_key(&self, key: &str) -> Option<&Strand> {
        self.strands.iter().find(|s| s.key == key)
    }
}
