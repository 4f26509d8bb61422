// 👧 Child Entity - Stable identity + spoken identifiers
//
// "Name is a VALUE (can change), id is IDENTITY (never changes)"
//
// The registry is owned by the caller: the parser only reads it, in order.
// Registration order is resolution priority when two children both match.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// CHILD ENTITY
// ============================================================================

/// A child the caregiver can award or deduct points for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    /// Stable identity - opaque to the parser
    pub id: String,

    /// Canonical display name
    pub name: String,

    /// Alternate names the child is called by, or that speech-to-text
    /// tends to produce for the name. Example: ["小萱", "宣宣"]
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Child {
    /// Create new child with a fresh UUID identity
    pub fn new(name: impl Into<String>) -> Self {
        Child {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    /// Create child with a caller-supplied identity
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Child {
            id: id.into(),
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    /// Builder pattern: add aliases in order
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            self.add_alias(alias.into());
        }
        self
    }

    /// Add an alias to this child
    pub fn add_alias(&mut self, alias: String) {
        if !self.aliases.contains(&alias) && alias != self.name {
            self.aliases.push(alias);
        }
    }

    /// Identifiers in resolution order: name first, then aliases
    ///
    /// Empty strings are skipped - an empty identifier is a substring of everything.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str())
            .chain(self.aliases.iter().map(String::as_str))
            .filter(|identifier| !identifier.is_empty())
    }
}

// ============================================================================
// CHILD REGISTRY
// ============================================================================

/// Ordered registry of known children
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildRegistry {
    children: Vec<Child>,
}

impl ChildRegistry {
    /// Create new empty registry
    pub fn new() -> Self {
        ChildRegistry { children: Vec::new() }
    }

    /// Create registry from an ordered list of children
    pub fn from_children(children: Vec<Child>) -> Self {
        ChildRegistry { children }
    }

    /// Load registry from a JSON file (array of children)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read registry file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    /// Parse registry from a JSON string (array of children)
    pub fn from_json(json: &str) -> Result<Self> {
        let children: Vec<Child> =
            serde_json::from_str(json).context("Failed to parse registry JSON")?;

        Ok(ChildRegistry::from_children(children))
    }

    /// Create registry with the two demo children pre-loaded
    pub fn with_defaults() -> Self {
        let mut registry = ChildRegistry::new();
        registry.register_default_children();
        registry
    }

    fn register_default_children(&mut self) {
        // 1. 萱萱
        self.register(Child::with_id("1", "萱萱").with_aliases(["小萱", "宣宣", "轩轩", "喧喧"]));

        // 2. 闹闹
        self.register(Child::with_id("2", "闹闹").with_aliases(["小闹", "挠挠", "恼恼"]));
    }

    /// Register a child at the end (lowest priority)
    pub fn register(&mut self, child: Child) {
        self.children.push(child);
    }

    /// Find child by id
    pub fn find_by_id(&self, id: &str) -> Option<&Child> {
        self.children.iter().find(|c| c.id == id)
    }

    /// All children, in resolution order
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    /// Count registered children
    pub fn count(&self) -> usize {
        self.children.len()
    }

    /// True when no child is registered (every parse is NameNotFound)
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
