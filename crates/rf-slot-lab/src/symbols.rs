//! Symbol identifiers and the name table

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SlotLabError, SlotLabResult};

/// Dense symbol index assigned when a game definition is compiled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u16);

impl SymbolId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Symbol type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SymbolType {
    /// Regular paying symbol
    Regular = 0,
    /// Wild - substitutes for any paying symbol on a line
    Wild = 1,
    /// Scatter - counted anywhere on the grid toward the bonus trigger
    Scatter = 2,
}

/// Bidirectional name table for the symbols of one game
#[derive(Debug, Clone, Default, Serialize)]
pub struct SymbolTable {
    names: Vec<String>,
    #[serde(skip)]
    lookup: HashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new symbol; names must be unique
    pub fn insert(&mut self, name: &str) -> SlotLabResult<SymbolId> {
        if self.lookup.contains_key(name) {
            return Err(SlotLabError::DuplicateSymbol(name.to_string()));
        }
        let id = u16::try_from(self.names.len())
            .map(SymbolId)
            .map_err(|_| SlotLabError::InvalidConfig("too many symbols".into()))?;
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), id);
        Ok(id)
    }

    /// Return the existing id for `name`, registering it if needed
    pub fn get_or_insert(&mut self, name: &str) -> SlotLabResult<SymbolId> {
        match self.lookup.get(name) {
            Some(&id) => Ok(id),
            None => self.insert(name),
        }
    }

    /// Resolve a name that must already be registered
    pub fn resolve(&self, name: &str) -> SlotLabResult<SymbolId> {
        self.lookup
            .get(name)
            .copied()
            .ok_or_else(|| SlotLabError::UnknownSymbol(name.to_string()))
    }

    pub fn id(&self, name: &str) -> Option<SymbolId> {
        self.lookup.get(name).copied()
    }

    /// Symbol name, or `"?"` for an id this table never issued
    pub fn name(&self, id: SymbolId) -> &str {
        self.names.get(id.index()).map(String::as_str).unwrap_or("?")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (SymbolId(i as u16), name.as_str()))
    }
}
