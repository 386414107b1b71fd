//! Interface to the sub-graph matcher that finds pattern occurrences.
//!
//! The matcher itself lives outside this crate. It receives
//! [`PatternDefinition`]s through a [`PatternRegistry`] and, for each
//! occurrence it finds, hands a [`PatternMatch`] back to
//! [`Pam5Rules::apply`](super::Pam5Rules::apply).

use super::error::Error;
use super::motif::Motif;
use crate::model::atom::AtomId;
use crate::model::part::Part;
use crate::model::types::BondOrder;
use std::fmt;

/// One atom slot of a pattern, labelled with the atom class it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternAtom {
    pub index: usize,
    pub type_label: String,
}

impl PatternAtom {
    pub fn new(index: usize, type_label: impl Into<String>) -> Self {
        Self {
            index,
            type_label: type_label.into(),
        }
    }
}

/// A bond the matcher must find between two slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

impl Traversal {
    pub fn new(a: &PatternAtom, b: &PatternAtom, order: BondOrder) -> Self {
        Self {
            a: a.index,
            b: b.index,
            order,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternDefinition {
    pub name: &'static str,
    pub motif: Motif,
    pub atoms: Vec<PatternAtom>,
    pub traversals: Vec<Traversal>,
}

impl PatternDefinition {
    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn traversal_count(&self) -> usize {
        self.traversals.len()
    }
}

/// Receives pattern definitions for a construction run.
pub trait PatternRegistry {
    fn register_pattern(&mut self, pattern: PatternDefinition);
}

/// A registry that simply keeps the definitions, in registration order.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    patterns: Vec<PatternDefinition>,
}

impl PatternCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> &[PatternDefinition] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PatternDefinition> {
        self.patterns.iter().find(|p| p.name == name)
    }
}

impl PatternRegistry for PatternCatalog {
    fn register_pattern(&mut self, pattern: PatternDefinition) {
        self.patterns.push(pattern);
    }
}

/// One occurrence of a pattern in a part.
///
/// `atom_indices[slot]` is the index into `part.atoms` bound to that slot.
#[derive(Debug)]
pub struct PatternMatch<'a> {
    pub sequence_number: u32,
    pub part: &'a mut Part,
    pub atom_indices: Vec<usize>,
}

impl<'a> PatternMatch<'a> {
    pub fn new(sequence_number: u32, part: &'a mut Part, atom_indices: Vec<usize>) -> Self {
        Self {
            sequence_number,
            part,
            atom_indices,
        }
    }

    /// Id of the atom bound to `slot`.
    pub fn atom(&self, slot: usize) -> Result<AtomId, Error> {
        let index = *self
            .atom_indices
            .get(slot)
            .ok_or(Error::SlotOutOfRange {
                slot,
                len: self.atom_indices.len(),
            })?;
        self.part
            .atom_at(index)
            .map(|a| a.id)
            .ok_or(Error::UnknownAtom { index })
    }
}

impl fmt::Display for PatternMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match [{}]:", self.sequence_number)?;
        for (slot, &index) in self.atom_indices.iter().enumerate() {
            match self.part.atom_at(index) {
                Some(atom) => write!(f, " {slot}={}({})", atom.id, atom.atom_type.name)?,
                None => write!(f, " {slot}=?")?,
            }
        }
        Ok(())
    }
}
