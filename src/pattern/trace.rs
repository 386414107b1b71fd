//! Diagnostic records describing each change a pattern rule makes.
//!
//! Every mutation produces one [`TraceRecord`]. Records render to the
//! simulator's trace-file line format:
//!
//! ```text
//! # Pattern makeBond: [7] 10 11 2.000000 1120.000000
//! # Pattern makeVirtualAtom: [3] {40} 3 1 12 14 15 x 0.700000 0.150000 0.000000
//! # Pattern setStretchType: [9] 21 22 120.000000 368.000000
//! ```
//!
//! Virtual atoms render with braces, absent construction slots as `x`.

use super::error::Error;
use super::params::ParameterStore;
use crate::model::atom::{Atom, AtomId};
use crate::model::part::{Bond, Part};
use crate::model::stretch::Stretch;
use std::fmt;

/// An atom as it appears in a trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomRef {
    pub id: AtomId,
    pub is_virtual: bool,
}

impl AtomRef {
    /// Resolves `id` against the part to learn whether it is virtual.
    pub fn resolve(part: &Part, id: AtomId) -> Self {
        Self {
            id,
            is_virtual: part.find_atom(id).is_some_and(Atom::is_virtual),
        }
    }
}

impl fmt::Display for AtomRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_virtual {
            write!(f, "{{{}}}", self.id)
        } else {
            write!(f, "{}", self.id)
        }
    }
}

struct Slot(Option<AtomRef>);

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(atom) => atom.fmt(f),
            None => f.write_str("x"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecord {
    MakeBond {
        sequence: u32,
        a1: AtomRef,
        a2: AtomRef,
        ks: f64,
        r0: f64,
    },
    MakeVirtualAtom {
        sequence: u32,
        atom: AtomRef,
        construction_atoms: usize,
        function: u32,
        references: [Option<AtomRef>; 4],
        coefficients: [f64; 3],
    },
    SetStretchType {
        sequence: u32,
        a1: AtomRef,
        a2: AtomRef,
        ks: f64,
        r0: f64,
    },
}

impl TraceRecord {
    /// Record for a new bond, with the force field constants that will
    /// govern it.
    pub fn make_bond(
        sequence: u32,
        part: &Part,
        store: &ParameterStore,
        bond: &Bond,
    ) -> Result<Self, Error> {
        let type_name = |id: AtomId| {
            part.find_atom(id)
                .map(|a| a.atom_type.name.as_str())
                .ok_or(Error::UnknownAtomId { id })
        };
        let stretch = store.bond_stretch(type_name(bond.a1)?, type_name(bond.a2)?, bond.order)?;
        Ok(Self::MakeBond {
            sequence,
            a1: AtomRef::resolve(part, bond.a1),
            a2: AtomRef::resolve(part, bond.a2),
            ks: stretch.ks,
            r0: stretch.r0,
        })
    }

    /// Record for a new virtual atom; real atoms are recorded with an
    /// empty construction.
    pub fn make_virtual_atom(sequence: u32, part: &Part, atom: &Atom) -> Self {
        let (function, references, coefficients) = match &atom.construction {
            Some(c) => (
                c.function.code(),
                c.atoms.map(|id| id.map(|id| AtomRef::resolve(part, id))),
                c.coefficients,
            ),
            None => (0, [None; 4], [0.0; 3]),
        };
        Self::MakeVirtualAtom {
            sequence,
            atom: AtomRef {
                id: atom.id,
                is_virtual: atom.is_virtual(),
            },
            construction_atoms: atom.construction_atom_count(),
            function,
            references,
            coefficients,
        }
    }

    pub fn set_stretch_type(sequence: u32, part: &Part, stretch: &Stretch) -> Self {
        Self::SetStretchType {
            sequence,
            a1: AtomRef::resolve(part, stretch.a1),
            a2: AtomRef::resolve(part, stretch.a2),
            ks: stretch.stretch_type.ks,
            r0: stretch.stretch_type.r0,
        }
    }

    pub fn sequence(&self) -> u32 {
        match self {
            TraceRecord::MakeBond { sequence, .. }
            | TraceRecord::MakeVirtualAtom { sequence, .. }
            | TraceRecord::SetStretchType { sequence, .. } => *sequence,
        }
    }

    /// Name of the operation as written in trace files.
    pub fn operation(&self) -> &'static str {
        match self {
            TraceRecord::MakeBond { .. } => "makeBond",
            TraceRecord::MakeVirtualAtom { .. } => "makeVirtualAtom",
            TraceRecord::SetStretchType { .. } => "setStretchType",
        }
    }

    /// Full trace-file line, without the trailing newline.
    pub fn line(&self) -> String {
        format!("# Pattern {}: {}", self.operation(), self)
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceRecord::MakeBond {
                sequence,
                a1,
                a2,
                ks,
                r0,
            }
            | TraceRecord::SetStretchType {
                sequence,
                a1,
                a2,
                ks,
                r0,
            } => write!(f, "[{sequence}] {a1} {a2} {ks:.6} {r0:.6}"),
            TraceRecord::MakeVirtualAtom {
                sequence,
                atom,
                construction_atoms,
                function,
                references: [r1, r2, r3, r4],
                coefficients: [a, b, c],
            } => write!(
                f,
                "[{sequence}] {atom} {construction_atoms} {function} {} {} {} {} {a:.6} {b:.6} {c:.6}",
                Slot(*r1),
                Slot(*r2),
                Slot(*r3),
                Slot(*r4),
            ),
        }
    }
}

/// Destination for trace records.
pub trait TraceSink {
    fn write_record(&mut self, record: &TraceRecord);
}

/// Forwards records to `tracing` at debug level under the `pam5::trace`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn write_record(&mut self, record: &TraceRecord) {
        tracing::debug!(
            target: "pam5::trace",
            sequence = record.sequence(),
            operation = record.operation(),
            "{}",
            record.line()
        );
    }
}

/// Keeps every record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<TraceRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered trace-file lines, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.records.iter().map(TraceRecord::line).collect()
    }
}

impl TraceSink for MemorySink {
    fn write_record(&mut self, record: &TraceRecord) {
        self.records.push(record.clone());
    }
}
