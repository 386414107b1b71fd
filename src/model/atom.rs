use std::fmt;
use std::sync::Arc;

/// Identifier of an atom within a [`Part`](super::part::Part).
///
/// Ids are stable across commits and are what virtual atoms, bonds and
/// stretches use to refer back to other atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(pub u32);

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chemical or pseudo-atom type from the force field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomType {
    /// Short name, e.g. `Ss5` or `vDa3`.
    pub name: String,
    /// Pseudo-atom number used to key force field tables.
    pub number: u32,
    /// Massless site whose position is derived from other atoms.
    pub is_virtual: bool,
}

impl AtomType {
    pub fn new(name: impl Into<String>, number: u32, is_virtual: bool) -> Self {
        Self {
            name: name.into(),
            number,
            is_virtual,
        }
    }
}

/// How a virtual atom's position is computed from its construction atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualFunction {
    /// Weighted sp3-style combination of a center and two neighbors.
    Sp3,
}

impl VirtualFunction {
    /// Numeric code written to trace records.
    pub fn code(&self) -> u32 {
        match self {
            VirtualFunction::Sp3 => 1,
        }
    }
}

/// Construction record of a virtual atom.
///
/// Holds weak references (ids) to up to four construction atoms plus the
/// three combination coefficients. The position itself is evaluated later
/// by the integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualConstruction {
    pub function: VirtualFunction,
    pub atoms: [Option<AtomId>; 4],
    pub coefficients: [f64; 3],
}

impl VirtualConstruction {
    /// Sp3 construction from a center atom and its two neighbors.
    pub fn sp3(center: AtomId, a: AtomId, b: AtomId, p: f64, q: f64) -> Self {
        Self {
            function: VirtualFunction::Sp3,
            atoms: [Some(center), Some(a), Some(b), None],
            coefficients: [p, q, 0.0],
        }
    }

    /// Number of construction atoms referenced.
    pub fn atom_count(&self) -> usize {
        self.atoms.iter().flatten().count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub id: AtomId,
    pub atom_type: Arc<AtomType>,
    pub construction: Option<VirtualConstruction>,
}

impl Atom {
    /// A real atom; its position is stored by the owning part.
    pub fn new(id: AtomId, atom_type: Arc<AtomType>) -> Self {
        Self {
            id,
            atom_type,
            construction: None,
        }
    }

    pub fn new_virtual(
        id: AtomId,
        atom_type: Arc<AtomType>,
        construction: VirtualConstruction,
    ) -> Self {
        Self {
            id,
            atom_type,
            construction: Some(construction),
        }
    }

    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.construction.is_some()
    }

    /// Number of construction atoms, zero for real atoms.
    #[inline]
    pub fn construction_atom_count(&self) -> usize {
        self.construction
            .as_ref()
            .map_or(0, VirtualConstruction::atom_count)
    }
}
