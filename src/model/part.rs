use super::atom::{Atom, AtomId};
use super::stretch::Stretch;
use super::types::{BondDirection, BondOrder};
use crate::pattern::Error;
use std::collections::HashMap;
use std::fmt;

/// A bond between two atoms, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub a1: AtomId,
    pub a2: AtomId,
    pub order: BondOrder,
    pub direction: BondDirection,
}

impl Bond {
    pub fn new(a1: AtomId, a2: AtomId, order: BondOrder) -> Self {
        Self {
            a1,
            a2,
            order,
            direction: BondDirection::Undefined,
        }
    }

    pub fn with_direction(mut self, direction: BondDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Whether this bond joins `a` and `b`, in either order.
    pub fn connects(&self, a: AtomId, b: AtomId) -> bool {
        (self.a1 == a && self.a2 == b) || (self.a1 == b && self.a2 == a)
    }
}

type ErrorCallback = Box<dyn FnMut(&Error)>;

/// The molecule under construction.
///
/// Owns the atoms, their positions (parallel to `atoms`, `None` for virtual
/// atoms), bonds and stretch terms, plus the queues of atoms and bonds that
/// pattern rules have produced but that have not been committed yet.
/// Atoms, pending atoms, bonds and stretches are indexed by atom id.
#[derive(Default)]
pub struct Part {
    pub atoms: Vec<Atom>,
    pub positions: Vec<Option<[f64; 3]>>,
    bonds: Vec<Bond>,
    stretches: Vec<Stretch>,
    pending_atoms: Vec<Atom>,
    pending_bonds: Vec<Bond>,
    index_by_id: HashMap<AtomId, usize>,
    pending_by_id: HashMap<AtomId, usize>,
    bonds_by_atom: HashMap<AtomId, Vec<usize>>,
    stretches_by_atom: HashMap<AtomId, Vec<usize>>,
    max_atom_id: u32,
    failure: Option<String>,
    on_error: Option<ErrorCallback>,
}

fn link(adjacency: &mut HashMap<AtomId, Vec<usize>>, a1: AtomId, a2: AtomId, index: usize) {
    adjacency.entry(a1).or_default().push(index);
    if a2 != a1 {
        adjacency.entry(a2).or_default().push(index);
    }
}

impl Part {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the callback invoked when construction hits a fatal error.
    pub fn set_error_callback(&mut self, callback: impl FnMut(&Error) + 'static) {
        self.on_error = Some(Box::new(callback));
    }

    /// Adds a committed atom and returns its index.
    ///
    /// Real atoms should be given a position; virtual atoms never have one.
    pub fn add_atom(&mut self, atom: Atom, position: Option<[f64; 3]>) -> usize {
        let index = self.atoms.len();
        self.max_atom_id = self.max_atom_id.max(atom.id.0);
        self.index_by_id.insert(atom.id, index);
        let position = if atom.is_virtual() { None } else { position };
        self.atoms.push(atom);
        self.positions.push(position);
        index
    }

    pub fn add_bond(&mut self, bond: Bond) {
        link(&mut self.bonds_by_atom, bond.a1, bond.a2, self.bonds.len());
        self.bonds.push(bond);
    }

    pub fn add_stretch(&mut self, stretch: Stretch) {
        link(
            &mut self.stretches_by_atom,
            stretch.a1,
            stretch.a2,
            self.stretches.len(),
        );
        self.stretches.push(stretch);
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn stretches(&self) -> &[Stretch] {
        &self.stretches
    }

    #[inline]
    pub fn atom_at(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    /// Looks up an atom by id among committed and pending atoms.
    pub fn find_atom(&self, id: AtomId) -> Option<&Atom> {
        match self.index_by_id.get(&id) {
            Some(&index) => self.atoms.get(index),
            None => self
                .pending_by_id
                .get(&id)
                .and_then(|&index| self.pending_atoms.get(index)),
        }
    }

    /// Position of a committed real atom.
    pub fn position(&self, id: AtomId) -> Option<[f64; 3]> {
        let index = *self.index_by_id.get(&id)?;
        self.positions.get(index).copied().flatten()
    }

    pub fn bond_between(&self, a: AtomId, b: AtomId) -> Result<&Bond, Error> {
        self.bonds_by_atom
            .get(&a)
            .into_iter()
            .flatten()
            .filter_map(|&index| self.bonds.get(index))
            .find(|bond| bond.connects(a, b))
            .ok_or(Error::MissingBond { a, b })
    }

    pub fn stretch_between_mut(&mut self, a: AtomId, b: AtomId) -> Result<&mut Stretch, Error> {
        let index = self
            .stretches_by_atom
            .get(&a)
            .into_iter()
            .flatten()
            .copied()
            .find(|&index| self.stretches.get(index).is_some_and(|s| s.connects(a, b)))
            .ok_or(Error::MissingStretchRecord { a, b })?;
        Ok(&mut self.stretches[index])
    }

    /// Reserves `count` fresh consecutive ids past every id seen so far.
    ///
    /// Nothing is reserved if the ids would not fit in the id space.
    pub fn allocate_atom_ids(&mut self, count: u32) -> Result<Vec<AtomId>, Error> {
        let first = self.max_atom_id;
        let last = first.checked_add(count).ok_or(Error::AtomIdExhausted {
            max: AtomId(first),
            requested: count,
        })?;
        self.max_atom_id = last;
        Ok((first + 1..=last).map(AtomId).collect())
    }

    pub fn queue_atom(&mut self, atom: Atom) {
        self.max_atom_id = self.max_atom_id.max(atom.id.0);
        self.pending_by_id.insert(atom.id, self.pending_atoms.len());
        self.pending_atoms.push(atom);
    }

    pub fn queue_bond(&mut self, bond: Bond) {
        self.pending_bonds.push(bond);
    }

    pub fn pending_atoms(&self) -> &[Atom] {
        &self.pending_atoms
    }

    pub fn pending_bonds(&self) -> &[Bond] {
        &self.pending_bonds
    }

    /// Moves queued atoms and bonds into the committed arrays.
    ///
    /// Does nothing once construction has failed.
    pub fn commit_pending(&mut self) {
        if self.has_failed() {
            return;
        }
        self.pending_by_id.clear();
        for atom in std::mem::take(&mut self.pending_atoms) {
            self.add_atom(atom, None);
        }
        for bond in std::mem::take(&mut self.pending_bonds) {
            self.add_bond(bond);
        }
    }

    /// Records a fatal construction error and notifies the error callback.
    ///
    /// Only the first failure is kept.
    pub fn report_failure(&mut self, error: &Error) {
        tracing::error!("{error}");
        if self.failure.is_none() {
            self.failure = Some(error.to_string());
        }
        if let Some(callback) = self.on_error.as_mut() {
            callback(error);
        }
    }

    #[inline]
    pub fn has_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("atoms", &self.atoms.len())
            .field("bonds", &self.bonds.len())
            .field("stretches", &self.stretches.len())
            .field("pending_atoms", &self.pending_atoms.len())
            .field("pending_bonds", &self.pending_bonds.len())
            .field("failure", &self.failure)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::{AtomType, VirtualConstruction};
    use crate::model::stretch::BondStretchType;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    fn sugar() -> Arc<AtomType> {
        Arc::new(AtomType::new("Ss5", 201, false))
    }

    fn make_pair() -> Part {
        let mut part = Part::new();
        part.add_atom(Atom::new(AtomId(3), sugar()), Some([0.0, 0.0, 0.0]));
        part.add_atom(Atom::new(AtomId(8), sugar()), Some([1.0, 0.0, 0.0]));
        part.add_bond(
            Bond::new(AtomId(3), AtomId(8), BondOrder::Single)
                .with_direction(BondDirection::Forward),
        );
        part.add_stretch(Stretch::new(
            AtomId(3),
            AtomId(8),
            Arc::new(BondStretchType::quadratic("Ss5-Ss5", 100.0, 600.0)),
        ));
        part
    }

    #[test]
    fn bond_new_defaults_to_undefined_direction() {
        let bond = Bond::new(AtomId(1), AtomId(2), BondOrder::Single);
        assert_eq!(bond.direction, BondDirection::Undefined);
        assert!(bond.connects(AtomId(2), AtomId(1)));
    }

    #[test]
    fn lookups_by_id() {
        let part = make_pair();
        assert_eq!(part.atom_count(), 2);
        assert_eq!(part.find_atom(AtomId(8)).unwrap().id, AtomId(8));
        assert_eq!(part.position(AtomId(8)), Some([1.0, 0.0, 0.0]));
        assert!(part.find_atom(AtomId(5)).is_none());
        assert!(part.bond_between(AtomId(8), AtomId(3)).is_ok());
    }

    #[test]
    fn missing_bond_is_an_error() {
        let part = make_pair();
        let err = part.bond_between(AtomId(3), AtomId(5)).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingBond {
                a: AtomId(3),
                b: AtomId(5)
            }
        ));
    }

    #[test]
    fn allocated_ids_follow_max_id() {
        let mut part = make_pair();
        assert_eq!(part.allocate_atom_ids(2).unwrap(), [AtomId(9), AtomId(10)]);
        assert_eq!(part.allocate_atom_ids(1).unwrap(), [AtomId(11)]);
        assert!(part.allocate_atom_ids(0).unwrap().is_empty());
    }

    #[test]
    fn allocation_past_the_id_space_fails_without_reserving() {
        let mut part = make_pair();
        part.add_atom(Atom::new(AtomId(u32::MAX - 2), sugar()), Some([2.0, 0.0, 0.0]));
        assert!(matches!(
            part.allocate_atom_ids(3),
            Err(Error::AtomIdExhausted { requested: 3, .. })
        ));
        assert_eq!(
            part.allocate_atom_ids(2).unwrap(),
            [AtomId(u32::MAX - 1), AtomId(u32::MAX)]
        );
        assert!(part.allocate_atom_ids(1).is_err());
    }

    #[test]
    fn pending_atoms_are_found_by_id() {
        let mut part = make_pair();
        let vtype = Arc::new(AtomType::new("vDa1", 300, true));
        let ids = part.allocate_atom_ids(500).unwrap();
        for &id in &ids {
            let c = VirtualConstruction::sp3(AtomId(3), AtomId(8), AtomId(8), 0.1, 0.2);
            part.queue_atom(Atom::new_virtual(id, vtype.clone(), c));
        }
        for &id in ids.iter().rev() {
            assert_eq!(part.find_atom(id).unwrap().id, id);
        }
        part.commit_pending();
        assert_eq!(part.find_atom(ids[250]).unwrap().id, ids[250]);
        assert!(part.find_atom(AtomId(10_000)).is_none());
    }

    #[test]
    fn lookups_see_bonds_in_either_order() {
        let mut part = make_pair();
        part.add_atom(Atom::new(AtomId(5), sugar()), Some([2.0, 0.0, 0.0]));
        part.add_bond(Bond::new(AtomId(8), AtomId(5), BondOrder::Single));
        assert_eq!(part.bond_between(AtomId(5), AtomId(8)).unwrap().a1, AtomId(8));
        assert_eq!(part.bond_between(AtomId(3), AtomId(8)).unwrap().a2, AtomId(8));
        assert!(part.bond_between(AtomId(3), AtomId(5)).is_err());
        assert!(part.stretch_between_mut(AtomId(8), AtomId(3)).is_ok());
        assert!(matches!(
            part.stretch_between_mut(AtomId(8), AtomId(5)),
            Err(Error::MissingStretchRecord { .. })
        ));
    }

    #[test]
    fn virtual_atoms_never_get_a_position() {
        let mut part = make_pair();
        let vtype = Arc::new(AtomType::new("vDa1", 300, true));
        let c = VirtualConstruction::sp3(AtomId(3), AtomId(8), AtomId(8), 0.1, 0.2);
        let index = part.add_atom(
            Atom::new_virtual(AtomId(20), vtype, c),
            Some([5.0, 5.0, 5.0]),
        );
        assert_eq!(part.positions[index], None);
    }

    #[test]
    fn commit_moves_pending_queues() {
        let mut part = make_pair();
        let vtype = Arc::new(AtomType::new("vDa1", 300, true));
        let id = part.allocate_atom_ids(1).unwrap()[0];
        let c = VirtualConstruction::sp3(AtomId(3), AtomId(8), AtomId(8), 0.1, 0.2);
        part.queue_atom(Atom::new_virtual(id, vtype, c));
        part.queue_bond(Bond::new(id, AtomId(3), BondOrder::Single));
        assert!(part.find_atom(id).is_some());

        part.commit_pending();
        assert!(part.pending_atoms().is_empty());
        assert!(part.pending_bonds().is_empty());
        assert_eq!(part.atom_count(), 3);
        assert_eq!(part.bond_count(), 2);
        assert_eq!(part.position(id), None);
        assert!(part.find_atom(id).unwrap().is_virtual());
        assert!(part.bond_between(AtomId(3), id).is_ok());
    }

    #[test]
    fn failure_is_recorded_once_and_blocks_commit() {
        let mut part = make_pair();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        part.set_error_callback(move |e| sink.borrow_mut().push(e.to_string()));

        part.queue_bond(Bond::new(AtomId(3), AtomId(8), BondOrder::Single));
        part.report_failure(&Error::MinimizerRequired);
        part.report_failure(&Error::UnknownAtom { index: 99 });

        assert!(part.has_failed());
        assert_eq!(part.failure(), Some(Error::MinimizerRequired.to_string().as_str()));
        assert_eq!(seen.borrow().len(), 2);

        part.commit_pending();
        assert_eq!(part.bond_count(), 1);
        assert_eq!(part.pending_bonds().len(), 1);
    }
}
