//! Structural pattern rules for PAM5 reduced DNA models.
//!
//! PAM5 represents each nucleotide by a handful of pseudo-atoms: an axis
//! ("groove") site, a sugar and a phosphate. A generic sub-graph matcher
//! finds small motifs in the structure being built and hands each
//! occurrence to the rules in this crate, which then add the bonds and
//! virtual sites that give the duplex its stiffness, or retune the
//! phosphate-sugar stretch terms according to strand direction.
//!
//! # Features
//!
//! - **Five motifs**: basepair, stack, phosphate-sugar,
//!   phosphate-phosphate and groove-phosphate
//! - **Stacking sites**: eight pairs of sp3 virtual atoms per stacked base
//!   pair, with a chirality check that keeps their placement consistent
//! - **Directional stretches**: 5'-to-3' aware phosphate-sugar constants
//! - **Trace records**: one line per change, in the simulator's trace format
//! - **TOML parameters**: an embedded default set, overridable per run
//!
//! # Quick Start
//!
//! ```
//! use pam5_forge::{Atom, AtomId, Bond, BondDirection, BondOrder, Stretch};
//! use pam5_forge::{MemorySink, Motif, Part, PatternCatalog, PatternConfig, PatternMatch};
//! use pam5_forge::{PatternError, get_default_parameters, register_pam5_patterns};
//!
//! let store = get_default_parameters();
//! let mut catalog = PatternCatalog::new();
//! let rules = register_pam5_patterns(&mut catalog, PatternConfig::gromacs("duplex"), store)
//!     .expect("PAM5 atoms are present");
//! assert_eq!(catalog.len(), 5);
//!
//! // A phosphate on the 5' side of its sugar.
//! let mut part = Part::new();
//! part.add_atom(Atom::new(AtomId(1), store.atom_type("Pl5")?), Some([0.0, 0.0, 0.0]));
//! part.add_atom(Atom::new(AtomId(2), store.atom_type("Ss5")?), Some([3.9, 0.0, 0.0]));
//! part.add_bond(
//!     Bond::new(AtomId(1), AtomId(2), BondOrder::Single).with_direction(BondDirection::Forward),
//! );
//! let stretch = store.bond_stretch("Pl5", "Ss5", BondOrder::Single)?;
//! part.add_stretch(Stretch::new(AtomId(1), AtomId(2), stretch));
//!
//! let mut trace = MemorySink::new();
//! let mut m = PatternMatch::new(1, &mut part, vec![0, 1]);
//! rules.apply(Motif::PhosphateSugar, &mut m, &mut trace)?;
//!
//! assert_eq!(part.stretches()[0].stretch_type.name, "5-Pl-Ss-3");
//! assert_eq!(
//!     trace.lines(),
//!     ["# Pattern setStretchType: [1] 1 2 120.000000 368.000000"]
//! );
//! # Ok::<(), PatternError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`model`]: Atoms, bonds, stretch terms and the [`Part`] under construction
//! - [`register_pam5_patterns`]: Declares the motifs to a [`PatternRegistry`]
//! - [`Pam5Rules`]: Applies a rule to one [`PatternMatch`]
//! - [`ParameterStore`]: Pattern parameters, atom types and stretch constants
//! - [`TraceSink`]: Destination for [`TraceRecord`]s
//!
//! # Errors
//!
//! Every failure is a [`PatternError`]. A rule that fails reports the error
//! to its [`Part`], which aborts the rest of the construction pass.

pub mod model;
mod pattern;

pub use model::atom::{Atom, AtomId, AtomType, VirtualConstruction, VirtualFunction};
pub use model::part::{Bond, Part};
pub use model::stretch::{BondStretchType, Stretch};
pub use model::types::{BondDirection, BondOrder, ParseBondOrderError};

pub use pattern::{
    AtomRef, AtomTypeParams, MemorySink, Minimizer, Motif, Pam5Rules, ParameterStore,
    PatternAtom, PatternCatalog, PatternConfig, PatternDefinition, PatternMatch,
    PatternRegistry, STACK_SITES, StackParameters, StackSite, StretchParams, TraceRecord,
    TraceSink, TracingSink, Traversal, get_default_parameters, is_expected_twist,
    load_parameters, register_pam5_patterns,
};

pub use pattern::Error as PatternError;
