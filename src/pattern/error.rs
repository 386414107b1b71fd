//! Error types for PAM5 pattern rules.
//!
//! Errors fall into two classes. Configuration errors mean the run was set
//! up without something the rules need (a minimizer backend, a parameter,
//! an atom type). Structural errors mean the molecule handed to a rule is
//! inconsistent, such as a phosphate-sugar bond with no strand direction.
//! Both abort the construction pass.

use crate::model::atom::AtomId;
use crate::model::types::BondOrder;
use thiserror::Error;

/// Errors that can occur while registering or applying PAM5 patterns.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse a parameter or configuration TOML document.
    #[error("failed to parse PAM5 parameters: {0}")]
    ParameterParse(#[from] toml::de::Error),

    /// A named pattern parameter is absent from the parameter store.
    #[error("missing pattern parameter '{key}'")]
    MissingPatternParameter {
        /// The parameter key, e.g. `PAM5-Stack:vDa1-p`.
        key: String,
    },

    /// An atom type is absent from the parameter store.
    #[error("missing atom type '{name}'")]
    MissingAtomType {
        /// Short type name, e.g. `vDb4`.
        name: String,
    },

    /// No bond stretch entry exists for a pair of atom types.
    #[error("no bond stretch parameters for {type1}-{type2} with {order} bond order")]
    MissingStretch {
        type1: String,
        type2: String,
        order: BondOrder,
    },

    /// PAM5 rules were applied without a minimizer backend configured.
    #[error("PAM5 DNA structures must be minimized with GROMACS")]
    MinimizerRequired,

    /// A phosphate-sugar bond carries no strand direction.
    #[error("bond between ids {phosphate} and {sugar} has no direction")]
    UndirectedBond {
        /// Phosphate atom id.
        phosphate: AtomId,
        /// Sugar atom id.
        sugar: AtomId,
    },

    /// Two bound atoms are expected to be bonded but are not.
    #[error("no bond between atoms {a} and {b}")]
    MissingBond { a: AtomId, b: AtomId },

    /// A bond exists but has no stretch term.
    #[error("no stretch term between atoms {a} and {b}")]
    MissingStretchRecord { a: AtomId, b: AtomId },

    /// An atom id does not name any atom in the part.
    #[error("atom {id} is not in the part")]
    UnknownAtomId { id: AtomId },

    /// A match bound an atom index outside the part.
    #[error("match refers to atom index {index}, which is not in the part")]
    UnknownAtom { index: usize },

    /// A rule asked for a slot the match does not have.
    #[error("pattern slot {slot} requested, but the match binds only {len} atoms")]
    SlotOutOfRange { slot: usize, len: usize },

    /// No room left in the id space for new virtual atoms.
    #[error("cannot allocate {requested} atom ids past id {max}")]
    AtomIdExhausted { max: AtomId, requested: u32 },

    /// A pattern rule failed; `pattern` names the rule.
    #[error("{pattern}: {source}")]
    Rule {
        pattern: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a [`MissingPatternParameter`](Error::MissingPatternParameter) error.
    pub fn missing_parameter(key: impl Into<String>) -> Self {
        Self::MissingPatternParameter { key: key.into() }
    }

    /// Creates a [`MissingAtomType`](Error::MissingAtomType) error.
    pub fn missing_atom_type(name: impl Into<String>) -> Self {
        Self::MissingAtomType { name: name.into() }
    }

    /// Creates a [`MissingStretch`](Error::MissingStretch) error.
    pub fn missing_stretch(type1: &str, type2: &str, order: BondOrder) -> Self {
        Self::MissingStretch {
            type1: type1.to_string(),
            type2: type2.to_string(),
            order,
        }
    }

    /// Attributes the error to the named pattern rule.
    pub fn in_rule(self, pattern: &'static str) -> Self {
        Self::Rule {
            pattern,
            source: Box::new(self),
        }
    }

    /// Name of the rule that failed, if known.
    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            Error::Rule { pattern, .. } => Some(*pattern),
            _ => None,
        }
    }

    /// The underlying error, with any rule attribution stripped.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Rule { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Owned form of [`root_cause`](Error::root_cause).
    pub fn into_root_cause(self) -> Error {
        match self {
            Error::Rule { source, .. } => source.into_root_cause(),
            other => other,
        }
    }

    /// Whether the error stems from run configuration rather than from the
    /// molecule being built.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.root_cause(),
            Error::ParameterParse(_)
                | Error::MissingPatternParameter { .. }
                | Error::MissingAtomType { .. }
                | Error::MissingStretch { .. }
                | Error::MinimizerRequired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undirected_bond_message_names_both_atoms() {
        let err = Error::UndirectedBond {
            phosphate: AtomId(12),
            sugar: AtomId(13),
        };
        assert_eq!(
            err.to_string(),
            "bond between ids 12 and 13 has no direction"
        );
        assert!(!err.is_configuration());
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(Error::MinimizerRequired.is_configuration());
        assert!(Error::missing_parameter("PAM5:5-Pl-Ss-3_r0").is_configuration());
        assert!(Error::missing_atom_type("vDa1").is_configuration());
        assert!(!Error::SlotOutOfRange { slot: 4, len: 2 }.is_configuration());
    }

    #[test]
    fn rule_errors_name_the_pattern() {
        let err = Error::UndirectedBond {
            phosphate: AtomId(1),
            sugar: AtomId(2),
        }
        .in_rule("PAM5-groove-phosphate");
        assert_eq!(
            err.to_string(),
            "PAM5-groove-phosphate: bond between ids 1 and 2 has no direction"
        );
        assert_eq!(err.pattern(), Some("PAM5-groove-phosphate"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(matches!(err.root_cause(), Error::UndirectedBond { .. }));
        assert!(!err.is_configuration());

        let err = Error::MinimizerRequired.in_rule("PAM5-stack");
        assert!(err.is_configuration());
        assert!(matches!(err.into_root_cause(), Error::MinimizerRequired));
    }

    #[test]
    fn id_exhaustion_message() {
        let err = Error::AtomIdExhausted {
            max: AtomId(u32::MAX),
            requested: 16,
        };
        assert_eq!(
            err.to_string(),
            "cannot allocate 16 atom ids past id 4294967295"
        );
        assert_eq!(err.pattern(), None);
    }

    #[test]
    fn missing_stretch_message() {
        let err = Error::missing_stretch("Ss5", "Gv5", BondOrder::Single);
        assert_eq!(
            err.to_string(),
            "no bond stretch parameters for Ss5-Gv5 with Single bond order"
        );
    }
}
