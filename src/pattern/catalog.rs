use super::config::PatternConfig;
use super::matcher::{PatternAtom, PatternDefinition, PatternRegistry, Traversal};
use super::motif::Motif;
use super::params::ParameterStore;
use super::rules::Pam5Rules;
use crate::model::types::BondOrder;

const GROOVE: &str = "P5G";
const SUGAR: &str = "P5S";
const PHOSPHATE: &str = "P5P";

fn slots(labels: &[&str]) -> Vec<PatternAtom> {
    labels
        .iter()
        .enumerate()
        .map(|(index, label)| PatternAtom::new(index, *label))
        .collect()
}

fn edges(atoms: &[PatternAtom], pairs: &[(usize, usize)]) -> Vec<Traversal> {
    pairs
        .iter()
        .map(|&(a, b)| Traversal::new(&atoms[a], &atoms[b], BondOrder::Single))
        .collect()
}

impl Motif {
    /// Topology the matcher searches for.
    pub fn definition(self) -> PatternDefinition {
        let (labels, pairs): (&[&str], &[(usize, usize)]) = match self {
            Motif::Basepair => (&[GROOVE, SUGAR, SUGAR], &[(0, 1), (0, 2)]),
            Motif::Stack => (
                &[GROOVE, GROOVE, SUGAR, SUGAR, SUGAR, SUGAR],
                &[(0, 1), (0, 2), (0, 3), (1, 4), (1, 5)],
            ),
            Motif::PhosphateSugar => (&[PHOSPHATE, SUGAR], &[(0, 1)]),
            Motif::PhosphatePhosphate => (&[PHOSPHATE, SUGAR, PHOSPHATE], &[(0, 1), (1, 2)]),
            Motif::GroovePhosphate => (&[GROOVE, SUGAR, PHOSPHATE], &[(0, 1), (1, 2)]),
        };
        let atoms = slots(labels);
        let traversals = edges(&atoms, pairs);
        PatternDefinition {
            name: self.name(),
            motif: self,
            atoms,
            traversals,
        }
    }
}

/// Registers the five PAM5 patterns for a new construction run.
///
/// Returns `None` without registering anything when the force field has no
/// PAM5 atoms (negative van der Waals cutoff). Otherwise the returned rules
/// carry a fresh stack parameter cache and are what the matcher's matches
/// must be applied through.
pub fn register_pam5_patterns<'p>(
    registry: &mut impl PatternRegistry,
    config: PatternConfig,
    store: &'p ParameterStore,
) -> Option<Pam5Rules<'p>> {
    if !config.has_pam5() {
        tracing::info!(
            cutoff = config.vdw_cutoff_radius,
            "no PAM5 atoms in force field, skipping PAM5 patterns"
        );
        return None;
    }

    let rules = Pam5Rules::new(config, store);
    for motif in Motif::ALL {
        let definition = motif.definition();
        tracing::debug!(
            pattern = definition.name,
            atoms = definition.atom_count(),
            traversals = definition.traversal_count(),
            "registering pattern"
        );
        registry.register_pattern(definition);
    }
    tracing::info!("registered {} PAM5 patterns", Motif::ALL.len());
    Some(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::matcher::PatternCatalog;
    use crate::pattern::params::get_default_parameters;

    #[test]
    fn registers_five_patterns_in_order() {
        let mut catalog = PatternCatalog::new();
        let rules =
            register_pam5_patterns(&mut catalog, PatternConfig::gromacs("dna"), get_default_parameters());
        assert!(rules.is_some());

        let counts: Vec<_> = catalog
            .patterns()
            .iter()
            .map(|p| (p.name, p.atom_count(), p.traversal_count()))
            .collect();
        assert_eq!(
            counts,
            [
                ("PAM5-basepair", 3, 2),
                ("PAM5-stack", 6, 5),
                ("PAM5-phosphate-sugar", 2, 1),
                ("PAM5-phosphate-phosphate", 3, 2),
                ("PAM5-groove-phosphate", 3, 2),
            ]
        );
    }

    #[test]
    fn negative_cutoff_registers_nothing() {
        let mut catalog = PatternCatalog::new();
        let config = PatternConfig {
            vdw_cutoff_radius: -1.0,
            ..PatternConfig::gromacs("dna")
        };
        assert!(register_pam5_patterns(&mut catalog, config, get_default_parameters()).is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn missing_minimizer_still_registers() {
        let mut catalog = PatternCatalog::new();
        let rules =
            register_pam5_patterns(&mut catalog, PatternConfig::default(), get_default_parameters());
        assert!(rules.is_some());
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn each_registration_starts_with_a_fresh_cache() {
        let store = get_default_parameters();
        let mut catalog = PatternCatalog::new();
        let first = register_pam5_patterns(&mut catalog, PatternConfig::gromacs("a"), store).unwrap();
        first.stack_parameters().unwrap();
        assert!(first.is_initialized());

        let second = register_pam5_patterns(&mut catalog, PatternConfig::gromacs("b"), store).unwrap();
        assert!(!second.is_initialized());
    }

    #[test]
    fn slot_labels_and_edges() {
        let stack = Motif::Stack.definition();
        let labels: Vec<_> = stack.atoms.iter().map(|a| a.type_label.as_str()).collect();
        assert_eq!(labels, ["P5G", "P5G", "P5S", "P5S", "P5S", "P5S"]);
        let pairs: Vec<_> = stack.traversals.iter().map(|t| (t.a, t.b)).collect();
        assert_eq!(pairs, [(0, 1), (0, 2), (0, 3), (1, 4), (1, 5)]);
        assert!(stack.traversals.iter().all(|t| t.order == BondOrder::Single));

        let groove = Motif::GroovePhosphate.definition();
        let labels: Vec<_> = groove.atoms.iter().map(|a| a.type_label.as_str()).collect();
        assert_eq!(labels, ["P5G", "P5S", "P5P"]);
    }

    #[test]
    fn default_parameters_fill_every_slot_label() {
        let store = get_default_parameters();
        assert!(store.slot_accepts(GROOVE, "Gv5"));
        assert!(store.slot_accepts(SUGAR, "Ss5"));
        assert!(store.slot_accepts(SUGAR, "Sj5"));
        assert!(store.slot_accepts(PHOSPHATE, "Pl5"));
        assert!(!store.slot_accepts(PHOSPHATE, "Ss5"));
    }
}
