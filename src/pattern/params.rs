use super::error::Error;
use crate::model::atom::AtomType;
use crate::model::stretch::BondStretchType;
use crate::model::types::BondOrder;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

const DEFAULT_PARAMS_TOML: &str = include_str!("../../resources/default.params.toml");

static DEFAULT_PARAMS: OnceLock<ParameterStore> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct ParameterFile {
    #[serde(default)]
    patterns: HashMap<String, f64>,
    #[serde(default)]
    atom_types: HashMap<String, AtomTypeParams>,
    #[serde(default)]
    pattern_atoms: HashMap<String, Vec<String>>,
    #[serde(default)]
    stretch: Vec<StretchParams>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AtomTypeParams {
    pub number: u32,
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StretchParams {
    pub types: [String; 2],
    #[serde(default = "default_stretch_order")]
    pub order: BondOrder,
    pub ks: f64,
    pub r0: f64,
}

fn default_stretch_order() -> BondOrder {
    BondOrder::Single
}

type StretchKey = (String, String, BondOrder);

fn stretch_key(type1: &str, type2: &str, order: BondOrder) -> StretchKey {
    if type1 <= type2 {
        (type1.to_string(), type2.to_string(), order)
    } else {
        (type2.to_string(), type1.to_string(), order)
    }
}

/// Named parameters, atom types and bond stretch constants for PAM5 rules.
///
/// Built from a TOML document with `[patterns]`, `[atom_types]`,
/// `[pattern_atoms]` and `[[stretch]]` tables. Lookups hand out shared
/// handles, so every caller sees the same [`AtomType`] and
/// [`BondStretchType`] instances.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    patterns: HashMap<String, f64>,
    atom_types: HashMap<String, Arc<AtomType>>,
    pattern_atoms: HashMap<String, Vec<String>>,
    stretches: HashMap<StretchKey, Arc<BondStretchType>>,
}

impl ParameterStore {
    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        let file: ParameterFile = toml::from_str(toml)?;

        let atom_types = file
            .atom_types
            .into_iter()
            .map(|(name, p)| {
                let atom_type = Arc::new(AtomType::new(name.clone(), p.number, p.is_virtual));
                (name, atom_type)
            })
            .collect();

        let stretches = file
            .stretch
            .into_iter()
            .map(|s| {
                let [t1, t2] = s.types;
                let name = format!("{t1}-{t2}");
                let key = stretch_key(&t1, &t2, s.order);
                (key, Arc::new(BondStretchType::quadratic(name, s.ks, s.r0)))
            })
            .collect();

        Ok(Self {
            patterns: file.patterns,
            atom_types,
            pattern_atoms: file.pattern_atoms,
            stretches,
        })
    }

    /// Value of a named pattern parameter.
    pub fn pattern_parameter(&self, key: &str) -> Result<f64, Error> {
        self.patterns
            .get(key)
            .copied()
            .ok_or_else(|| Error::missing_parameter(key))
    }

    pub fn atom_type(&self, name: &str) -> Result<Arc<AtomType>, Error> {
        self.atom_types
            .get(name)
            .cloned()
            .ok_or_else(|| Error::missing_atom_type(name))
    }

    /// Stretch constants for a bond between two atom types; order of the
    /// two types does not matter.
    pub fn bond_stretch(
        &self,
        type1: &str,
        type2: &str,
        order: BondOrder,
    ) -> Result<Arc<BondStretchType>, Error> {
        self.stretches
            .get(&stretch_key(type1, type2, order))
            .cloned()
            .ok_or_else(|| Error::missing_stretch(type1, type2, order))
    }

    /// Whether an atom of type `atom_type` may fill a pattern slot labelled
    /// `label` (e.g. `P5S`).
    pub fn slot_accepts(&self, label: &str, atom_type: &str) -> bool {
        self.pattern_atoms
            .get(label)
            .is_some_and(|types| types.iter().any(|t| t == atom_type))
    }
}

pub fn load_parameters(custom_toml: Option<&str>) -> Result<ParameterStore, Error> {
    match custom_toml {
        Some(toml) => ParameterStore::from_toml(toml),
        None => Ok(get_default_parameters().clone()),
    }
}

pub fn get_default_parameters() -> &'static ParameterStore {
    DEFAULT_PARAMS.get_or_init(|| {
        ParameterStore::from_toml(DEFAULT_PARAMS_TOML)
            .expect("Failed to parse embedded default parameters. This is a library bug.")
    })
}
