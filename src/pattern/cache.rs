use super::error::Error;
use super::params::ParameterStore;
use crate::model::atom::AtomType;
use crate::model::stretch::BondStretchType;
use std::sync::Arc;

/// Number of virtual site pairs built for every stacked pair of bases.
pub const STACK_SITES: usize = 8;

/// One pair of stacking virtual sites.
#[derive(Debug, Clone)]
pub struct StackSite {
    pub a_type: Arc<AtomType>,
    pub b_type: Arc<AtomType>,
    pub a_p: f64,
    pub a_q: f64,
    pub b_p: f64,
    pub b_q: f64,
}

/// Parameters shared by every PAM5 rule in one construction run.
#[derive(Debug, Clone)]
pub struct StackParameters {
    pub sites: [StackSite; STACK_SITES],
    /// Phosphate on the 5' side of the sugar.
    pub phosphate_sugar: Arc<BondStretchType>,
    /// Sugar on the 5' side of the phosphate.
    pub sugar_phosphate: Arc<BondStretchType>,
}

impl StackParameters {
    /// Resolves every parameter and atom type the rules use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAtomType`] or [`Error::MissingPatternParameter`]
    /// for the first absent entry.
    pub fn resolve(store: &ParameterStore) -> Result<Self, Error> {
        let mut sites = Vec::with_capacity(STACK_SITES);
        for n in 1..=STACK_SITES {
            sites.push(StackSite {
                a_type: store.atom_type(&format!("vDa{n}"))?,
                b_type: store.atom_type(&format!("vDb{n}"))?,
                a_p: store.pattern_parameter(&format!("PAM5-Stack:vDa{n}-p"))?,
                a_q: store.pattern_parameter(&format!("PAM5-Stack:vDa{n}-q"))?,
                b_p: store.pattern_parameter(&format!("PAM5-Stack:vDb{n}-p"))?,
                b_q: store.pattern_parameter(&format!("PAM5-Stack:vDb{n}-q"))?,
            });
        }
        let sites: [StackSite; STACK_SITES] = sites
            .try_into()
            .map_err(|_| Error::missing_parameter("PAM5-Stack"))?;

        Ok(Self {
            sites,
            phosphate_sugar: directional_stretch(store, "5-Pl-Ss-3")?,
            sugar_phosphate: directional_stretch(store, "5-Ss-Pl-3")?,
        })
    }
}

fn directional_stretch(store: &ParameterStore, name: &str) -> Result<Arc<BondStretchType>, Error> {
    let r0 = store.pattern_parameter(&format!("PAM5:{name}_r0"))?;
    let ks = store.pattern_parameter(&format!("PAM5:{name}_ks"))?;
    Ok(Arc::new(BondStretchType::quadratic(name, ks, r0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::params::get_default_parameters;

    #[test]
    fn resolves_default_parameters_in_index_order() {
        let store = get_default_parameters();
        let params = StackParameters::resolve(store).unwrap();
        for (i, site) in params.sites.iter().enumerate() {
            let n = i + 1;
            assert_eq!(site.a_type.name, format!("vDa{n}"));
            assert_eq!(site.b_type.name, format!("vDb{n}"));
            assert_eq!(
                site.a_p,
                store
                    .pattern_parameter(&format!("PAM5-Stack:vDa{n}-p"))
                    .unwrap()
            );
            assert_eq!(
                site.b_q,
                store
                    .pattern_parameter(&format!("PAM5-Stack:vDb{n}-q"))
                    .unwrap()
            );
        }
    }

    #[test]
    fn directional_stretches_use_their_own_constants() {
        let store = get_default_parameters();
        let params = StackParameters::resolve(store).unwrap();
        assert_eq!(params.phosphate_sugar.name, "5-Pl-Ss-3");
        assert_eq!(
            params.phosphate_sugar.r0,
            store.pattern_parameter("PAM5:5-Pl-Ss-3_r0").unwrap()
        );
        assert_eq!(params.sugar_phosphate.name, "5-Ss-Pl-3");
        assert_eq!(
            params.sugar_phosphate.ks,
            store.pattern_parameter("PAM5:5-Ss-Pl-3_ks").unwrap()
        );
        assert!(params.sugar_phosphate.quadratic);
    }

    #[test]
    fn missing_atom_type_is_fatal() {
        let store = ParameterStore::from_toml("").unwrap();
        assert!(matches!(
            StackParameters::resolve(&store),
            Err(Error::MissingAtomType { name }) if name == "vDa1"
        ));
    }

    #[test]
    fn missing_directional_parameter_is_fatal() {
        let mut toml = String::from("[atom_types]\n");
        for n in 1..=8 {
            toml.push_str(&format!("vDa{n} = {{ number = {} }}\n", 219 + n));
            toml.push_str(&format!("vDb{n} = {{ number = {} }}\n", 227 + n));
        }
        toml.push_str("[patterns]\n");
        for n in 1..=8 {
            for g in ["a", "b"] {
                for c in ["p", "q"] {
                    toml.push_str(&format!("\"PAM5-Stack:vD{g}{n}-{c}\" = 0.5\n"));
                }
            }
        }
        toml.push_str("\"PAM5:5-Pl-Ss-3_r0\" = 1.0\n\"PAM5:5-Pl-Ss-3_ks\" = 1.0\n");
        let store = ParameterStore::from_toml(&toml).unwrap();
        assert!(matches!(
            StackParameters::resolve(&store),
            Err(Error::MissingPatternParameter { key }) if key == "PAM5:5-Ss-Pl-3_r0"
        ));
    }
}
