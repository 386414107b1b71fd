use super::cache::StackParameters;
use super::config::PatternConfig;
use super::error::Error;
use super::matcher::PatternMatch;
use super::motif::Motif;
use super::params::ParameterStore;
use super::trace::TraceSink;
use std::cell::OnceCell;

/// State shared by the PAM5 rules for one construction run.
///
/// Created by [`register_pam5_patterns`](super::register_pam5_patterns);
/// registering again yields a fresh value, so parameters are re-resolved
/// once per run. Stack parameters are resolved on first use. The type is
/// not `Sync`: all matches of a run are applied from one thread.
#[derive(Debug)]
pub struct Pam5Rules<'p> {
    config: PatternConfig,
    store: &'p ParameterStore,
    stack: OnceCell<StackParameters>,
}

impl<'p> Pam5Rules<'p> {
    pub fn new(config: PatternConfig, store: &'p ParameterStore) -> Self {
        Self {
            config,
            store,
            stack: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn store(&self) -> &'p ParameterStore {
        self.store
    }

    /// Stack parameters for this run, resolving them on first call.
    pub fn stack_parameters(&self) -> Result<&StackParameters, Error> {
        if let Some(params) = self.stack.get() {
            return Ok(params);
        }
        let params = StackParameters::resolve(self.store)?;
        tracing::debug!("resolved PAM5 stack parameters");
        Ok(self.stack.get_or_init(|| params))
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.stack.get().is_some()
    }

    /// Applies the rule for `motif` to one match.
    ///
    /// A failure is attributed to the rule by name and reported to the
    /// part, which aborts the construction pass; matches handed in after
    /// that are ignored.
    pub fn apply(
        &self,
        motif: Motif,
        m: &mut PatternMatch<'_>,
        trace: &mut dyn TraceSink,
    ) -> Result<(), Error> {
        let _span = tracing::debug_span!(
            "pam5_pattern",
            pattern = motif.name(),
            sequence = m.sequence_number
        )
        .entered();

        if m.part.has_failed() {
            tracing::debug!("construction already aborted, skipping match");
            return Ok(());
        }
        tracing::debug!("{m}");

        motif.handle(self, m, trace).map_err(|e| {
            let e = e.in_rule(motif.name());
            m.part.report_failure(&e);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::params::get_default_parameters;

    #[test]
    fn stack_parameters_resolve_once() {
        let rules = Pam5Rules::new(PatternConfig::gromacs("out"), get_default_parameters());
        assert!(!rules.is_initialized());
        let first = rules.stack_parameters().unwrap() as *const StackParameters;
        assert!(rules.is_initialized());
        let second = rules.stack_parameters().unwrap() as *const StackParameters;
        assert_eq!(first, second);
    }

    #[test]
    fn failed_resolution_leaves_cache_empty() {
        let store = ParameterStore::from_toml("").unwrap();
        let rules = Pam5Rules::new(PatternConfig::gromacs("out"), &store);
        assert!(rules.stack_parameters().is_err());
        assert!(!rules.is_initialized());
    }
}
