//! Run configuration consulted by the PAM5 rules.

use super::error::Error;
use serde::Deserialize;

/// Energy minimization backend selected for the run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum Minimizer {
    /// Write GROMACS input files under the given base name.
    Gromacs { output_base_name: String },
}

/// Settings that gate and shape PAM5 pattern handling.
///
/// # Examples
///
/// ```
/// use pam5_forge::{Minimizer, PatternConfig};
///
/// let config = PatternConfig::from_toml(
///     r#"
///     vdw_cutoff_radius = 1.5
///
///     [minimizer]
///     backend = "gromacs"
///     output_base_name = "duplex"
///     "#,
/// )?;
/// assert!(config.has_pam5());
/// assert!(matches!(config.minimizer, Some(Minimizer::Gromacs { .. })));
/// # Ok::<(), pam5_forge::PatternError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PatternConfig {
    /// Minimizer backend; PAM5 structures are only valid with one set.
    #[serde(default)]
    pub minimizer: Option<Minimizer>,

    /// Van der Waals cutoff radius. Negative when the force field has no
    /// PAM5 pseudo-atoms, which disables every PAM5 pattern.
    #[serde(default)]
    pub vdw_cutoff_radius: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            minimizer: None,
            vdw_cutoff_radius: 0.0,
        }
    }
}

impl PatternConfig {
    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        Ok(toml::from_str(toml)?)
    }

    /// Configuration with GROMACS selected.
    pub fn gromacs(output_base_name: impl Into<String>) -> Self {
        Self {
            minimizer: Some(Minimizer::Gromacs {
                output_base_name: output_base_name.into(),
            }),
            ..Self::default()
        }
    }

    /// Whether the active force field carries PAM5 atoms at all.
    #[inline]
    pub fn has_pam5(&self) -> bool {
        self.vdw_cutoff_radius >= 0.0
    }

    /// Fails unless a minimizer backend is configured.
    pub fn require_minimizer(&self) -> Result<&Minimizer, Error> {
        self.minimizer.as_ref().ok_or(Error::MinimizerRequired)
    }
}
