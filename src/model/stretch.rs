use super::atom::AtomId;
use std::sync::Arc;

/// Bond stretching constants for one pair of atom types.
///
/// Instances are immutable once built and shared by every [`Stretch`]
/// that uses them.
#[derive(Debug, Clone, PartialEq)]
pub struct BondStretchType {
    pub name: String,
    /// Spring constant in N/m.
    pub ks: f64,
    /// Equilibrium length in pm.
    pub r0: f64,
    /// Dissociation energy, negative when not tabulated.
    pub de: f64,
    /// Morse width, negative when derived from `ks` and `de`.
    pub beta: f64,
    /// Inflection radius, negative when derived.
    pub inflection_r: f64,
    /// Parameter quality rating (higher is better).
    pub quality: u8,
    /// Use the quadratic form instead of the Morse form.
    pub quadratic: bool,
}

impl BondStretchType {
    /// A quadratic stretch with the shape constants used for pattern-defined
    /// pseudo-atom bonds.
    pub fn quadratic(name: impl Into<String>, ks: f64, r0: f64) -> Self {
        Self {
            name: name.into(),
            ks,
            r0,
            de: 1.0,
            beta: -1.0,
            inflection_r: -1.0,
            quality: 9,
            quadratic: true,
        }
    }
}

/// The stretch term attached to one bond.
#[derive(Debug, Clone, PartialEq)]
pub struct Stretch {
    pub a1: AtomId,
    pub a2: AtomId,
    pub stretch_type: Arc<BondStretchType>,
}

impl Stretch {
    pub fn new(a1: AtomId, a2: AtomId, stretch_type: Arc<BondStretchType>) -> Self {
        Self {
            a1,
            a2,
            stretch_type,
        }
    }

    /// Whether this stretch acts between `a` and `b`, in either order.
    pub fn connects(&self, a: AtomId, b: AtomId) -> bool {
        (self.a1 == a && self.a2 == b) || (self.a1 == b && self.a2 == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_type_uses_fixed_shape_constants() {
        let t = BondStretchType::quadratic("5-Pl-Ss-3", 200.0, 400.0);
        assert_eq!(t.ks, 200.0);
        assert_eq!(t.r0, 400.0);
        assert_eq!(t.de, 1.0);
        assert_eq!(t.beta, -1.0);
        assert_eq!(t.inflection_r, -1.0);
        assert_eq!(t.quality, 9);
        assert!(t.quadratic);
    }

    #[test]
    fn stretch_connects_is_symmetric() {
        let t = Arc::new(BondStretchType::quadratic("x", 1.0, 1.0));
        let s = Stretch::new(AtomId(1), AtomId(2), t);
        assert!(s.connects(AtomId(1), AtomId(2)));
        assert!(s.connects(AtomId(2), AtomId(1)));
        assert!(!s.connects(AtomId(1), AtomId(3)));
    }
}
