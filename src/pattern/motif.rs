//! The five PAM5 pattern rules.
//!
//! Slot layouts, as bound by the matcher:
//!
//! | Motif                | Slots                                   |
//! |----------------------|-----------------------------------------|
//! | `Basepair`           | groove, sugar, sugar                    |
//! | `Stack`              | groove1, groove2, s1a, s1b, s2a, s2b    |
//! | `PhosphateSugar`     | phosphate, sugar                        |
//! | `PhosphatePhosphate` | phosphate, sugar, phosphate             |
//! | `GroovePhosphate`    | groove, sugar, phosphate                |

use super::cache::{STACK_SITES, StackSite};
use super::error::Error;
use super::geometry::is_expected_twist;
use super::matcher::PatternMatch;
use super::rules::Pam5Rules;
use super::trace::{TraceRecord, TraceSink};
use crate::model::atom::{Atom, AtomId, VirtualConstruction};
use crate::model::part::Bond;
use crate::model::types::{BondDirection, BondOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motif {
    /// Bonds the two sugars of a base pair directly.
    Basepair,
    /// Builds stacking virtual sites between adjacent base pairs.
    Stack,
    /// Picks the directional phosphate-sugar stretch type.
    PhosphateSugar,
    /// Bonds consecutive phosphates in place of the Pl-Ss-Pl bend.
    PhosphatePhosphate,
    /// Bonds groove and phosphate on the 5' side in place of the Gv-Ss-Pl bend.
    GroovePhosphate,
}

impl Motif {
    pub const ALL: [Motif; 5] = [
        Motif::Basepair,
        Motif::Stack,
        Motif::PhosphateSugar,
        Motif::PhosphatePhosphate,
        Motif::GroovePhosphate,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Motif::Basepair => "PAM5-basepair",
            Motif::Stack => "PAM5-stack",
            Motif::PhosphateSugar => "PAM5-phosphate-sugar",
            Motif::PhosphatePhosphate => "PAM5-phosphate-phosphate",
            Motif::GroovePhosphate => "PAM5-groove-phosphate",
        }
    }

    pub(crate) fn handle(
        self,
        rules: &Pam5Rules<'_>,
        m: &mut PatternMatch<'_>,
        trace: &mut dyn TraceSink,
    ) -> Result<(), Error> {
        rules.config().require_minimizer()?;
        match self {
            Motif::Basepair => basepair(rules, m, trace),
            Motif::Stack => stack(rules, m, trace),
            Motif::PhosphateSugar => phosphate_sugar(rules, m, trace),
            Motif::PhosphatePhosphate => phosphate_phosphate(rules, m, trace),
            Motif::GroovePhosphate => groove_phosphate(rules, m, trace),
        }
    }
}

/// Whether the sugar lies on the 5' side of the phosphate along `bond`.
fn is_reverse(bond: &Bond, phosphate: AtomId, sugar: AtomId) -> Result<bool, Error> {
    match bond.direction {
        BondDirection::Forward => Ok(bond.a1 == sugar),
        BondDirection::Reverse => Ok(bond.a1 == phosphate),
        BondDirection::Undefined => Err(Error::UndirectedBond { phosphate, sugar }),
    }
}

fn queue_traced_bond(
    rules: &Pam5Rules<'_>,
    m: &mut PatternMatch<'_>,
    trace: &mut dyn TraceSink,
    a1: AtomId,
    a2: AtomId,
) -> Result<(), Error> {
    let bond = Bond::new(a1, a2, BondOrder::Single);
    let record = TraceRecord::make_bond(m.sequence_number, m.part, rules.store(), &bond)?;
    m.part.queue_bond(bond);
    trace.write_record(&record);
    Ok(())
}

fn basepair(
    rules: &Pam5Rules<'_>,
    m: &mut PatternMatch<'_>,
    trace: &mut dyn TraceSink,
) -> Result<(), Error> {
    rules.stack_parameters()?;
    let sugar_a = m.atom(1)?;
    let sugar_b = m.atom(2)?;
    queue_traced_bond(rules, m, trace, sugar_a, sugar_b)
}

//  S1a    S2b
//   |      |
//  Gv1----Gv2
//   |      |
//  S1b    S2a
fn stack(
    rules: &Pam5Rules<'_>,
    m: &mut PatternMatch<'_>,
    trace: &mut dyn TraceSink,
) -> Result<(), Error> {
    let params = rules.stack_parameters()?;
    let groove1 = m.atom(0)?;
    let groove2 = m.atom(1)?;
    let (mut s1a, mut s1b) = (m.atom(2)?, m.atom(3)?);
    let (mut s2a, mut s2b) = (m.atom(4)?, m.atom(5)?);

    if !is_expected_twist(m.part, groove1, groove2, s1a, s1b) {
        std::mem::swap(&mut s1a, &mut s1b);
    }
    if !is_expected_twist(m.part, groove2, groove1, s2a, s2b) {
        std::mem::swap(&mut s2a, &mut s2b);
    }
    // In B-DNA the S1a-S2a distance now exceeds the S1b-S2b distance.

    for site in &params.sites {
        rules
            .store()
            .bond_stretch(&site.a_type.name, &site.b_type.name, BondOrder::Single)?;
    }

    let ids = m.part.allocate_atom_ids(2 * STACK_SITES as u32)?;
    for (site, pair) in params.sites.iter().zip(ids.chunks_exact(2)) {
        let va = make_site_atom(pair[0], site, SiteGroup::A, groove1, s1a, s1b);
        let vb = make_site_atom(pair[1], site, SiteGroup::B, groove2, s2a, s2b);
        let bond = Bond::new(va.id, vb.id, BondOrder::Single);

        let seq = m.sequence_number;
        m.part.queue_atom(va.clone());
        trace.write_record(&TraceRecord::make_virtual_atom(seq, m.part, &va));
        m.part.queue_atom(vb.clone());
        trace.write_record(&TraceRecord::make_virtual_atom(seq, m.part, &vb));
        let record = TraceRecord::make_bond(seq, m.part, rules.store(), &bond)?;
        m.part.queue_bond(bond);
        trace.write_record(&record);
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum SiteGroup {
    A,
    B,
}

fn make_site_atom(
    id: AtomId,
    site: &StackSite,
    group: SiteGroup,
    groove: AtomId,
    sugar_a: AtomId,
    sugar_b: AtomId,
) -> Atom {
    let (atom_type, p, q) = match group {
        SiteGroup::A => (&site.a_type, site.a_p, site.a_q),
        SiteGroup::B => (&site.b_type, site.b_p, site.b_q),
    };
    let construction = VirtualConstruction::sp3(groove, sugar_a, sugar_b, p, q);
    Atom::new_virtual(id, atom_type.clone(), construction)
}

// Lets the phosphate sit closer to one sugar than the other, following
// strand direction.
fn phosphate_sugar(
    rules: &Pam5Rules<'_>,
    m: &mut PatternMatch<'_>,
    trace: &mut dyn TraceSink,
) -> Result<(), Error> {
    let params = rules.stack_parameters()?;
    let phosphate = m.atom(0)?;
    let sugar = m.atom(1)?;
    let reverse = is_reverse(m.part.bond_between(phosphate, sugar)?, phosphate, sugar)?;

    let stretch = m.part.stretch_between_mut(phosphate, sugar)?;
    stretch.stretch_type = if reverse {
        params.sugar_phosphate.clone()
    } else {
        params.phosphate_sugar.clone()
    };
    let stretch = stretch.clone();

    trace.write_record(&TraceRecord::set_stretch_type(
        m.sequence_number,
        m.part,
        &stretch,
    ));
    Ok(())
}

fn phosphate_phosphate(
    rules: &Pam5Rules<'_>,
    m: &mut PatternMatch<'_>,
    trace: &mut dyn TraceSink,
) -> Result<(), Error> {
    let phosphate1 = m.atom(0)?;
    let phosphate2 = m.atom(2)?;
    queue_traced_bond(rules, m, trace, phosphate1, phosphate2)
}

fn groove_phosphate(
    rules: &Pam5Rules<'_>,
    m: &mut PatternMatch<'_>,
    trace: &mut dyn TraceSink,
) -> Result<(), Error> {
    let groove = m.atom(0)?;
    let sugar = m.atom(1)?;
    let phosphate = m.atom(2)?;
    if is_reverse(m.part.bond_between(phosphate, sugar)?, phosphate, sugar)? {
        return Ok(());
    }
    queue_traced_bond(rules, m, trace, phosphate, groove)
}
