use crate::model::atom::AtomId;
use crate::model::part::Part;

#[inline]
fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn real_position(part: &Part, id: AtomId) -> Option<[f64; 3]> {
    match part.find_atom(id) {
        Some(atom) if !atom.is_virtual() => part.position(id),
        _ => None,
    }
}

/// Whether the vectors from `axis1` to `axis2`, `side_a` and `side_b` form a
/// right-handed basis.
///
/// When this returns `false` for real atoms, swapping `side_a` and `side_b`
/// gives the expected orientation. Always `false` if any atom is virtual or
/// has no position. The comparison against zero is exact, so coplanar input
/// reports `false` in both orders.
pub fn is_expected_twist(
    part: &Part,
    axis1: AtomId,
    axis2: AtomId,
    side_a: AtomId,
    side_b: AtomId,
) -> bool {
    let (Some(v0), Some(v1), Some(v2), Some(v3)) = (
        real_position(part, axis1),
        real_position(part, axis2),
        real_position(part, side_a),
        real_position(part, side_b),
    ) else {
        return false;
    };
    let v1 = sub(v1, v0);
    let v2 = sub(v2, v0);
    let v3 = sub(v3, v0);
    dot(cross(v1, v2), v3) > 0.0
}
