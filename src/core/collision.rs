use crate::core::body::Body;

/// A pair of bodies `(i, j)`, `i < j`, whose circles overlapped during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Contact {
    pub i: usize,
    pub j: usize,
}

/// Circle overlap test on the bodies' centers.
///
/// Touching circles (distance exactly equal to the sum of radii) do not overlap.
#[inline]
pub fn overlaps(a: &Body, b: &Body) -> bool {
    let (ca, cb) = (a.center(), b.center());
    let dist = (ca[0] - cb[0]).hypot(ca[1] - cb[1]);
    dist < a.radius() + b.radius()
}

/// Velocities of `a` and `b` after the exchange rule.
///
/// Each body takes the other's speed, with the other's heading measured relative
/// to the line of centers (`angle = atan2(cy_b - cy_a, cx_b - cx_a)`). Coincident
/// centers give `atan2(0, 0) = 0`.
pub fn exchange(a: &Body, b: &Body) -> ([f64; 2], [f64; 2]) {
    let (ca, cb) = (a.center(), b.center());
    let angle = (cb[1] - ca[1]).atan2(cb[0] - ca[0]);
    let (speed_a, speed_b) = (a.speed(), b.speed());
    let (dir_a, dir_b) = (a.heading(), b.heading());
    let va = [
        speed_b * (dir_b - angle).cos(),
        speed_b * (dir_b - angle).sin(),
    ];
    let vb = [
        speed_a * (dir_a - angle).cos(),
        speed_a * (dir_a - angle).sin(),
    ];
    (va, vb)
}

/// Scan every unordered pair in ascending `(i, j)` order and resolve overlaps in place.
///
/// Resolution mutates `bodies` as it goes: pair `(i, k)` sees the velocity that an
/// earlier pair `(i, j)` already gave body `i`. Positions are never touched, so
/// detection for later pairs is unaffected. Returns the resolved pairs in order.
pub fn resolve_all(bodies: &mut [Body]) -> Vec<Contact> {
    let n = bodies.len();
    let mut contacts = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if !overlaps(&bodies[i], &bodies[j]) {
                continue;
            }
            let (vi, vj) = exchange(&bodies[i], &bodies[j]);
            bodies[i].velocity = vi;
            bodies[j].velocity = vj;
            log::trace!("contact ({i}, {j}): v_i={vi:?} v_j={vj:?}");
            contacts.push(Contact { i, j });
        }
    }
    contacts
}
