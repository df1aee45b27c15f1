use particle_field::core::{step, step_report, Body, Bounds, Contact};
use particle_field::error::Result;

const TOL: f64 = 1e-9;

fn huge() -> Bounds {
    Bounds {
        width: 1e6,
        height: 1e6,
    }
}

fn close(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() < TOL && (a[1] - b[1]).abs() < TOL
}

/// Head-on pair: A at (0,0) moving right, B at (39,0) moving left, both size 40.
/// After the move step the centers are 37 apart (< 40), and the velocities swap.
#[test]
fn head_on_pair_swaps_velocities() -> Result<()> {
    let a = Body::new([0.0, 0.0], 40.0, [1.0, 0.0])?;
    let b = Body::new([39.0, 0.0], 40.0, [-1.0, 0.0])?;
    let s = step_report(&[a, b], huge());

    assert_eq!(s.contacts, vec![Contact { i: 0, j: 1 }]);
    assert_eq!(s.bodies[0].position, [1.0, 0.0]);
    assert_eq!(s.bodies[1].position, [38.0, 0.0]);
    assert!(close(s.bodies[0].velocity, [-1.0, 0.0]), "{:?}", s.bodies[0].velocity);
    assert!(close(s.bodies[1].velocity, [1.0, 0.0]), "{:?}", s.bodies[1].velocity);
    Ok(())
}

/// Touching circles (distance == sum of radii after the move) are left alone.
#[test]
fn exact_contact_is_not_a_collision() -> Result<()> {
    // centers (15, 20) and (50, 20): distance 35 == 15 + 20
    let a = Body::new([0.0, 5.0], 30.0, [0.0, 0.0])?;
    let b = Body::new([30.0, 0.0], 40.0, [0.0, 0.0])?;
    let s = step_report(&[a, b], huge());
    assert!(s.contacts.is_empty());

    // A hair closer and it collides
    let b = Body::new([29.5, 0.0], 40.0, [0.0, 0.0])?;
    let s = step_report(&[a, b], huge());
    assert_eq!(s.contacts, vec![Contact { i: 0, j: 1 }]);
    Ok(())
}

/// Resolved velocities follow the closed-form rotation for an oblique overlap.
#[test]
fn oblique_pair_matches_closed_form() -> Result<()> {
    let a = Body::new([100.0, 100.0], 44.0, [0.5, 1.5])?;
    let b = Body::new([130.0, 120.0], 36.0, [-1.25, -0.75])?;
    let s = step_report(&[a, b], huge());
    assert_eq!(s.contacts.len(), 1);

    // Positions after the move step
    let (pa, pb): ([f64; 2], [f64; 2]) = ([100.5, 101.5], [128.75, 119.25]);
    let ca = [pa[0] + 22.0, pa[1] + 22.0];
    let cb = [pb[0] + 18.0, pb[1] + 18.0];
    let angle = (cb[1] - ca[1]).atan2(cb[0] - ca[0]);
    let (sa, da) = (0.5_f64.hypot(1.5), 1.5_f64.atan2(0.5));
    let (sb, db) = ((-1.25_f64).hypot(-0.75), (-0.75_f64).atan2(-1.25));

    let va = [sb * (db - angle).cos(), sb * (db - angle).sin()];
    let vb = [sa * (da - angle).cos(), sa * (da - angle).sin()];
    assert!(close(s.bodies[0].velocity, va));
    assert!(close(s.bodies[1].velocity, vb));
    // Speeds are exchanged exactly
    assert!((s.bodies[0].speed() - sb).abs() < TOL);
    assert!((s.bodies[1].speed() - sa).abs() < TOL);
    Ok(())
}

/// Three mutually overlapping bodies: pairs resolve in (0,1), (0,2), (1,2) order and
/// each sees the velocities left by the previous pair.
#[test]
fn three_body_overlap_is_sequential() -> Result<()> {
    let bodies = vec![
        Body::new([0.0, 0.0], 40.0, [1.0, 0.0])?,
        Body::new([20.0, 0.0], 40.0, [0.0, 3.0])?,
        Body::new([10.0, 15.0], 40.0, [-2.0, 0.0])?,
    ];
    let s = step_report(&bodies, huge());
    assert_eq!(
        s.contacts,
        vec![
            Contact { i: 0, j: 1 },
            Contact { i: 0, j: 2 },
            Contact { i: 1, j: 2 }
        ]
    );

    // Replay the exchange rule by hand on the moved bodies
    let mut moved: Vec<Body> = bodies
        .iter()
        .map(|b| Body {
            position: [b.position[0] + b.velocity[0], b.position[1] + b.velocity[1]],
            ..*b
        })
        .collect();
    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        let (vi, vj) = particle_field::core::collision::exchange(&moved[i], &moved[j]);
        moved[i].velocity = vi;
        moved[j].velocity = vj;
    }
    for (got, want) in s.bodies.iter().zip(&moved) {
        assert!(close(got.velocity, want.velocity), "{got:?} vs {want:?}");
    }
    Ok(())
}

/// Positions are never corrected on collision: a slow overlapping pair may keep
/// overlapping for a few ticks, but only velocities change.
#[test]
fn no_position_correction() -> Result<()> {
    let a = Body::new([0.0, 0.0], 40.0, [0.0, 0.0])?;
    let b = Body::new([10.0, 0.0], 40.0, [0.0, 0.0])?;
    let out = step(&[a, b], huge());
    assert_eq!(out[0].position, [0.0, 0.0]);
    assert_eq!(out[1].position, [10.0, 0.0]);
    assert_eq!(out[0].velocity, [0.0, 0.0]);
    assert_eq!(out[1].velocity, [0.0, 0.0]);
    Ok(())
}

/// Bodies with exactly coincident centers resolve without NaNs.
#[test]
fn coincident_centers_stay_finite() -> Result<()> {
    let a = Body::new([50.0, 50.0], 40.0, [1.0, 1.0])?;
    let b = Body::new([50.0, 50.0], 40.0, [1.0, 1.0])?;
    let out = step(&[a, b], huge());
    for body in &out {
        assert!(body.velocity.iter().all(|v| v.is_finite()));
    }
    Ok(())
}

/// Identical inputs produce identical outputs, bit for bit.
#[test]
fn step_is_deterministic() -> Result<()> {
    let bodies = vec![
        Body::new([0.0, 0.0], 40.0, [1.0, 0.3])?,
        Body::new([35.0, 4.0], 32.0, [-1.7, 0.1])?,
        Body::new([60.0, 20.0], 48.0, [0.2, -1.9])?,
        Body::new([300.0, 200.0], 30.0, [1.1, 1.1])?,
    ];
    let bounds = Bounds::new(320.0, 240.0)?;
    let first = step(&bodies, bounds);
    for _ in 0..10 {
        assert_eq!(step(&bodies, bounds), first);
    }
    Ok(())
}

/// Exchanges and reflections only permute speeds between bodies: the sorted list
/// of speeds is the same before and after a crowded step.
#[test]
fn speeds_are_permuted_not_created() -> Result<()> {
    use rand::{rngs::StdRng, SeedableRng};
    let bounds = Bounds::new(180.0, 140.0)?;
    let mut rng = StdRng::seed_from_u64(8080);
    let mut bodies = particle_field::core::create(25, bounds, &mut rng)?;
    for _ in 0..200 {
        let mut before: Vec<f64> = bodies.iter().map(Body::speed).collect();
        bodies = step(&bodies, bounds);
        let mut after: Vec<f64> = bodies.iter().map(Body::speed).collect();
        before.sort_by(f64::total_cmp);
        after.sort_by(f64::total_cmp);
        for (b, a) in before.iter().zip(&after) {
            assert!((b - a).abs() < 1e-6, "speed {b} became {a}");
        }
    }
    Ok(())
}
