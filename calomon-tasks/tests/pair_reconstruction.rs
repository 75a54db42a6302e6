#![allow(clippy::float_cmp)]
use std::f64::consts::FRAC_PI_4;

use approx::assert_relative_eq;
use calomon_core::{BasicCluster, Cluster, Position, SuperCluster};
use calomon_tasks::pair::{isolation, low_mass_pairs};
use calomon_tasks::{FourMomentum, LeadingPair, LowMassCuts};

fn momentum(cluster: &BasicCluster) -> (f64, f64, f64, f64) {
    let theta = cluster.position.theta();
    let phi = cluster.position.phi();
    let e = cluster.energy;
    (
        e,
        e * theta.sin() * phi.cos(),
        e * theta.sin() * phi.sin(),
        e * theta.cos(),
    )
}

#[test]
fn test_pair_mass_matches_closed_form() {
    let a = BasicCluster::new(Position::from_eta_phi(0.4, 0.3, 129.0), 3.0, 4);
    let b = BasicCluster::new(Position::from_eta_phi(-0.2, 1.9, 129.0), 4.5, 6);
    let all = [a, b];
    let candidates: Vec<&BasicCluster> = all.iter().collect();

    let cuts = LowMassCuts::default().with_isolation(0.2, 100.0);
    let masses = low_mass_pairs(&candidates, &all, &cuts);
    assert_eq!(masses.len(), 2);

    let (ea, pxa, pya, pza) = momentum(&a);
    let (eb, pxb, pyb, pzb) = momentum(&b);
    let (e, px, py, pz) = (ea + eb, pxa + pxb, pya + pyb, pza + pzb);
    let expected = (e * e - px * px - py * py - pz * pz).sqrt();

    for mass in masses {
        assert_relative_eq!(mass, expected, epsilon = 1e-9);
    }
}

#[test]
fn test_low_pt_pair_rejected() {
    // two 1 GeV clusters back to back: pair p_T near zero
    let a = BasicCluster::new(Position::from_eta_phi(0.0, 0.0, 129.0), 1.0, 2);
    let b = BasicCluster::new(Position::from_eta_phi(0.0, 3.0, 129.0), 1.0, 2);
    let all = [a, b];
    let candidates: Vec<&BasicCluster> = all.iter().collect();
    assert!(low_mass_pairs(&candidates, &all, &LowMassCuts::default()).is_empty());
}

#[test]
fn test_collinear_pair_has_zero_mass() {
    let a = BasicCluster::new(Position::from_eta_phi(0.8, -1.2, 129.0), 4.0, 3);
    let all = [a, a];
    let candidates: Vec<&BasicCluster> = all.iter().collect();
    let cuts = LowMassCuts::default().with_isolation(0.2, f64::INFINITY);

    let masses = low_mass_pairs(&candidates, &all, &cuts);
    assert_eq!(masses.len(), 2);
    for mass in masses {
        assert!(mass.is_finite());
        assert_relative_eq!(mass, 0.0, epsilon = 1e-6);
    }
}

#[test]
fn test_single_candidate_yields_nothing() {
    let a = BasicCluster::new(Position::from_eta_phi(0.1, 0.2, 129.0), 5.0, 3);
    let all = [a];
    assert!(low_mass_pairs(&[&all[0]], &all, &LowMassCuts::default()).is_empty());
}

#[test]
fn test_isolation_includes_all_clusters_in_cone() {
    let clusters = [
        BasicCluster::new(Position::from_eta_phi(0.0, FRAC_PI_4, 129.0), 0.3, 1),
        BasicCluster::new(Position::from_eta_phi(0.1, FRAC_PI_4 + 0.1, 129.0), 0.4, 1),
        // outside the cone
        BasicCluster::new(Position::from_eta_phi(0.0, FRAC_PI_4 + 0.25, 129.0), 9.0, 1),
    ];
    let expected = clusters[0].transverse_energy() + clusters[1].transverse_energy();
    assert_relative_eq!(
        isolation(&clusters, 0.0, FRAC_PI_4, 0.2),
        expected,
        epsilon = 1e-12
    );
}

#[test]
fn test_isolation_wraps_azimuth() {
    let clusters = [BasicCluster::new(
        Position::from_eta_phi(0.0, 3.1, 129.0),
        2.0,
        1,
    )];
    assert_relative_eq!(
        isolation(&clusters, 0.0, -3.1, 0.2),
        2.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_degenerate_system_has_no_rapidity() {
    let along_beam = FourMomentum::new(7.0, 0.0, 0.0, 7.0);
    assert!(along_beam.rapidity().is_none());
    assert_eq!(along_beam.mass(), 0.0);
}

#[test]
fn test_leading_pair_from_iterator() {
    let clusters = [
        SuperCluster::new(Position::from_eta_phi(0.0, 0.0, 129.0), 20.0, 10, 2),
        SuperCluster::new(Position::from_eta_phi(0.0, 1.0, 129.0), 45.0, 10, 2),
        SuperCluster::new(Position::from_eta_phi(0.0, 2.0, 129.0), 40.0, 10, 2),
    ];
    let pair: LeadingPair<'_, SuperCluster> = clusters.iter().collect();
    assert_eq!(pair.leading().unwrap().energy, 45.0);
    assert_eq!(pair.sub_leading().unwrap().energy, 40.0);

    let expected = (FourMomentum::from_cluster(&clusters[1])
        + FourMomentum::from_cluster(&clusters[2]))
    .mass();
    assert_eq!(pair.mass(), Some(expected));

    let single: LeadingPair<'_, SuperCluster> = clusters[..1].iter().collect();
    assert!(single.mass().is_none());
}

#[test]
fn test_pair_along_beam_rejected_before_mass() {
    let cuts = LowMassCuts::default()
        .with_min_pair_pt(0.0)
        .with_isolation(0.2, f64::INFINITY);

    // on the beam axis E_pair == |pz_pair|; grazing it, E_pair - |pz_pair| is below 1e-10
    for (first, second) in [
        (Position::new(0.0, 0.0, 320.0), Position::new(0.0, 0.0, 300.0)),
        (Position::new(0.0, 0.0, -320.0), Position::new(0.0, 0.0, -310.0)),
        (Position::new(1e-12, 0.0, 320.0), Position::new(0.0, 1e-12, 320.0)),
    ] {
        let all = [
            BasicCluster::new(first, 3.0, 2),
            BasicCluster::new(second, 4.0, 2),
        ];
        let candidates: Vec<&BasicCluster> = all.iter().collect();
        let masses = low_mass_pairs(&candidates, &all, &cuts);
        assert!(masses.is_empty(), "{:?}", masses);
    }
}

#[test]
fn test_negative_energy_pair_rejected() {
    let cuts = LowMassCuts::default()
        .with_min_pair_pt(0.0)
        .with_isolation(0.2, f64::INFINITY);
    let all = [
        BasicCluster::new(Position::from_eta_phi(0.5, 0.2, 129.0), -3.0, 2),
        BasicCluster::new(Position::from_eta_phi(-0.4, 1.7, 129.0), -2.0, 2),
    ];
    let candidates: Vec<&BasicCluster> = all.iter().collect();
    let masses = low_mass_pairs(&candidates, &all, &cuts);
    assert!(masses.is_empty());
}
