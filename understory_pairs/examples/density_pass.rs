// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A smoothed-particle density pass: insert particles, enumerate candidate pairs, and
//! accumulate a kernel weight for every true neighbor pair.
//!
//! The lattice spacing does not divide evenly into binary fractions, so many particles sit
//! exactly on leaf boundaries. The result is checked against an all-pairs pass.

use understory_pairs::{PairStats, Point2D, QuadTree, within_radius};

struct Particle {
    pos: Point2D,
    density: f64,
}

fn kernel(d: Point2D, h: f64) -> f64 {
    let u = 1.0 - d.mag_sq() / (h * h);
    u * u * u
}

fn main() {
    let h = 1.0;
    let mut particles: Vec<Particle> = (0..400)
        .map(|i| {
            let (row, col) = (i / 20, i % 20);
            Particle {
                pos: Point2D::new(f64::from(col) * 0.7 - 7.0, f64::from(row) * 0.7 - 7.0),
                density: 0.0,
            }
        })
        .collect();
    // A far-away straggler makes the tree grow without hurting enumeration.
    particles.push(Particle {
        pos: Point2D::new(10_000_000.0, 0.0),
        density: 0.0,
    });

    let mut tree = QuadTree::new(h);
    for (i, p) in particles.iter().enumerate() {
        tree.insert(i, p.pos);
    }
    println!("{tree:?}");

    let mut stats = PairStats::default();
    let mut contributions = Vec::new();
    tree.enumerate_pairs(|a, b| {
        if stats.record(particles[a].pos, particles[b].pos, a == b, h) {
            contributions.push((a, b, kernel(particles[b].pos - particles[a].pos, h)));
        }
    });
    for (a, b, w) in contributions {
        particles[a].density += w;
        particles[b].density += w;
    }

    println!(
        "candidates={} neighbors={} hit_ratio={:.3}",
        stats.candidates,
        stats.neighbors,
        stats.hit_ratio()
    );
    println!("density at the center: {:.3}", particles[210].density);
    println!("density of the straggler: {:.3}", particles[400].density);

    let mut reference = vec![0.0; particles.len()];
    for (a, pa) in particles.iter().enumerate() {
        for (b, pb) in particles.iter().enumerate().skip(a + 1) {
            if within_radius(pa.pos, pb.pos, h) {
                let w = kernel(pb.pos - pa.pos, h);
                reference[a] += w;
                reference[b] += w;
            }
        }
    }
    let max_error = particles
        .iter()
        .zip(&reference)
        .map(|(p, r)| (p.density - r).abs())
        .fold(0.0, f64::max);
    println!("largest deviation from the all-pairs pass: {max_error:e}");
    assert!(
        max_error < 1e-12,
        "tree pass disagrees with the all-pairs pass by {max_error}"
    );
}
