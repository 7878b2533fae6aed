// Host-side tests for the seeded generator and daily seeds.

use inkburst_core::seed::layer_seed;
use inkburst_core::{daily_seed, CalendarDate, Mulberry32, SeedControl};
use std::collections::HashSet;

#[test]
fn generator_is_uniform_on_unit_interval() {
    const DRAWS: usize = 100_000;
    const BUCKETS: usize = 100;
    let mut rng = Mulberry32::new(20250115);
    let mut counts = [0usize; BUCKETS];
    for _ in 0..DRAWS {
        let x = rng.next_f64();
        assert!((0.0..1.0).contains(&x));
        counts[(x * BUCKETS as f64) as usize] += 1;
    }
    let expected = (DRAWS / BUCKETS) as f64;
    let chi2: f64 = counts
        .iter()
        .map(|&c| {
            let d = c as f64 - expected;
            d * d / expected
        })
        .sum();
    // 99 degrees of freedom, p = 0.001
    assert!(chi2 < 148.2, "chi-square {chi2}");
}

#[test]
fn adjacent_seeds_diverge_immediately() {
    for s in [-3, 0, 1, 20250115, i32::MAX - 1] {
        let mut a = Mulberry32::new(s);
        let mut b = Mulberry32::new(s.wrapping_add(1));
        let xs: Vec<f64> = (0..8).map(|_| a.next_f64()).collect();
        let ys: Vec<f64> = (0..8).map(|_| b.next_f64()).collect();
        assert_ne!(xs, ys, "seed {s}");
    }
}

#[test]
fn generator_replays_from_its_seed() {
    let mut a = Mulberry32::new(42);
    let first: Vec<f64> = (0..32).map(|_| a.next_f64()).collect();
    let mut b = Mulberry32::new(42);
    let again: Vec<f64> = (0..32).map(|_| b.next_f64()).collect();
    assert_eq!(first, again);
}

#[test]
fn helpers_respect_their_bounds() {
    let mut rng = Mulberry32::new(9);
    for _ in 0..10_000 {
        let r = rng.range(-2.0, 3.0);
        assert!((-2.0..3.0).contains(&r));
        assert!(rng.signed(4.0).abs() <= 2.0);
        assert!(rng.index(7) < 7);
    }
    let empty: [u8; 0] = [];
    assert_eq!(rng.pick(&empty), None);
    assert!(rng.pick(&[1, 2, 3]).is_some());
}

#[test]
fn every_calendar_day_has_its_own_seed() {
    let mut seen = HashSet::new();
    for year in 1970..2200 {
        for month in 1..=12 {
            for day in 1..=31 {
                let seed = daily_seed(CalendarDate::new(year, month, day));
                assert!(seen.insert(seed), "{year}-{month}-{day}");
            }
        }
    }
    assert_eq!(daily_seed(CalendarDate::new(2025, 1, 15)), 20250115);
}

#[test]
fn seed_control_steps_and_resets() {
    let today = CalendarDate::new(2025, 1, 15);
    let mut control = SeedControl::for_date(today);
    assert_eq!(control.next(), 20250116);
    assert_eq!(control.previous(), 20250115);
    assert_eq!(control.previous(), 20250114);
    control.reset_to(today);
    assert_eq!(control.seed(), 20250115);

    let mut top = SeedControl::with_seed(i32::MAX);
    assert_eq!(top.next(), i32::MIN);
}

#[test]
fn layer_seeds_wrap() {
    assert_eq!(layer_seed(20250115, 42), 20250157);
    assert_eq!(layer_seed(i32::MAX, 1), i32::MIN);
}
