use deposit_config::{ParseMode, RunConfig, parse_run_config};
use deposit_core::integrator::{deposition_rate, integral_charge};
use deposit_core::{IntegratorCfg, Measurement, integrate, trace};
use proptest::prelude::*;
use rstest::rstest;

fn constant(n: usize, dt: f64, current: f64) -> Measurement {
    Measurement::new((0..n).map(|i| (i as f64 * dt, current)).collect()).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1e-300)
}

#[rstest]
#[case(0, 0.0)]
#[case(1, 0.0)]
#[case(2, 1.0)]
#[case(11, 10.0)]
fn constant_current_integral(#[case] n: usize, #[case] intervals: f64) {
    let cfg = IntegratorCfg::default();
    let m = constant(n, 0.5, -2e-10);
    let out = integrate(&m, &RunConfig::default(), &cfg);
    let expected = 2e-10 * 0.5 * intervals / cfg.elementary_charge_c;
    assert!(close(out.particles, expected), "{} vs {expected}", out.particles);
    assert_eq!(out.samples, n);
}

#[test]
fn leak_current_is_added_before_abs() {
    let m = constant(3, 1.0, -1e-10);
    let run = parse_run_config("LEAK_CURRENT=3e-10", ParseMode::Lenient).unwrap();
    let out = integrate(&m, &run, &IntegratorCfg::default());
    assert!(close(out.charge_c, 2.0 * 2e-10));
}

#[test]
fn window_is_inclusive_and_applied() {
    let m = constant(101, 1.0, 1e-9);
    let run = parse_run_config("TIME=[10,20]", ParseMode::Lenient).unwrap();
    let out = integrate(&m, &run, &IntegratorCfg::default());
    assert_eq!(out.samples, 11);
    assert!(close(out.charge_c, 10.0 * 1e-9));
}

#[test]
fn window_past_the_series_integrates_to_zero() {
    let m = constant(10, 1.0, 1e-9);
    let run = parse_run_config("TIME=[100,200]", ParseMode::Lenient).unwrap();
    let out = integrate(&m, &run, &IntegratorCfg::default());
    assert_eq!(out.samples, 0);
    assert_eq!(out.particles, 0.0);
    assert_eq!(out.deposition_rate, None);
}

#[test]
fn rate_uses_trailing_samples_above_floor() {
    let cfg = IntegratorCfg {
        rate_window: 2,
        ..IntegratorCfg::default()
    };
    let m = Measurement::new(vec![
        (0.0, 5e-10),
        (1.0, 1e-9),
        (2.0, 1e-14),
        (3.0, 3e-9),
        (4.0, 0.0),
    ])
    .unwrap();
    let rate = deposition_rate(m.samples(), 0.0, &cfg).unwrap();
    assert!(close(rate, 2e-9 / cfg.elementary_charge_c));
}

#[test]
fn all_below_floor_has_no_rate() {
    let m = constant(50, 1.0, 1e-14);
    let out = integrate(&m, &RunConfig::default(), &IntegratorCfg::default());
    assert_eq!(out.above_floor, 0);
    assert_eq!(out.deposition_rate, None);
    assert!(out.particles > 0.0);
}

#[test]
fn trace_ends_at_the_integral() {
    let m = constant(20, 0.25, 4e-11);
    let run = RunConfig::default();
    let cfg = IntegratorCfg::default();
    let t = trace(&m, &run, &cfg);
    assert_eq!(t.len(), 20);
    assert_eq!(t[0].cumulative_particles, 0.0);
    let last = t.last().unwrap().cumulative_particles;
    assert!(close(last, integrate(&m, &run, &cfg).particles));
}

proptest! {
    #[test]
    fn constant_current_formula(
        n in 2usize..400,
        dt in 0.01f64..10.0,
        c in -1e-6f64..1e-6,
    ) {
        let cfg = IntegratorCfg::default();
        let m = constant(n, dt, c);
        let got = integral_charge(m.samples(), 0.0) / cfg.elementary_charge_c;
        let expected = c.abs() * dt * (n as f64 - 1.0) / cfg.elementary_charge_c;
        prop_assert!((got - expected).abs() <= 1e-9 * expected.abs() + 1e-6);
    }

    #[test]
    fn narrower_window_never_integrates_more(
        currents in prop::collection::vec(1e-12f64..1e-8, 2..200),
        a in 0usize..200,
        b in 0usize..200,
    ) {
        let n = currents.len();
        let m = Measurement::new(
            currents.iter().enumerate().map(|(i, &c)| (i as f64, c)).collect(),
        ).unwrap();
        let (lo, hi) = (a.min(b) % n, a.max(b) % n);
        let (lo, hi) = (lo.min(hi), lo.max(hi));
        let full = integral_charge(m.samples(), 0.0);
        let part = integral_charge(m.window(lo as f64, hi as f64), 0.0);
        prop_assert!(part <= full * (1.0 + 1e-12));
    }
}
