use deposit_config::{Config, MeasuredPoint, load_toml};
use deposit_core::contact::{BruteForce, ContactIndex, PlanarTree};
use deposit_core::loss::account;
use deposit_core::resolver::resolve;
use deposit_core::rng::trial_rng;
use deposit_core::{
    Cloud, IndexKind, LossCfg, ResolverCfg, SamplerCfg, SimulationPlan, TrialCfg, compare,
    run_simulation, run_trial,
};
use proptest::prelude::*;
use rstest::rstest;

fn small_trial(particles: usize, index: IndexKind) -> TrialCfg {
    TrialCfg {
        sampler: SamplerCfg {
            particles,
            ..SamplerCfg::default()
        },
        resolver: ResolverCfg {
            index,
            ..ResolverCfg::default()
        },
        loss: LossCfg::default(),
    }
}

fn small_plan(parallel: bool) -> SimulationPlan {
    SimulationPlan {
        trial: small_trial(150, IndexKind::Rtree),
        loadings_ng: vec![565.0, 997.0, 5000.0],
        trials: 3,
        seed: Some(0x5eed),
        parallel,
        ..SimulationPlan::default()
    }
}

#[test]
fn fixed_seed_is_bit_identical() {
    let cfg = small_trial(400, IndexKind::Rtree);
    let (a, cloud_a) = run_trial(&cfg, 25.0, 99).unwrap();
    let (b, cloud_b) = run_trial(&cfg, 25.0, 99).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.lost_area.to_bits(), b.lost_area.to_bits());
    let bits = |c: &Cloud| c.heights().iter().map(|h| h.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&cloud_a), bits(&cloud_b));
}

#[test]
fn different_seeds_differ() {
    let cfg = small_trial(400, IndexKind::Rtree);
    let (_, a) = run_trial(&cfg, 25.0, 1).unwrap();
    let (_, b) = run_trial(&cfg, 25.0, 2).unwrap();
    assert_ne!(a, b);
}

#[test]
fn single_particle_loses_base_penalty_only() {
    let cfg = small_trial(1, IndexKind::Rtree);
    let (r, cloud) = run_trial(&cfg, 10.0, 5).unwrap();
    assert_eq!(cloud.len(), 1);
    assert_eq!(r.lost_area, cfg.loss.base_penalty);
    assert_eq!(r.base_layer, 1);
    let footprint = cfg.loss.footprint_nm2;
    assert!((r.ratio - (footprint - 12.0) / footprint).abs() < 1e-12);
}

#[test]
fn pathological_pile_keeps_ratio_in_range() {
    let positions = vec![(50.0, 50.0); 60];
    let mut cloud = Cloud::from_positions(&positions, 100.0);
    resolve(&mut cloud, &BruteForce, &ResolverCfg::default());
    let report = account(&cloud, &BruteForce, &LossCfg::default());
    assert!((0.0..=1.0).contains(&report.ratio), "{report:?}");
    assert!(report.lost_area <= report.total_area);
}

#[rstest]
#[case(0.5)]
#[case(25.0)]
#[case(300.0)]
fn ratio_in_unit_interval(#[case] coverage: f64) {
    let (r, _) = run_trial(&small_trial(300, IndexKind::Rtree), coverage, 17).unwrap();
    assert!((0.0..=1.0).contains(&r.ratio), "{r:?}");
}

#[test]
fn denser_clouds_lose_more() {
    let cfg = small_trial(400, IndexKind::Rtree);
    let (sparse, _) = run_trial(&cfg, 1.0, 3).unwrap();
    let (dense, _) = run_trial(&cfg, 200.0, 3).unwrap();
    assert!(dense.ratio < sparse.ratio);
}

#[test]
fn backends_give_identical_trials() {
    let (brute, cb) = run_trial(&small_trial(300, IndexKind::Brute), 40.0, 8).unwrap();
    let (tree, ct) = run_trial(&small_trial(300, IndexKind::Rtree), 40.0, 8).unwrap();
    assert_eq!(brute, tree);
    assert_eq!(cb, ct);
}

#[test]
fn convergence_tolerance_can_stop_early() {
    let mut cfg = small_trial(50, IndexKind::Rtree);
    cfg.resolver.convergence_tol = Some(0.0);
    let (r, _) = run_trial(&cfg, 0.01, 4).unwrap();
    assert!(r.sweeps_run < cfg.resolver.sweeps, "{r:?}");
}

#[test]
fn parallel_matches_sequential() {
    let par = run_simulation(&small_plan(true)).unwrap();
    let seq = run_simulation(&small_plan(false)).unwrap();
    assert_eq!(par.seed, seq.seed);
    assert_eq!(par.levels, seq.levels);
    assert_eq!(par.last_cloud, seq.last_cloud);
}

#[test]
fn levels_follow_loadings() {
    let out = run_simulation(&small_plan(false)).unwrap();
    assert_eq!(out.levels.len(), 3);
    for l in &out.levels {
        assert_eq!(l.trials.len(), 3);
        assert!((l.sim_charge - l.theory_charge * l.mean_ratio).abs() <= 1e-18);
        assert!(l.std_ratio >= 0.0);
    }
    assert!(out.levels[0].coverage_pct < out.levels[2].coverage_pct);
    assert_eq!(out.last_cloud.map(|c| c.len()), Some(150));
}

#[test]
fn comparison_covers_measured_points() {
    let out = run_simulation(&small_plan(false)).unwrap();
    let measured = vec![
        MeasuredPoint {
            loading_ng: 13.0,
            charge_c: 3.5e-7,
        },
        MeasuredPoint {
            loading_ng: 997.0,
            charge_c: 2.9e-5,
        },
    ];
    let rows = compare(&out.levels, &measured);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].simulated_c, None);
    assert_eq!(rows[0].ratio, None);
    let sim = rows[1].simulated_c.unwrap();
    assert_eq!(sim, out.levels[1].sim_charge);
    assert!((rows[1].ratio.unwrap() - 2.9e-5 / sim).abs() < 1e-12);
}

#[test]
fn plan_from_config() {
    let cfg: Config = load_toml(
        r#"
        [simulation]
        particle_diameter_nm = 2.0
        sweeps = 3
        seed = 7
        index = "brute"

        [loading]
        loadings_ng = [100.0]
        "#,
    )
    .unwrap();
    let plan = SimulationPlan::from(&cfg);
    assert_eq!(plan.seed, Some(7));
    assert_eq!(plan.loadings_ng, vec![100.0]);
    assert_eq!(plan.trial.resolver.sweeps, 3);
    assert_eq!(plan.trial.resolver.index, IndexKind::Brute);
    assert_eq!(plan.trial.resolver.contact_diameter, 20.0);
    assert_eq!(plan.trial.loss.loss_radius, 25.0);
    assert_eq!(plan.loading.particle_diameter_nm, 2.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn tree_and_scan_agree(
        seed in any::<u64>(),
        coverage in 1.0f64..150.0,
        radius in 1.0f64..80.0,
    ) {
        let cfg = SamplerCfg { particles: 120, ..SamplerCfg::default() };
        let mut cloud = Cloud::sample(&mut trial_rng(seed), &cfg, coverage).unwrap();
        // Give the cloud non-trivial heights before comparing.
        resolve(&mut cloud, &BruteForce, &ResolverCfg { sweeps: 2, ..ResolverCfg::default() });
        let tree = PlanarTree::build(&cloud);
        let (mut a, mut b) = (Vec::new(), Vec::new());
        for i in 0..cloud.len() {
            BruteForce.contacts(&cloud, i, radius, &mut a);
            tree.contacts(&cloud, i, radius, &mut b);
            prop_assert_eq!(&a, &b);
        }
    }
}
