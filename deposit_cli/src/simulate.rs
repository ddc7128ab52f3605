//! `deposit simulate`: overlap simulation, dumps and charge comparison.

use deposit_config::Config;
use deposit_core::dump::{CLOUD_FILE, COMPARISON_FILE, write_cloud, write_comparison, write_simulation};
use deposit_core::{DepositError, SimulationOutcome, SimulationPlan, compare, run_simulation};
use serde_json::json;

use crate::cli::SimulateArgs;

fn plan_for(cfg: &Config, args: &SimulateArgs) -> SimulationPlan {
    let mut plan = SimulationPlan::from(cfg);
    if let Some(seed) = args.seed {
        plan.seed = Some(seed);
    }
    if let Some(trials) = args.trials {
        plan.trials = trials;
    }
    if let Some(sweeps) = args.sweeps {
        plan.trial.resolver.sweeps = sweeps;
    }
    plan.parallel = !args.sequential;
    plan
}

fn print_summary(outcome: &SimulationOutcome, rows: &[deposit_core::ComparisonRow]) {
    println!("seed: {}", outcome.seed);
    for l in &outcome.levels {
        println!(
            "loading {} ng: coverage {:.3} %, ratio {:.4} +/- {:.4}, charge {:.3e} C (theory {:.3e} C)",
            l.loading_ng, l.coverage_pct, l.mean_ratio, l.std_ratio, l.sim_charge, l.theory_charge
        );
    }
    for r in rows {
        match (r.simulated_c, r.ratio) {
            (Some(sim), Some(ratio)) => println!(
                "measured {} ng: {:.3e} C vs simulated {:.3e} C (ratio {:.3})",
                r.loading_ng, r.measured_c, sim, ratio
            ),
            _ => println!(
                "measured {} ng: {:.3e} C outside the simulated range",
                r.loading_ng, r.measured_c
            ),
        }
    }
}

pub fn run_simulate(cfg: &Config, args: &SimulateArgs, json: bool) -> eyre::Result<()> {
    let plan = plan_for(cfg, args);
    let outcome = run_simulation(&plan)?;

    std::fs::create_dir_all(&args.out_dir).map_err(DepositError::from)?;
    let mut written = write_simulation(&args.out_dir, &outcome)?;
    let rows = compare(&outcome.levels, &cfg.measured);
    let comparison = args.out_dir.join(COMPARISON_FILE);
    write_comparison(&comparison, &rows)?;
    written.push(comparison);
    if args.dump_cloud
        && let Some(cloud) = &outcome.last_cloud
    {
        let path = args.out_dir.join(CLOUD_FILE);
        write_cloud(&path, cloud)?;
        written.push(path);
    }
    for p in &written {
        tracing::info!(path = %p.display(), "written");
    }

    if json {
        let levels: Vec<_> = outcome
            .levels
            .iter()
            .map(|l| {
                json!({
                    "loading_ng": l.loading_ng,
                    "particles": l.particles,
                    "coverage_pct": l.coverage_pct,
                    "theory_charge": l.theory_charge,
                    "mean_ratio": l.mean_ratio,
                    "std_ratio": l.std_ratio,
                    "sim_charge": l.sim_charge,
                    "sim_charge_std": l.sim_charge_std,
                })
            })
            .collect();
        let comparison: Vec<_> = rows
            .iter()
            .map(|r| {
                json!({
                    "loading_ng": r.loading_ng,
                    "measured_c": r.measured_c,
                    "simulated_c": r.simulated_c,
                    "ratio": r.ratio,
                })
            })
            .collect();
        println!(
            "{}",
            json!({ "seed": outcome.seed, "levels": levels, "comparison": comparison })
        );
    } else {
        print_summary(&outcome, &rows);
    }
    Ok(())
}
