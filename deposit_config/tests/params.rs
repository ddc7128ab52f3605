use deposit_config::params::DEFAULT_TARGETS;
use deposit_config::{Model, ParamError, ParseMode, parse_run_config};
use proptest::prelude::*;
use rstest::rstest;

const LAB_STRING: &str = "TARGET=10.0;MODEL=NP;SA_DENSITY=1;LEAK_CURRENT=1e-12;\
PARTICLE_DIAMETER=1.3;APERTURE_DIAMETER=7;TIME=[0,9200]";

#[test]
fn parses_laboratory_string() {
    let cfg = parse_run_config(LAB_STRING, ParseMode::Strict).unwrap();
    assert_eq!(cfg.model, Some(Model::Np));
    assert_eq!(cfg.targets, vec![10.0]);
    assert_eq!(cfg.leak_current, 1e-12);
    assert_eq!(cfg.sa_density_cm2, Some(1.0));
    assert_eq!(cfg.window, Some((0.0, 9200.0)));
    let r_p = 1.3e-9 / 2.0;
    let r_a = 7e-3 / 2.0;
    let ap = cfg.particle_area_m2.unwrap();
    let aa = cfg.aperture_area_m2.unwrap();
    assert!((ap - std::f64::consts::PI * r_p * r_p).abs() / ap < 1e-12);
    assert!((aa - std::f64::consts::PI * r_a * r_a).abs() / aa < 1e-12);
    assert!(!cfg.debug && !cfg.plot);
    assert!(cfg.ignored.is_empty());
}

#[test]
fn empty_string_gives_defaults() {
    let cfg = parse_run_config("", ParseMode::Lenient).unwrap();
    assert_eq!(cfg.model, None);
    assert_eq!(cfg.leak_current, 0.0);
    assert_eq!(cfg.targets, DEFAULT_TARGETS.to_vec());
    assert_eq!(cfg.window, None);
}

#[rstest]
#[case("TARGET=0")]
#[case("TARGET=-3")]
#[case("")]
fn non_positive_or_absent_target_selects_ladder(#[case] s: &str) {
    let cfg = parse_run_config(s, ParseMode::Lenient).unwrap();
    assert_eq!(cfg.targets, DEFAULT_TARGETS.to_vec());
}

#[test]
fn surrounding_semicolons_and_blank_segments_are_skipped() {
    let cfg = parse_run_config(";;MODEL=NP; ;DEBUG=yes;PLOT=on;;", ParseMode::Strict).unwrap();
    assert_eq!(cfg.model, Some(Model::Np));
    assert!(cfg.debug);
    assert!(cfg.plot);
}

#[test]
fn later_keys_override_earlier_ones() {
    let cfg = parse_run_config("LEAK_CURRENT=1;LEAK_CURRENT=2", ParseMode::Strict).unwrap();
    assert_eq!(cfg.leak_current, 2.0);
}

#[test]
fn unknown_key_is_recorded_in_lenient_mode() {
    let cfg = parse_run_config("MODEL=NP;SENSITIVITY=3", ParseMode::Lenient).unwrap();
    assert_eq!(cfg.ignored, vec![("SENSITIVITY".to_string(), "3".to_string())]);
}

#[test]
fn unknown_key_is_rejected_in_strict_mode() {
    let err = parse_run_config("MODEL=NP;SENSITIVITY=3", ParseMode::Strict).unwrap_err();
    assert_eq!(
        err,
        ParamError::UnknownKey {
            key: "SENSITIVITY".into(),
            value: "3".into()
        }
    );
}

#[rstest]
#[case("MODEL", "malformed")]
#[case("MODEL=NP=SA", "malformed")]
#[case("MODEL=XX", "MODEL must be")]
#[case("LEAK_CURRENT=abc", "not a number")]
#[case("PARTICLE_DIAMETER=0", "must be > 0")]
#[case("APERTURE_DIAMETER=-7", "must be > 0")]
#[case("TIME=[5]", "expected [start,end]")]
#[case("TIME=[9,1]", "start must not exceed end")]
#[case("LEAK_CURRENT=inf", "not finite")]
fn malformed_input_is_rejected(#[case] s: &str, #[case] needle: &str) {
    let err = parse_run_config(s, ParseMode::Lenient).unwrap_err();
    assert!(err.to_string().contains(needle), "got: {err}");
}

proptest! {
    #[test]
    fn parser_never_panics(s in "[A-Z_=;\\[\\],.0-9a-z -]{0,80}") {
        let _ = parse_run_config(&s, ParseMode::Lenient);
        let _ = parse_run_config(&s, ParseMode::Strict);
    }

    #[test]
    fn positive_target_is_kept_verbatim(t in 0.001f64..1000.0) {
        let cfg = parse_run_config(&format!("TARGET={t}"), ParseMode::Strict).unwrap();
        prop_assert_eq!(cfg.targets, vec![t]);
    }
}
