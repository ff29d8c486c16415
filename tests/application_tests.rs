use proximity_embedding::adapters::outbound::init_noop_logger;
use proximity_embedding::application::SimulationService;
use proximity_embedding::common::ApplicationError;
use proximity_embedding::domains::scenario::ScenarioKind;
use proximity_embedding::Config;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::Write;
use tempfile::NamedTempFile;

fn small_config(kind: ScenarioKind) -> Config {
    let mut config = Config::default();
    config.simulation.scenario = kind;
    config.simulation.num_nodes = 3;
    config.simulation.timesteps = 60;
    config.simulation.anchors_per_path = 10;
    config.embedding.max_rounds = 200;
    config
}

#[test]
fn test_run_scores_estimates_against_truth() {
    let service = SimulationService::new(small_config(ScenarioKind::Parallel), init_noop_logger()).unwrap();
    let report = service.run(&mut ChaCha8Rng::seed_from_u64(1)).unwrap();

    assert_eq!(report.anchors.len(), 20);
    assert_eq!(report.output.len(), report.truth.len());
    assert_eq!(report.output.sample_count(), report.truth.sample_count());

    let error = report.error.unwrap();
    assert_eq!(error.samples, report.truth.sample_count());
    assert!(error.mean.is_finite());
    assert!(error.max >= error.mean);

    let comments = report.comments(service.config());
    assert_eq!(comments[0], "scenario: parallel");
    assert!(comments.iter().any(|c| c.starts_with("localization error")));
}

#[test]
fn test_skip_returns_ground_truth() {
    let mut config = small_config(ScenarioKind::Lane);
    config.embedding.skip = true;
    let service = SimulationService::new(config, init_noop_logger()).unwrap();
    let report = service.run(&mut ChaCha8Rng::seed_from_u64(1)).unwrap();

    assert!(report.error.is_none());
    assert_eq!(report.output, report.truth);
}

#[test]
fn test_same_seed_same_report() {
    let service = SimulationService::new(small_config(ScenarioKind::Crossing), init_noop_logger()).unwrap();
    let a = service.run(&mut ChaCha8Rng::seed_from_u64(5)).unwrap();
    let b = service.run(&mut ChaCha8Rng::seed_from_u64(5)).unwrap();
    assert_eq!(a.output, b.output);
    assert_eq!(a.error, b.error);
}

#[test]
fn test_invalid_config_is_rejected_up_front() {
    let mut config = Config::default();
    config.embedding.detection_radius = -3.0;
    assert!(matches!(
        SimulationService::new(config, init_noop_logger()),
        Err(ApplicationError::Domain(_))
    ));
}

#[test]
fn test_config_file_roundtrip() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[simulation]
scenario = "sinus"
seed = 9
sinus_amplitude = 20.0

[embedding]
detection_radius = 30.0
hop_distance = 15.0

[logging]
file = "run.log"
"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.simulation.scenario, ScenarioKind::Sinus);
    assert_eq!(config.simulation.seed, 9);
    assert_eq!(config.simulation.sinus_amplitude, 20.0);
    assert_eq!(config.embedding.hop_distance, Some(15.0));
    assert_eq!(config.logging.file.as_deref(), Some("run.log"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_config_file_is_an_error() {
    assert!(Config::from_file("/nonexistent/proximity.toml").is_err());
}
