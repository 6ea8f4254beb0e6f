use std::path::PathBuf;

use monster_radar::{ConfigLoader, Coordinate};

fn config_loader() -> ConfigLoader {
    ConfigLoader::new(env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn loads_bundled_scenario() {
    let config = config_loader()
        .load(PathBuf::from("scenarios/warsaw.yaml"))
        .expect("scenario parses");
    assert_eq!(config.name, "warsaw");
    assert_eq!(config.player, Some(Coordinate::new(52.2297, 21.0122)));
    assert_eq!(config.ticks(None), 300);
    assert_eq!(config.ticks(Some(20)), 20);
    assert_eq!(config.waves.size, 3);
    assert_eq!(config.threat.lethal_radius_m, 5.0);
}

#[test]
fn missing_file_reports_path() {
    let err = config_loader().load("scenarios/nope.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("nope.yaml"));
}

#[test]
fn invalid_file_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("bad.yaml"),
        "tick_period_ms: 0\n",
    )
    .unwrap();
    let err = ConfigLoader::new(temp_dir.path()).load("bad.yaml").unwrap_err();
    assert!(format!("{err:#}").contains("tick_period_ms"));
}
