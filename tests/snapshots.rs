use monster_radar::{Coordinate, Engine, GameConfig};

const WARSAW: Coordinate = Coordinate::new(52.2297, 21.0122);

#[test]
fn engine_writes_snapshots_on_interval() {
    let temp_dir = tempfile::tempdir().unwrap();
    let snapshot_dir = temp_dir.path().join("snaps");
    let config = GameConfig::from_yaml_str("name: trace\nsnapshot_interval_ticks: 5\n").unwrap();

    let mut engine = Engine::from_config(&config, &snapshot_dir);
    engine.run(10, |_| Some(WARSAW)).unwrap();

    let scenario_dir = snapshot_dir.join("trace").join("run_000");
    assert!(scenario_dir.join("tick_000005.json").exists());
    assert!(!scenario_dir.join("tick_000004.json").exists());

    let expected = scenario_dir.join("tick_000010.json");
    let data = std::fs::read_to_string(&expected).unwrap();
    assert!(
        data.contains("\"scenario\": \"trace\""),
        "snapshot should contain scenario metadata"
    );
    let json: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(json["tick"], 10);
    assert_eq!(json["monsters"].as_array().map(Vec::len), Some(6));
    assert_eq!(json["state"]["monsters_spawned"], true);
}

#[test]
fn zero_interval_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = GameConfig::default();
    let mut engine = Engine::from_config(&config, temp_dir.path());
    engine.run(10, |_| Some(WARSAW)).unwrap();
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn reset_starts_a_new_run_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = GameConfig::from_yaml_str("name: again\nsnapshot_interval_ticks: 5\n").unwrap();
    let mut engine = Engine::from_config(&config, temp_dir.path());

    engine.run(5, |_| Some(WARSAW)).unwrap();
    let first = temp_dir.path().join("again/run_000/tick_000005.json");
    let before = std::fs::read_to_string(&first).unwrap();

    engine.reset();
    engine.run(5, |_| None).unwrap();

    assert_eq!(std::fs::read_to_string(&first).unwrap(), before);
    let second = temp_dir.path().join("again/run_001/tick_000005.json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(second).unwrap()).unwrap();
    assert_eq!(json["monsters"].as_array().map(Vec::len), Some(0));
}

#[test]
fn snapshot_failure_does_not_fail_the_tick() {
    let temp_dir = tempfile::tempdir().unwrap();
    let blocker = temp_dir.path().join("file");
    std::fs::write(&blocker, "occupied").unwrap();
    let config = GameConfig::from_yaml_str("snapshot_interval_ticks: 1\n").unwrap();

    let mut engine = Engine::from_config(&config, &blocker);
    let summary = engine.tick(Some(WARSAW)).unwrap().expect("running");
    assert_eq!(summary.state.elapsed_seconds, 1);
    assert_eq!(summary.monster_count, 3);
}
