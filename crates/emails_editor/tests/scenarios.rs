use editor_test_support::load_scenarios;
use std::path::Path;

#[test]
fn scripted_sessions() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/scenarios.toml");
    let scenarios = load_scenarios(&path);
    for scenario in &scenarios {
        scenario.check();
    }
}
