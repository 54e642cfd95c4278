use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "brutal-maze"])
        .status()
        .expect("failed to invoke cargo check for brutal-maze CLI binary");
    assert!(status.success(), "cargo check --bin brutal-maze should succeed");
}

#[test]
fn cli_writes_settings_for_the_requested_size() {
    let output = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["run", "--quiet", "--bin", "brutal-maze", "--"])
        .args(["--write-config", "--size", "800x600", "--fps", "50"])
        .output()
        .expect("failed to invoke the brutal-maze CLI binary");
    assert!(output.status.success(), "--write-config should exit cleanly");

    let settings = String::from_utf8(output.stdout).expect("settings are utf-8");
    assert!(settings.contains("[graphics]"), "{settings}");
    assert!(settings.contains("width = 800"), "{settings}");
    assert!(settings.contains("height = 600"), "{settings}");
    assert!(settings.contains("[tuning]"), "{settings}");
    assert!(settings.contains("frame_rate = 50.0"), "{settings}");
}
