use std::path::PathBuf;

use dotmap::{GeoPoint, MapScene, MapStyle};

fn dotmap_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_dotmap")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "dotmap.exe"
            } else {
                "dotmap"
            });
            p
        })
}

#[test]
fn cli_frame_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let scene_path = dir.join("scene.json");
    let out_path = dir.join("map.png");
    let _ = std::fs::remove_file(&out_path);

    let scene = MapScene::new(
        vec![
            GeoPoint::new(48.8566, 2.3522, 0.3),
            GeoPoint::new(52.52, 13.405, 0.3),
        ],
        MapStyle::default(),
    );
    let f = std::fs::File::create(&scene_path).unwrap();
    serde_json::to_writer_pretty(f, &scene).unwrap();

    let status = std::process::Command::new(dotmap_exe())
        .args(["frame", "--in"])
        .arg(&scene_path)
        .args(["--width", "64", "--height", "64", "--out"])
        .arg(&out_path)
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out_path.exists());
}

#[test]
fn cli_reports_missing_scene_without_panicking() {
    let output = std::process::Command::new(dotmap_exe())
        .args([
            "frame",
            "--in",
            "target/cli_smoke/does_not_exist.json",
            "--out",
            "target/cli_smoke/never.png",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open scene"));
    assert!(!stderr.contains("panicked"));
}
