use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn build_asset_dir() -> TempDir {
    let model = r#"# a single textured triangle
v 0.0 1.0 0.0
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
vt 0.5 1.0
vt 0.0 0.0
vt 1.0 0.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/2 3/3/3
"#;

    let dir = TempDir::new().expect("temp asset dir");
    let shaders = dir.path().join("shaders");
    let models = dir.path().join("models");
    fs::create_dir_all(&shaders).expect("shader dir");
    fs::create_dir_all(&models).expect("model dir");
    for name in [
        "blinn_phong.vert",
        "blinn_phong.frag",
        "textured_blinn_phong.vert",
        "textured_blinn_phong.frag",
        "basic_textured.vert",
        "basic_textured.frag",
    ] {
        fs::write(shaders.join(name), "void main() {}\n").expect("write shader");
    }
    fs::write(models.join("gem.obj"), model).expect("write model");
    dir
}

#[test]
fn headless_reports_mesh_and_shader_catalog() {
    let assets = build_asset_dir();
    let mut cmd = Command::cargo_bin("phong-viewer").expect("binary exists");
    cmd.arg(assets.path()).arg("--headless");

    cmd.assert()
        .success()
        .stdout(contains("Parsed mesh: 3 corners (1 triangles)"))
        .stdout(contains("shader blinn_phong (2 attributes, 10 uniforms)"))
        .stdout(contains("shader textured_blinn_phong (3 attributes, 11 uniforms)"))
        .stdout(contains("shader basic_textured (3 attributes, 5 uniforms)"));
}

#[test]
fn quads_are_counted_after_fan_triangulation() {
    let assets = build_asset_dir();
    let quad = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
    fs::write(assets.path().join("models").join("gem.obj"), quad).expect("write model");

    let mut cmd = Command::cargo_bin("phong-viewer").expect("binary exists");
    cmd.arg(assets.path()).arg("--headless");

    cmd.assert()
        .success()
        .stdout(contains("Parsed mesh: 6 corners (2 triangles)"));
}

#[test]
fn missing_asset_fails_the_whole_batch() {
    let assets = build_asset_dir();
    fs::remove_file(assets.path().join("shaders").join("blinn_phong.frag"))
        .expect("remove shader");

    let mut cmd = Command::cargo_bin("phong-viewer").expect("binary exists");
    cmd.arg(assets.path()).arg("--headless");

    cmd.assert()
        .failure()
        .stderr(contains("failed to load startup assets"))
        .stderr(contains("blinn_phong.frag"));
}

#[test]
fn unknown_flag_is_rejected() {
    let mut cmd = Command::cargo_bin("phong-viewer").expect("binary exists");
    cmd.arg("--frobnicate");

    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --frobnicate"));
}
