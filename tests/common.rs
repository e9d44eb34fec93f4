#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, isolated from the user's real configuration.
pub fn cl() -> Command {
    cl_with_config_dir(&shared_config_dir())
}

pub fn cl_with_config_dir(dir: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("campusledger");
    cmd.env("CAMPUSLEDGER_CONFIG_DIR", dir).env("NO_COLOR", "1");
    cmd
}

fn shared_config_dir() -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push("campusledger_test_config");
    path.to_string_lossy().to_string()
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_campusledger.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Fresh per-test config directory (removed first).
pub fn setup_config_dir(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_campusledger_conf", name));
    fs::remove_dir_all(&path).ok();
    fs::create_dir_all(&path).expect("create config dir");
    path.to_string_lossy().to_string()
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize DB and register one student with the given code.
pub fn init_db_with_student(db_path: &str, code: &str) {
    cl().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    cl().args([
        "--db",
        db_path,
        "user",
        "add",
        code,
        "--email",
        &format!("{}@uni.edu", code.to_lowercase()),
        "--first",
        "Ada",
        "--last",
        "Lovelace",
    ])
    .assert()
    .success();
}

/// Register another student on an already initialized DB.
pub fn add_student(db_path: &str, code: &str) {
    cl().args([
        "--db",
        db_path,
        "user",
        "add",
        code,
        "--email",
        &format!("{}@uni.edu", code.to_lowercase()),
        "--first",
        "Grace",
        "--last",
        "Hopper",
    ])
    .assert()
    .success();
}
