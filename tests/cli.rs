extern crate assert_cmd;
extern crate image;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use image::GenericImageView;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn escapetime() -> Command {
    Command::cargo_bin("escapetime").unwrap()
}

const CORNERS: [&str; 2] = ["--lefttop=-2,1.5", "--rightbottom=1,-1.5"];
const SIZE: &str = "--size=100x100";

#[test]
fn locate_prints_both_points() {
    escapetime()
        .arg("locate")
        .arg(SIZE)
        .args(&CORNERS)
        .args(&["0", "0", "25", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Pixels (0.00, 0.00), and (25.00, 75.00) are at (-2.0000000000, +1.5000000000) and (-1.2500000000, -0.7500000000)",
        ));
}

#[test]
fn locate_refuses_a_bad_viewport() {
    escapetime()
        .arg("locate")
        .args(&["--size=10x10", "--lefttop=-2,-1", "--rightbottom=1,1"])
        .args(&["0", "0", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid viewport"));
}

#[test]
fn render_writes_a_png_of_the_right_size() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("mandel.png");
    escapetime()
        .arg("render")
        .args(&CORNERS)
        .args(&["--size=64x48", "--iterations=100", "--threads=2"])
        .arg(format!("--output={}", out.display()))
        .assert()
        .success();
    let img = image::open(&out).unwrap();
    assert_eq!(img.dimensions(), (64, 48));
}

#[test]
fn burning_ship_close_up_renders() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("ship.png");
    escapetime()
        .arg("render")
        .args(&["-f", "burning-ship", "-l", "-1.8005981445,0.0057373047", "-r", "-1.7136230469,-0.0812377930"])
        .args(&["--size=32x32", "--iterations=100", "--threads=2"])
        .arg(format!("--output={}", out.display()))
        .assert()
        .success();
    assert!(out.is_file());
}

#[test]
fn render_names_the_file_after_its_parameters() {
    let dir = TempDir::new().unwrap();
    escapetime()
        .current_dir(dir.path())
        .arg("render")
        .arg(SIZE)
        .args(&CORNERS)
        .args(&["--iterations=50", "--formula=tricorn", "--threads=1"])
        .assert()
        .success();
    let expected = dir
        .path()
        .join("tricorn")
        .join("(-2.0000000000, +1.5000000000)-(1.0000000000, -1.5000000000) (50 itr) (100px x 100px).png");
    assert!(expected.is_file(), "missing {}", expected.display());
}

#[test]
fn thread_count_does_not_change_the_output() {
    let dir = TempDir::new().unwrap();
    let one = dir.path().join("one.png");
    let many = dir.path().join("many.png");
    for (threads, out) in &[("1", &one), ("3", &many)] {
        escapetime()
            .arg("render")
            .arg(SIZE)
            .args(&CORNERS)
            .args(&["--iterations=200", "--coloring=normalized"])
            .arg(format!("--threads={}", threads))
            .arg(format!("--output={}", out.display()))
            .assert()
            .success();
    }
    assert_eq!(fs::read(&one).unwrap(), fs::read(&many).unwrap());
}

#[test]
fn configuration_errors_leave_no_file_behind() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("never.png");
    escapetime()
        .arg("render")
        .args(&["--size=0x10", "--lefttop=-2,1.5", "--rightbottom=1,-1.5"])
        .arg(format!("--output={}", out.display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid width"));
    assert!(!out.exists());
}

#[test]
fn short_palettes_are_rejected_up_front() {
    escapetime()
        .arg("render")
        .arg(SIZE)
        .args(&CORNERS)
        .arg("--palette=000000")
        .assert()
        .failure()
        .stderr(predicate::str::contains("palette needs at least 2 stops"));
}
