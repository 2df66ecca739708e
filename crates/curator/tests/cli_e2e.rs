#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
featured_sizes = ["1x1", "2x1"]
pin_capacity = 2

[modules]
featurer = true
pinner = true
"#;

fn setup() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("curator.toml"), CONFIG).unwrap();
    curator_cmd(&temp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("cur-pinned-item"));
    temp
}

fn curator_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("curator"));
    cmd.env("CURATOR_DATA", dir.path().as_os_str());
    cmd
}

fn run(dir: &TempDir, args: &[&str]) -> assert_cmd::assert::Assert {
    curator_cmd(dir).args(args).assert().success()
}

#[test]
fn curate_feature_and_unpublish() {
    let dir = setup();

    run(&dir, &["create", "Story"]).stdout(predicate::str::contains("Created item 1: Story"));
    run(&dir, &["curate", "1"]).stdout(predicate::str::contains("Curated: Story (1)"));
    run(&dir, &["feature", "2", "--size", "2x1"])
        .stdout(predicate::str::contains("Feature on for item 2"));

    run(&dir, &["show", "1"])
        .stdout(predicate::str::contains("related: 2"))
        .stdout(predicate::str::contains("[x] featurer"))
        .stdout(predicate::str::contains("size:    2x1"));
    run(&dir, &["list"]).stdout(predicate::str::contains("Story"));

    run(&dir, &["unpublish", "1"]).stdout(predicate::str::contains("Uncurated item 1"));
    run(&dir, &["list"]).stdout(predicate::str::contains("No items found."));
}

#[test]
fn pins_respect_capacity() {
    let dir = setup();
    for title in ["A", "B", "C"] {
        run(&dir, &["create", title]);
    }
    // Records are 4, 5, 6 for originals 1, 2, 3
    for id in ["1", "2", "3"] {
        run(&dir, &["curate", id]);
    }
    for id in ["4", "5", "6"] {
        run(&dir, &["pin", id]);
    }

    run(&dir, &["pins"])
        .stdout(predicate::str::contains("p1. 6"))
        .stdout(predicate::str::contains("p2. 5"))
        .stdout(predicate::str::contains("4").not());
}

#[test]
fn save_form_goes_through_gates() {
    let dir = setup();
    run(&dir, &["create", "Story"]);

    run(&dir, &["save", "1", "--curate", "--no-token"])
        .stdout(predicate::str::contains("confirmation token missing"));
    run(&dir, &["save", "1", "--curate", "--role", "subscriber"])
        .stdout(predicate::str::contains("not allowed to edit"));

    run(&dir, &["save", "1", "--curate", "--pin"]).stdout(predicate::str::contains("Curated"));
    run(&dir, &["pins"]).stdout(predicate::str::contains("p1. 2"));
}

#[test]
fn curate_is_gated_like_the_form() {
    let dir = setup();
    run(&dir, &["create", "Draft", "--status", "draft"]);
    run(&dir, &["create", "About", "--type", "page"]);
    run(&dir, &["create", "Story"]);

    run(&dir, &["curate", "1"]).stdout(predicate::str::contains("item is not published"));
    run(&dir, &["curate", "2"]).stdout(predicate::str::contains("item type is not curatable"));
    run(&dir, &["curate", "3", "--role", "subscriber"])
        .stdout(predicate::str::contains("not allowed to edit"));

    run(&dir, &["show", "3"]).stdout(predicate::str::contains("related:").not());
    run(&dir, &["curate", "3"]).stdout(predicate::str::contains("Curated: Story (3)"));
}

#[test]
fn unknown_item_fails() {
    let dir = setup();
    curator_cmd(&dir)
        .args(["curate", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
