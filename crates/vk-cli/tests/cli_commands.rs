//! Integration tests for the `vk` command line.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CREATE_KIRA: &str = "create Kira\n3\n2\n2\n1\n1\n";

fn vk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vk").unwrap();
    cmd.args(["--data-dir", dir.path().to_str().unwrap(), "--seed", "7"])
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn play(dir: &TempDir, script: &str) -> assert_cmd::assert::Assert {
    vk(dir).write_stdin(script.to_string()).assert()
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

#[test]
fn create_and_print() {
    let dir = TempDir::new().unwrap();
    play(&dir, &format!("{CREATE_KIRA}print\nquit\n"))
        .success()
        .stdout(
            predicate::str::contains("Creating a character named Kira")
                .and(predicate::str::contains("Name: Kira (Exp: 0/30)"))
                .and(predicate::str::contains("Edge: 3 Heart: 2 Iron: 2 Shadow: 1 Wits: 1"))
                .and(predicate::str::contains("Goodbye!")),
        );

    assert!(dir.path().join("characters.json").exists());
}

#[test]
fn last_character_is_resumed() {
    let dir = TempDir::new().unwrap();
    play(&dir, &format!("{CREATE_KIRA}quit\n")).success();

    play(&dir, "print\nquit\n")
        .success()
        .stdout(
            predicate::str::contains("Welcome back, Kira")
                .and(predicate::str::contains("Kira > ")),
        );
}

#[test]
fn end_of_input_saves() {
    let dir = TempDir::new().unwrap();
    play(&dir, &format!("{CREATE_KIRA}increase wits\ndecrease supply\n"))
        .success()
        .stdout(predicate::str::contains("Increasing wits from 1 to 2"));

    let saved = fs::read_to_string(dir.path().join("characters.json")).unwrap();
    assert!(saved.contains("\"wits\": 2"));
    assert!(saved.contains("\"supply\": 4"));
}

#[test]
fn errors_are_reported_and_the_loop_continues() {
    let dir = TempDir::new().unwrap();
    play(
        &dir,
        &format!("print\ndance\n{CREATE_KIRA}toggle maimed\ntoggle maimed\nprint\nquit\n"),
    )
    .success()
    .stdout(
        predicate::str::contains("no character loaded")
            .and(predicate::str::contains("Unknown command: dance"))
            .and(predicate::str::contains("Toggle maimed from 0 to 1"))
            .and(predicate::str::contains(
                "Maimed is a permanent bane and cannot be changed",
            ))
            .and(predicate::str::contains("Momentum: 2/9 [1]")),
    );
}

#[test]
fn journey_progress_shows_on_the_prompt() {
    let dir = TempDir::new().unwrap();
    play(
        &dir,
        &format!("{CREATE_KIRA}journey 1\nprogress\nprogress\nprogress\nprogress\nquit\n"),
    )
    .success()
    .stdout(
        predicate::str::contains("Kira > Journey 3/10 > ")
            .and(predicate::str::contains("(complete)")),
    );
}

#[test]
fn journey_difficulty_is_asked_for() {
    let dir = TempDir::new().unwrap();
    play(&dir, &format!("{CREATE_KIRA}journey\n9\n5\nprogress\nquit\n"))
        .success()
        .stdout(
            predicate::str::contains("Please set a difficulty for your journey")
                .and(predicate::str::contains("Invalid range"))
                .and(predicate::str::contains("Journey 0.25/10")),
        );
}

#[test]
fn switch_between_characters() {
    let dir = TempDir::new().unwrap();
    let script = format!(
        "{CREATE_KIRA}decrease health\ncreate Asha\n1\n1\n1\n1\n1\nls\ncd kira\nprint\ncd Nobody\nquit\n"
    );
    play(&dir, &script).success().stdout(
        predicate::str::contains("Asha")
            .and(predicate::str::contains("Health: 4/5"))
            .and(predicate::str::contains("No character named Nobody found.")),
    );
}

#[test]
fn delete_forgets_the_character() {
    let dir = TempDir::new().unwrap();
    play(&dir, &format!("{CREATE_KIRA}delete\nquit\n"))
        .success()
        .stdout(predicate::str::contains("Deleted Kira"));

    vk(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No characters found."));
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

#[test]
fn list_empty_directory() {
    let dir = TempDir::new().unwrap();
    vk(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No characters found."));
}

#[test]
fn list_and_show_saved_character() {
    let dir = TempDir::new().unwrap();
    play(&dir, &format!("{CREATE_KIRA}fight 2\nquit\n")).success();

    vk(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Kira")
                .and(predicate::str::contains("Fight 0/10"))
                .and(predicate::str::contains("1 characters")),
        );

    vk(&dir)
        .args(["show", "KIRA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active Fight: Difficulty: 2"));
}

#[test]
fn show_unknown_character_fails() {
    let dir = TempDir::new().unwrap();
    play(&dir, &format!("{CREATE_KIRA}quit\n")).success();

    vk(&dir)
        .args(["show", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No character named Nobody found."));
}

#[test]
fn out_of_range_values_are_reported_on_show() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("characters.json"),
        r#"{ "characters": [ { "id": 5, "name": "Kira", "edge": 9 } ], "last_used": 5 }"#,
    )
    .unwrap();

    vk(&dir)
        .args(["show", "Kira"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("value for edge (9) is out of range [0, 4], reset to 1")
                .and(predicate::str::contains("Edge: 1")),
        );
}
