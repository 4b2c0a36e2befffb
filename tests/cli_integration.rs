//! Integration tests for the `td` CLI.
//!
//! Each test points `--store` at a file in a temp directory, runs `td` as a
//! subprocess, and verifies stdout and/or the store contents.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Get the path to the built `td` binary.
fn td_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("td");
    path
}

fn td(store: &Path, args: &[&str]) -> Output {
    Command::new(td_bin())
        .arg("--store")
        .arg(store)
        .args(args)
        .output()
        .expect("failed to run td")
}

fn td_ok(store: &Path, args: &[&str]) -> String {
    let out = td(store, args);
    assert!(
        out.status.success(),
        "td {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn store_path(dir: &TempDir) -> PathBuf {
    dir.path().join("tasks.json")
}

#[test]
fn first_run_creates_default_list() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    let out = td_ok(&store, &["lists"]);
    assert!(out.contains("My Tasks"));
    assert!(out.contains("0 remaining"));
}

#[test]
fn add_and_ls_show_newest_first() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "First chore"]);
    td_ok(&store, &["add", "Second chore"]);

    let out = td_ok(&store, &["ls", "--sort", "created_desc"]);
    let first_pos = out.find("First chore").unwrap();
    let second_pos = out.find("Second chore").unwrap();
    assert!(second_pos < first_pos, "newest first:\n{}", out);
    assert!(out.contains("2 remaining"));
}

#[test]
fn done_completes_and_hides_from_active_view() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Finish me"]);
    let out = td_ok(&store, &["done", "1"]);
    assert!(out.contains("completed: Finish me"));

    let out = td_ok(&store, &["ls"]);
    assert!(!out.contains("Finish me"));
    assert!(out.contains("no tasks"));

    let out = td_ok(&store, &["ls", "--status", "completed"]);
    assert!(out.contains("Finish me"));
}

#[test]
fn done_on_recurring_task_spawns_next_occurrence() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &[
        "add",
        "Water plants",
        "--repeat",
        "daily",
        "--due",
        "2025-06-01",
    ]);
    let out = td_ok(&store, &["done", "1"]);
    assert!(out.contains("completed: Water plants"));
    assert!(out.contains("next occurrence due 2025-06-02"));

    // The active view shows the spawned occurrence
    let out = td_ok(&store, &["ls"]);
    assert!(out.contains("Water plants"));
    assert!(out.contains("1 remaining"));
}

#[test]
fn rm_deletes_a_task() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Ephemeral"]);
    let out = td_ok(&store, &["rm", "1"]);
    assert!(out.contains("deleted: Ephemeral"));
    assert!(td_ok(&store, &["ls"]).contains("no tasks"));
}

#[test]
fn edit_updates_fields() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Rough draft"]);
    td_ok(&store, &[
        "edit",
        "1",
        "--text",
        "Final draft",
        "--priority",
        "high",
        "--tags",
        "writing, review",
    ]);
    let out = td_ok(&store, &["ls"]);
    assert!(out.contains("Final draft"));
    assert!(out.contains("!high"));
    assert!(out.contains("#writing"));
    assert!(out.contains("#review"));
}

#[test]
fn subtask_lifecycle_via_cli() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Parent"]);
    td_ok(&store, &["sub", "1", "add", "step one"]);
    td_ok(&store, &["sub", "1", "add", "step two"]);

    let out = td_ok(&store, &["ls"]);
    assert!(out.contains("[0/2]"));

    td_ok(&store, &["sub", "1", "done", "1"]);
    assert!(td_ok(&store, &["ls"]).contains("[1/2]"));

    td_ok(&store, &["sub", "1", "rm", "2"]);
    assert!(td_ok(&store, &["ls"]).contains("[1/1]"));
}

#[test]
fn lists_are_isolated() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Home chore"]);
    td_ok(&store, &["list", "new", "Work"]);
    td_ok(&store, &["add", "Work item"]);

    let out = td_ok(&store, &["ls"]);
    assert!(out.contains("Work item"));
    assert!(!out.contains("Home chore"));

    td_ok(&store, &["use", "My Tasks"]);
    let out = td_ok(&store, &["ls"]);
    assert!(out.contains("Home chore"));
    assert!(!out.contains("Work item"));
}

#[test]
fn deleting_last_list_fails() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Keep me"]);
    let out = td(&store, &["list", "rm", "--yes"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("last remaining list"), "stderr: {}", stderr);
    // Nothing was lost
    assert!(td_ok(&store, &["ls"]).contains("Keep me"));
}

#[test]
fn delete_list_cascades() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["list", "new", "Doomed"]);
    td_ok(&store, &["add", "Going down with the ship"]);
    td_ok(&store, &["list", "rm", "--yes"]);

    let out = td_ok(&store, &["lists"]);
    assert!(!out.contains("Doomed"));
    // Fallover to the remaining list; the cascaded task is gone everywhere
    let out = td_ok(&store, &["ls", "--status", "all"]);
    assert!(!out.contains("Going down with the ship"));
}

#[test]
fn clear_completed_reports_count() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "One"]);
    td_ok(&store, &["add", "Two"]);
    td_ok(&store, &["done", "1"]);
    let out = td_ok(&store, &["clear-completed"]);
    assert!(out.contains("cleared 1 completed task(s)"));
}

#[test]
fn export_import_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Travels well", "--tags", "luggage"]);

    let backup = dir.path().join("backup.json");
    td_ok(&store, &["export", backup.to_str().unwrap()]);
    assert!(backup.exists());

    // Import into a fresh store
    let other_store = dir.path().join("other.json");
    let out = td_ok(&other_store, &["import", backup.to_str().unwrap()]);
    assert!(out.contains("imported 1 list(s), 1 task(s)"));
    assert!(td_ok(&other_store, &["ls"]).contains("Travels well"));
}

#[test]
fn import_invalid_file_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Precious"]);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "not json {{{").unwrap();
    let out = td(&store, &["import", bad.to_str().unwrap()]);
    assert!(!out.status.success());

    assert!(td_ok(&store, &["ls"]).contains("Precious"));
}

#[test]
fn export_csv_writes_rows() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Spreadsheet fodder", "--priority", "high"]);

    let csv = dir.path().join("out.csv");
    td_ok(&store, &["export-csv", csv.to_str().unwrap()]);
    let contents = std::fs::read_to_string(&csv).unwrap();
    assert!(contents.starts_with("list,task,notes,priority,tags,dueAt"));
    assert!(contents.contains("\"Spreadsheet fodder\""));
    assert!(contents.contains("\"high\""));
}

#[test]
fn corrupted_store_degrades_to_default() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    std::fs::write(&store, "{{{ definitely not json").unwrap();
    let out = td_ok(&store, &["lists"]);
    assert!(out.contains("My Tasks"));
}

#[test]
fn reset_requires_confirmation() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Survivor"]);

    let out = td(&store, &["reset"]);
    assert!(!out.status.success());
    assert!(td_ok(&store, &["ls"]).contains("Survivor"));

    td_ok(&store, &["reset", "--yes"]);
    assert!(td_ok(&store, &["ls"]).contains("no tasks"));
}

#[test]
fn json_output_is_parseable() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Machine readable", "--tags", "api"]);

    let out = td_ok(&store, &["ls", "--json"]);
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(rows[0]["text"], "Machine readable");
    assert_eq!(rows[0]["tags"][0], "api");

    let out = td_ok(&store, &["lists", "--json"]);
    let rows: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(rows[0]["name"], "My Tasks");
    assert_eq!(rows[0]["active"], true);
    assert_eq!(rows[0]["remaining"], 1);
}

#[test]
fn ls_persists_status_and_sort() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["add", "Visible"]);
    td_ok(&store, &["ls", "--status", "all", "--sort", "alpha_asc"]);

    let contents = std::fs::read_to_string(&store).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["settings"]["statusFilter"], "all");
    assert_eq!(value["settings"]["sortMode"], "alpha_asc");
}

#[test]
fn theme_is_persisted() {
    let dir = TempDir::new().unwrap();
    let store = store_path(&dir);
    td_ok(&store, &["theme", "dark"]);
    let contents = std::fs::read_to_string(&store).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["settings"]["theme"], "dark");

    // No argument toggles
    let out = td_ok(&store, &["theme"]);
    assert!(out.contains("theme: light"));
}
