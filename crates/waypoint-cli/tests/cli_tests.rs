use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper function to create a temporary directory for CLI tests
fn create_cli_test_environment() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a plain-text `wp` command on a given database
fn wp_cmd(db_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wp").expect("Failed to find wp binary");
    cmd.arg("--no-color")
        .arg("--database-file")
        .arg(db_path.to_str().expect("utf-8 path"));
    cmd
}

fn create_plan(db_path: &Path, title: &str) {
    wp_cmd(db_path)
        .args(["plan", "create", title, "--goal", "Get it done"])
        .assert()
        .success();
}

fn add_task(db_path: &Path, plan_id: &str, title: &str, extra: &[&str]) {
    wp_cmd(db_path)
        .args(["task", "add", plan_id, title])
        .args(extra)
        .assert()
        .success();
}

#[test]
fn test_cli_create_plan_success() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args([
            "plan",
            "create",
            "Learn Rust",
            "--goal",
            "Write a CLI tool",
            "--timeframe",
            "3 months",
            "--description",
            "Evenings and weekends",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created plan with ID: 1"))
        .stdout(predicate::str::contains("# 1. Learn Rust"))
        .stdout(predicate::str::contains("- Goal: Write a CLI tool"))
        .stdout(predicate::str::contains("- Timeframe: 3 months"))
        .stdout(predicate::str::contains("Evenings and weekends"));
}

#[test]
fn test_cli_create_plan_requires_goal() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args(["plan", "create", "No goal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--goal"));

    wp_cmd(&db_path)
        .args(["plan", "create", "   ", "--goal", "Something"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input for field 'title'"));
}

#[test]
fn test_cli_list_empty_plans() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));

    // No subcommand lists plans too
    wp_cmd(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No plans found."));
}

#[test]
fn test_cli_list_plans_with_filters() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    create_plan(&db_path, "Garden");
    create_plan(&db_path, "Kitchen");
    wp_cmd(&db_path)
        .args(["plan", "status", "1", "paused"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: paused"));

    wp_cmd(&db_path)
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Garden (ID: 1) 0%"))
        .stdout(predicate::str::contains("## Kitchen (ID: 2) 0%"));

    wp_cmd(&db_path)
        .args(["plan", "list", "--status", "paused"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Garden"))
        .stdout(predicate::str::contains("Kitchen").not());

    wp_cmd(&db_path)
        .args(["plan", "list", "--title", "kitch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kitchen"))
        .stdout(predicate::str::contains("Garden").not());

    wp_cmd(&db_path)
        .args(["plan", "list", "--status", "archived"])
        .assert()
        .failure();
}

#[test]
fn test_cli_show_missing_plan() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args(["plan", "show", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plan with ID 99 not found"));
}

#[test]
fn test_cli_update_plan() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    create_plan(&db_path, "Draft");

    wp_cmd(&db_path)
        .args(["plan", "update", "1", "--title", "Final", "--timeframe", "Q3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated plan with ID: 1"))
        .stdout(predicate::str::contains("- Title: Final"))
        .stdout(predicate::str::contains("- Timeframe: Q3"));

    wp_cmd(&db_path)
        .args(["plan", "update", "1", "--status", "archived"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid plan status"));
}

#[test]
fn test_cli_delete_plan_requires_confirm() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    create_plan(&db_path, "Doomed");
    add_task(&db_path, "1", "Only task", &[]);

    wp_cmd(&db_path)
        .args(["plan", "delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--confirm"));

    wp_cmd(&db_path)
        .args(["plan", "delete", "1", "--confirm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted plan 'Doomed' (ID: 1)"));

    wp_cmd(&db_path)
        .args(["task", "show", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task with ID 1 not found"));
}

#[test]
fn test_cli_plan_progress() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    create_plan(&db_path, "Progress");
    for title in ["a", "b", "c"] {
        add_task(&db_path, "1", title, &[]);
    }

    wp_cmd(&db_path)
        .args(["task", "status", "1", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Completed"))
        .stdout(predicate::str::contains("- Completed:"));

    wp_cmd(&db_path)
        .args(["plan", "progress", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Tasks: 1/3 (33%)"))
        .stdout(predicate::str::contains("- Overall: 33%"));

    wp_cmd(&db_path)
        .args(["plan", "status", "1", "completed"])
        .assert()
        .success();

    wp_cmd(&db_path)
        .args(["plan", "progress", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Overall: 100%"));
}

#[test]
fn test_cli_milestones() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    create_plan(&db_path, "Phased");

    for title in ["Foundations", "Walls"] {
        wp_cmd(&db_path)
            .args(["milestone", "add", "1", title])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created milestone with ID:"));
    }

    wp_cmd(&db_path)
        .args(["milestone", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("### 1. Foundations [todo] (1)"))
        .stdout(predicate::str::contains("### 2. Walls [todo] (2)"));

    wp_cmd(&db_path)
        .args(["milestone", "swap", "1", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Success: Swapped milestones 1 and 2"));

    wp_cmd(&db_path)
        .args(["milestone", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("### 1. Walls [todo] (2)"))
        .stdout(predicate::str::contains("### 2. Foundations [todo] (1)"));

    wp_cmd(&db_path)
        .args(["milestone", "status", "1", "in progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[in_progress]"));

    wp_cmd(&db_path)
        .args(["milestone", "delete", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted milestone 'Walls' (ID: 2)"));
}

#[test]
fn test_cli_tasks() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    create_plan(&db_path, "Tasks");

    wp_cmd(&db_path)
        .args([
            "task",
            "add",
            "1",
            "Read the book",
            "--priority",
            "high",
            "--estimate",
            "4",
            "--due",
            "2030-01-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task with ID: 1"))
        .stdout(predicate::str::contains("- Priority: high"))
        .stdout(predicate::str::contains("- Estimate: 4h"))
        .stdout(predicate::str::contains("- Due:"));

    wp_cmd(&db_path)
        .args(["task", "add", "1", "Bad", "--priority", "whenever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("priority"));

    wp_cmd(&db_path)
        .args(["task", "add", "1", "Bad", "--due", "next tuesday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("due_date"));

    add_task(&db_path, "1", "Write notes", &[]);

    wp_cmd(&db_path)
        .args(["task", "update", "2", "--actual", "1.5", "--status", "in_progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Actual hours: 1.5"))
        .stdout(predicate::str::contains("➤ In Progress"));

    wp_cmd(&db_path)
        .args(["task", "list", "--plan", "1", "--status", "in_progress"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write notes"))
        .stdout(predicate::str::contains("Read the book").not());

    wp_cmd(&db_path)
        .args(["task", "list", "--plan", "1", "--status", "blocked"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid task status"));

    wp_cmd(&db_path)
        .args(["task", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted task 'Read the book' (ID: 1)"));
}

#[test]
fn test_cli_dependencies() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    create_plan(&db_path, "Graph");
    for title in ["Design", "Build", "Ship"] {
        add_task(&db_path, "1", title, &[]);
    }

    wp_cmd(&db_path)
        .args(["task", "depend", "2", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 2 now depends on task 1"));
    wp_cmd(&db_path)
        .args(["task", "depend", "3", "2"])
        .assert()
        .success();

    wp_cmd(&db_path)
        .args(["task", "depend", "1", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("would create a cycle"));

    wp_cmd(&db_path)
        .args(["task", "depend", "1", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot depend on itself"));

    wp_cmd(&db_path)
        .args(["task", "actionable", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Design"))
        .stdout(predicate::str::contains("Build").not());

    wp_cmd(&db_path)
        .args(["task", "show", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Prerequisites"))
        .stdout(predicate::str::contains("### 2. Build"));

    wp_cmd(&db_path)
        .args(["plan", "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Depends on: 1"));

    wp_cmd(&db_path)
        .args(["task", "undepend", "3", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 3 no longer depends on task 2"));

    wp_cmd(&db_path)
        .args(["task", "undepend", "3", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_resources() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    create_plan(&db_path, "Reading");

    wp_cmd(&db_path)
        .args([
            "resource",
            "add",
            "1",
            "The Book",
            "--url",
            "https://doc.rust-lang.org/book/",
            "--kind",
            "book",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created resource with ID: 1"));

    wp_cmd(&db_path)
        .args(["resource", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "- 1. [The Book](https://doc.rust-lang.org/book/) (book)",
        ));

    wp_cmd(&db_path)
        .args(["resource", "delete", "1"])
        .assert()
        .success();

    wp_cmd(&db_path)
        .args(["resource", "list", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No resources found."));
}

#[test]
fn test_cli_dashboard() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    create_plan(&db_path, "One");
    create_plan(&db_path, "Two");
    add_task(&db_path, "1", "Late", &["--due", "2020-01-01"]);
    add_task(&db_path, "2", "Fine", &[]);

    wp_cmd(&db_path)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Dashboard"))
        .stdout(predicate::str::contains("- Plans: 2 (2 active, 0 completed)"))
        .stdout(predicate::str::contains("- Tasks: 0/2 completed"))
        .stdout(predicate::str::contains("- Overdue: 1"));
}

#[test]
fn test_cli_notifications() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    create_plan(&db_path, "Bills");
    add_task(&db_path, "1", "Pay rent", &["--due", "2020-01-01"]);

    wp_cmd(&db_path)
        .args(["notify", "scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored 1 new notifications"))
        .stdout(predicate::str::contains("**Task overdue** [overdue, high]"))
        .stdout(predicate::str::contains("\"Pay rent\" was due 2020-01-01"));

    wp_cmd(&db_path)
        .args(["notify", "scan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored 0 new notifications"));

    wp_cmd(&db_path)
        .args(["notify", "list", "--unread"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pay rent"));

    wp_cmd(&db_path)
        .args(["notify", "read-all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Marked 1 notifications read"));

    wp_cmd(&db_path)
        .args(["notify", "list", "--unread"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notifications."));

    // Missing ids are not an error
    wp_cmd(&db_path)
        .args(["notify", "read", "999"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No notification with ID 999"));

    wp_cmd(&db_path)
        .args(["notify", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 notifications"));
}

#[test]
fn test_cli_notification_config() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");

    wp_cmd(&db_path)
        .args(["notify", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Reminder window**: 24h"));

    wp_cmd(&db_path)
        .args(["notify", "config", "--window", "48", "--alerts", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Reminder window**: 48h"))
        .stdout(predicate::str::contains("**Alerts enabled**: false"));

    // Persisted for the next invocation
    wp_cmd(&db_path)
        .args(["notify", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("**Reminder window**: 48h"));

    wp_cmd(&db_path)
        .args(["notify", "config", "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scan_interval_secs"));
}

#[test]
fn test_cli_import_plan() {
    let temp_dir = create_cli_test_environment();
    let db_path = temp_dir.path().join("cli_test.db");
    let plan_file = temp_dir.path().join("plan.json");
    std::fs::write(
        &plan_file,
        r#"{
            "title": "Run a 10k",
            "description": "Build up slowly",
            "milestones": [{"title": "Base"}, {"title": "Race week"}],
            "tasks": [
                {"title": "Buy shoes", "priority": "high", "milestone": 0},
                {"title": "Run 5k", "estimatedHours": 1.5, "milestone": 0},
                {"title": "Race", "milestone": 1, "dueDate": "2030-05-01"}
            ],
            "estimatedTimeframe": "8 weeks",
            "tips": ["Rest days matter"]
        }"#,
    )
    .unwrap();

    wp_cmd(&db_path)
        .args(["plan", "import", plan_file.to_str().unwrap(), "--goal", "Finish a 10k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported plan with ID: 1"))
        .stdout(predicate::str::contains("- Goal: Finish a 10k"))
        .stdout(predicate::str::contains("- Timeframe: 8 weeks"))
        .stdout(predicate::str::contains("Rest days matter"))
        .stdout(predicate::str::contains("### 2. Race week"))
        .stdout(predicate::str::contains("Buy shoes"));

    let bad_file = temp_dir.path().join("bad.json");
    std::fs::write(
        &bad_file,
        r#"{"title": "Broken", "tasks": [{"title": "Orphan", "milestone": 4}]}"#,
    )
    .unwrap();
    wp_cmd(&db_path)
        .args(["plan", "import", bad_file.to_str().unwrap(), "--goal", "Nothing"])
        .assert()
        .failure();

    // The failed import wrote nothing
    wp_cmd(&db_path)
        .args(["plan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Broken").not());
}
