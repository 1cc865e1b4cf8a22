use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "core.safecrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

fn commit_file(dir: &Path, name: &str, content: &str) {
    write_and_add(dir, name, content);
    git(dir, &["commit", "-m", &format!("add {name}")]);
}

fn commit_file_at(dir: &Path, name: &str, content: &str, date: &str) {
    write_and_add(dir, name, content);
    assert!(Command::new("git")
        .args(["commit", "-m", &format!("add {name}")])
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn write_and_add(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    git(dir, &["add", "."]);
}

fn gindent(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gindent").unwrap();
    cmd.current_dir(dir).arg("--repo").arg(dir);
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

fn file_names(v: &serde_json::Value) -> Vec<String> {
    v["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn files_json_lists_history() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "src/app.py", "def main():\n    return 1\n");
    commit_file(dir.path(), "src/app.py", "def main():\n    if True:\n        return 1\n");

    let v = json_output(gindent(dir.path()).args(["files", "--json"]));
    assert_eq!(v["version"], 1);
    let files = v["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "src/app.py");
    assert_eq!(files[0]["commits"], 2);
    assert_eq!(files[0]["complexity"].as_array().unwrap().len(), 2);
    assert_eq!(files[0]["complexity"][0]["stats"]["max_depth"], 9);
}

#[test]
fn commits_json_outputs_stats_newest_first() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.py", "x = 1\n");
    commit_file(dir.path(), "b.py", "def f():\n    pass\n");

    let v = json_output(gindent(dir.path()).args(["commits", "--json"]));
    let commits = v["commits"].as_array().unwrap();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0]["stats"]["count"], 3);
    assert_eq!(commits[1]["stats"]["count"], 1);
    assert!(commits[0]["date"].as_str().unwrap().len() == 19);
}

#[test]
fn since_filters_commits_by_committer_date() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file_at(dir.path(), "a.py", "x = 1\n", "2024-01-01T12:00:00+00:00");
    commit_file_at(dir.path(), "b.py", "y = 2\n", "2024-01-03T12:00:00+00:00");

    let all = json_output(gindent(dir.path()).args(["commits", "--json"]));
    assert_eq!(all["commits"].as_array().unwrap().len(), 2);

    let recent = json_output(gindent(dir.path()).args(["--since", "2024-01-02", "commits", "--json"]));
    let commits = recent["commits"].as_array().unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0]["date"], "2024-01-03 12:00:00");
    assert_eq!(recent["since"], "2024-01-02");

    let settings = dir.path().join("settings.toml");
    fs::write(
        &settings,
        "path = \".\"\nignored_files = []\nreport = \"out.xlsx\"\nuntil = \"2024-01-02\"\n",
    )
    .unwrap();
    let early = json_output(gindent(dir.path()).arg("--config").arg(&settings).args(["commits", "--json"]));
    let commits = early["commits"].as_array().unwrap();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0]["date"], "2024-01-01 12:00:00");
}

#[test]
fn no_merges_skips_merge_commits() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "base.py", "a = 1\n");
    git(dir.path(), &["checkout", "-b", "feat"]);
    commit_file(dir.path(), "feat.py", "f = 1\n");
    git(dir.path(), &["checkout", "-"]);
    commit_file(dir.path(), "base.py", "a = 1\nc = 2\n");
    git(dir.path(), &["merge", "--no-ff", "feat", "-m", "merge feat"]);

    let with_merges = json_output(gindent(dir.path()).args(["commits", "--json"]));
    assert_eq!(with_merges["commits"].as_array().unwrap().len(), 4);

    let without = json_output(gindent(dir.path()).args(["--no-merges", "commits", "--json"]));
    assert_eq!(without["commits"].as_array().unwrap().len(), 3);
}

#[test]
fn ignore_flag_excludes_paths() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "keep.py", "x = 1\n");
    commit_file(dir.path(), "vendor/lib.py", "y = 2\n");

    let v = json_output(gindent(dir.path()).args(["--ignore", "^vendor/", "files", "--json"]));
    assert_eq!(file_names(&v), vec!["keep.py".to_string()]);
}

#[test]
fn rename_is_followed_through_history() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(
        dir.path(),
        "old.py",
        "def compute(values):\n    total = 0\n    for v in values:\n        total += v\n    return total\n",
    );
    git(dir.path(), &["mv", "old.py", "new.py"]);
    git(dir.path(), &["commit", "-m", "rename"]);

    let v = json_output(gindent(dir.path()).args(["files", "--json"]));
    assert_eq!(file_names(&v), vec!["new.py".to_string()]);
    assert_eq!(v["files"][0]["commits"], 2);
}

#[test]
fn report_writes_workbook() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "main.py", "def main():\n    print('hi')\n");

    let out_dir = tempdir().unwrap();
    let report = out_dir.path().join("complexity.xlsx");
    gindent(dir.path())
        .arg("--quiet")
        .arg("--report")
        .arg(&report)
        .arg("report")
        .assert()
        .success();
    let bytes = fs::read(&report).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn settings_file_is_picked_up() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_file(dir.path(), "a.py", "x = 1\n");
    commit_file(dir.path(), "docs/readme.md", "hello\n");

    let settings = dir.path().join("settings.toml");
    fs::write(
        &settings,
        "path = \".\"\nignored_files = [\"\\\\.md$\"]\nreport = \"out.xlsx\"\n",
    )
    .unwrap();

    let v = json_output(gindent(dir.path()).arg("--config").arg(&settings).args(["files", "--json"]));
    assert_eq!(file_names(&v), vec!["a.py".to_string()]);
}

#[test]
fn missing_settings_file_fails() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("gindent")
        .unwrap()
        .current_dir(dir.path())
        .args(["--config", "nope.toml", "files", "--json"])
        .assert()
        .failure();
}

#[test]
fn init_writes_settings_once() {
    let dir = tempdir().unwrap();
    let run = |force: bool| {
        let mut cmd = Command::cargo_bin("gindent").unwrap();
        cmd.current_dir(dir.path()).arg("init");
        if force {
            cmd.arg("--force");
        }
        cmd.assert()
    };

    run(false).success();
    let written = fs::read_to_string(dir.path().join("gindent.toml")).unwrap();
    assert!(written.contains("ignored_files"));
    run(false).failure();
    run(true).success();
}
