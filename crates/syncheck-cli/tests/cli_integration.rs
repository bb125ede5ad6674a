//! End-to-end tests that run the built `syncheck` binary.

use std::path::Path;
use std::process::{Command, Output};

fn run_syncheck(dir: &Path, input: &str, args: &[&str]) -> Output {
    run_syncheck_with_env(dir, input, args, &[])
}

fn run_syncheck_with_env(
    dir: &Path,
    input: &str,
    args: &[&str],
    envs: &[(&str, &str)],
) -> Output {
    let path = dir.join("input.txt");
    std::fs::write(&path, input).unwrap();

    Command::new(env!("CARGO_BIN_EXE_syncheck"))
        .arg(&path)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("SYNCHECK_PARALLEL_THRESHOLD")
        .env_remove("SYNCHECK_OUTPUT_FORMAT")
        .envs(envs.iter().copied())
        .output()
        .expect("run syncheck")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

const TWO_PHASES: &str = "2
2
Happy glad
glad cheerful
3
happy cheerful
happy sad
sad sad
1
big large
2
large BIG
happy glad
";

#[test]
fn test_prints_one_verdict_per_query_in_order() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_syncheck(tmp.path(), TWO_PHASES, &[]);

    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        stdout_lines(&output),
        vec!["synonyms", "different", "synonyms", "synonyms", "different"]
    );
}

#[test]
fn test_parallel_evaluation_keeps_order() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_syncheck(tmp.path(), TWO_PHASES, &["--parallel-threshold", "1"]);

    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["synonyms", "different", "synonyms", "synonyms", "different"]
    );
}

#[test]
fn test_malformed_pair_keeps_completed_phases() {
    let tmp = tempfile::tempdir().unwrap();
    let input = "2\n1\na b\n1\nA b\n1\nonlyoneword\n1\na b\n";
    let output = run_syncheck(tmp.path(), input, &[]);

    assert!(!output.status.success());
    assert_eq!(stdout_lines(&output), vec!["synonyms"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("line 7"),
        "error should name the bad line (stderr={stderr})"
    );
}

#[test]
fn test_malformed_phase_count_fails_without_output() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_syncheck(tmp.path(), "two\n0\n0\n", &[]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("non-negative integer"));
}

#[test]
fn test_missing_input_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_syncheck"))
        .arg(tmp.path().join("absent.txt"))
        .current_dir(tmp.path())
        .output()
        .expect("run syncheck");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to read input"));
}

#[test]
fn test_jsonl_output_from_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config_dir = tmp.path().join(".syncheck");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[output]\nformat = \"jsonl\"\n").unwrap();

    let output = run_syncheck(tmp.path(), "1\n1\nfast quick\n1\nQuick FAST\n", &[]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1);
    let row: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(row["phase"], 1);
    assert_eq!(row["line"], 5);
    assert_eq!(row["word1"], "quick");
    assert_eq!(row["word2"], "fast");
    assert_eq!(row["verdict"], "synonyms");
}

#[test]
fn test_format_flag_overrides_config() {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("custom.toml");
    std::fs::write(&config_path, "[output]\nformat = \"jsonl\"\n").unwrap();

    let output = run_syncheck(
        tmp.path(),
        "1\n0\n1\nx y\n",
        &["--config", config_path.to_str().unwrap(), "--format", "text"],
    );
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output), vec!["different"]);
}

#[test]
fn test_summary_goes_to_stderr() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_syncheck(tmp.path(), TWO_PHASES, &["--summary"]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 5);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Phases: 2"));
    assert!(stderr.contains("Queries: 5"));
}

#[test]
fn test_env_output_format_overrides_config_file() {
    let tmp = tempfile::tempdir().unwrap();
    let config_dir = tmp.path().join(".syncheck");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[output]\nformat = \"text\"\n").unwrap();

    let output = run_syncheck_with_env(
        tmp.path(),
        "1\n1\nfast quick\n2\nfast quick\nfast slow\n",
        &[],
        &[("SYNCHECK_OUTPUT_FORMAT", "jsonl")],
    );
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = stdout_lines(&output)
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["verdict"], "synonyms");
    assert_eq!(rows[1]["verdict"], "different");
}

#[test]
fn test_env_parallel_threshold_keeps_order() {
    let tmp = tempfile::tempdir().unwrap();
    let config_dir = tmp.path().join(".syncheck");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[evaluation]\nparallel_threshold = 0\n",
    )
    .unwrap();

    let output = run_syncheck_with_env(
        tmp.path(),
        TWO_PHASES,
        &[],
        &[("SYNCHECK_PARALLEL_THRESHOLD", "1")],
    );
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec!["synonyms", "different", "synonyms", "synonyms", "different"]
    );
}

#[test]
fn test_carriage_return_line_endings() {
    let tmp = tempfile::tempdir().unwrap();
    let output = run_syncheck(tmp.path(), "1\r1\ra b\r1\rA b\r", &[]);

    assert!(
        output.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(stdout_lines(&output), vec!["synonyms"]);
}
