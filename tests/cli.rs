//! Integration tests for the bash-opts binary and its shell functions.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bash-opts"))
}

fn run(args: &[&str], table: Option<&str>) -> Output {
    let mut cmd = Command::new(bin());
    cmd.args(args).env_remove("BASH_OPTS_TABLE").env_remove("BASH_OPTS_LOG");
    if let Some(table) = table {
        cmd.env("BASH_OPTS_TABLE", table);
    }
    cmd.output().expect("failed to run bash-opts")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Compile definitions through `declare --json` and return the table JSON.
fn declare(definitions: &[&str]) -> String {
    let mut args = vec!["declare", "--json", "--"];
    args.extend_from_slice(definitions);
    let output = run(&args, None);
    assert!(output.status.success(), "declare failed: {}", stderr(&output));
    stdout(&output)
}

// ---- declare ----

#[test]
fn test_declare_prints_defaults_and_table() {
    let output = run(&["declare", "--", "--[d]ebug", "--file=", "--names[]="], None);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("debug=false\nfile=\"\"\nnames=()\n"));
    assert!(text.contains("export BASH_OPTS_TABLE='["));
}

#[test]
fn test_declare_json() {
    let json = declare(&["--[d]ebug", "--file=", "--names[]="]);
    let parsed: serde_json::Value = serde_json::from_str(&json)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{json}"));

    assert_eq!(parsed[0]["name"], "debug");
    assert_eq!(parsed[0]["short"], "d");
    assert_eq!(parsed[0]["kind"]["type"], "flag");
    assert_eq!(parsed[1]["kind"]["type"], "scalar");
    assert_eq!(parsed[2]["kind"]["type"], "array");
    assert_eq!(parsed[2]["kind"]["singular"], "name");
}

// ---- parse ----

#[test]
fn test_parse_reads_table_from_env() {
    let table = declare(&["--[d]ebug", "--name="]);
    let output = run(&["parse", "--", "foo", "-d", "--name", "x y", "bar"], Some(&table));

    assert!(output.status.success(), "parse failed: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "debug=true\nname=\"x y\"\nargs=(\"foo\" \"bar\")\n"
    );
}

#[test]
fn test_parse_table_flag_overrides_env() {
    let env_table = declare(&["--debug"]);
    let flag_table = declare(&["--verbose"]);
    let output = run(
        &["parse", "--table", flag_table.trim(), "--", "--verbose"],
        Some(&env_table),
    );

    assert!(output.status.success(), "parse failed: {}", stderr(&output));
    assert_eq!(stdout(&output), "verbose=true\nargs=()\n");
}

#[test]
fn test_parse_unknown_option_emits_error_exit() {
    let table = declare(&["--debug", "--name="]);
    let output = run(&["parse", "--", "--debug", "-d", "--name=x"], Some(&table));

    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("debug=true\n"));
    assert!(text.contains("name=\"\"\n"));
    assert!(text.ends_with("echo \"Unknown option: -d\" >&2\nexit 1\n"));
}

#[test]
fn test_parse_rejects_bad_table() {
    let output = run(&["parse", "--table", "{nope", "--"], None);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid option table"));
}

#[test]
fn test_parse_requires_table() {
    let output = run(&["parse", "--", "--debug"], None);
    assert!(!output.status.success());
}

#[test]
fn test_parse_file_output() {
    let table = declare(&["--debug"]);
    let output = run(&["parse", "--file", "--", "--debug"], Some(&table));
    assert!(output.status.success(), "parse failed: {}", stderr(&output));

    let path = PathBuf::from(stdout(&output).trim());
    assert!(path.exists());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "debug=true\nargs=()\n");

    std::fs::remove_file(path).unwrap();
}

// ---- opt ----

#[test]
fn test_opt_scalar() {
    let table = declare(&["--name="]);
    let output = run(&["opt", "--", "name", "foo"], Some(&table));
    assert_eq!(stdout(&output), "--name=\"foo\"\n");

    let output = run(&["opt", "--", "name"], Some(&table));
    assert_eq!(stdout(&output), "--name=\"\"\n");
}

#[test]
fn test_opt_array() {
    let table = declare(&["--names[]="]);
    let output = run(&["opt", "--", "names", "foo", "--bar"], Some(&table));
    assert_eq!(stdout(&output), "--name=\"foo\" --name=\"--bar\"\n");

    let output = run(&["opt", "--", "names"], Some(&table));
    assert_eq!(stdout(&output), "\n");
}

#[test]
fn test_opt_flag() {
    let table = declare(&["--debug"]);
    let output = run(&["opt", "--", "debug", "true"], Some(&table));
    assert_eq!(stdout(&output), "--debug\n");

    let output = run(&["opt", "--", "debug", "false"], Some(&table));
    assert_eq!(stdout(&output), "\n");
}

#[test]
fn test_opt_undeclared_name_fails() {
    let table = declare(&["--debug"]);
    let output = run(&["opt", "--", "verbose"], Some(&table));
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no option declared as 'verbose'"));
}

// ---- shell functions ----

/// Run `code` in bash after loading the shell functions, with `input` as "$@".
///
/// Returns `None` when bash is not available.
fn bash(code: &str, input: &[&str]) -> Option<Output> {
    let bin = bin();
    let dir = bin.parent().unwrap_or(Path::new("."));
    let path = match std::env::var("PATH") {
        Ok(p) => format!("{}:{}", dir.display(), p),
        Err(_) => dir.display().to_string(),
    };

    let script = format!("set -eu; eval \"$(bash-opts init)\"; {}", code);
    Command::new("bash")
        .arg("-c")
        .arg(script)
        .arg("bash")
        .args(input)
        .env("PATH", path)
        .env_remove("BASH_OPTS_TABLE")
        .env_remove("BASH_OPTS_LOG")
        .output()
        .ok()
}

fn bash_stdout(code: &str, input: &[&str]) -> Option<String> {
    let output = bash(code, input)?;
    assert!(output.status.success(), "bash failed: {}", stderr(&output));
    Some(stdout(&output).trim_end_matches('\n').to_string())
}

#[test]
fn test_shell_flags() {
    let code = r#"opts --[d]ebug --[v]erbose; opts_eval "$@"; echo $debug $verbose"#;
    if let Some(out) = bash_stdout(code, &["-d", "-v"]) {
        assert_eq!(out, "true true");
    }
    if let Some(out) = bash_stdout(code, &["--no-debug", "--no-verbose"]) {
        assert_eq!(out, "false false");
    }
}

#[test]
fn test_shell_unknown_option() {
    let code = r#"opts --debug --name=; opts_eval "$@"; echo reached"#;
    if let Some(output) = bash(code, &["-d"]) {
        assert!(!output.status.success());
        assert_eq!(stderr(&output), "Unknown option: -d\n");
        assert_eq!(stdout(&output), "");
    }
}

#[test]
fn test_shell_scalar_with_spaces() {
    let code = r#"opts --[f]ile=; opts_eval "$@"; echo "$file""#;
    if let Some(out) = bash_stdout(code, &["-f", "./file with spaces.sh"]) {
        assert_eq!(out, "./file with spaces.sh");
    }
}

#[test]
fn test_shell_array() {
    let code = r#"opts --names[]=; opts_eval "$@"; echo ${names[@]}"#;
    if let Some(out) = bash_stdout(code, &["--name", "foo", "--name=bar"]) {
        assert_eq!(out, "foo bar");
    }
}

#[test]
fn test_shell_args_and_separator() {
    let code = r#"opts --debug --name=; opts_eval "$@"; echo ${args[@]}"#;
    if let Some(out) = bash_stdout(code, &["foo", "--name", "name", "bar", "--debug", "baz"]) {
        assert_eq!(out, "foo bar baz");
    }
    if let Some(out) = bash_stdout(code, &["foo", "--", "bar", "--baz"]) {
        assert_eq!(out, "foo bar --baz");
    }
}

#[test]
fn test_shell_opt() {
    let cases = [
        ("opts --name=; opts_eval; name=foo; opt name", r#"--name="foo""#),
        ("opts --name=; opts_eval; name=; opt name", r#"--name="""#),
        (
            "opts --names[]=; opts_eval; names=(foo bar); opt names",
            r#"--name="foo" --name="bar""#,
        ),
        ("opts --names[]=; opts_eval; names=(); opt names", ""),
        ("opts --debug; opts_eval; debug=true; opt debug", "--debug"),
        ("opts --debug; opts_eval; debug=false; opt debug", ""),
    ];

    for (code, expected) in cases {
        if let Some(out) = bash_stdout(code, &[]) {
            assert_eq!(out, expected, "script: {code}");
        }
    }
}

#[test]
fn test_shell_opt_round_trip_with_quotes() {
    let code = r#"opts --msg=; opts_eval "$@"; eval "set -- $(opt msg)"; echo "$1""#;
    if let Some(out) = bash_stdout(code, &["--msg", "say \"hi\" to $USER"]) {
        assert_eq!(out, "--msg=say \"hi\" to $USER");
    }
}
