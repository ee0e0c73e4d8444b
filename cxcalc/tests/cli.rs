//! The `cxcalc` binary driven as a subprocess.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn cxcalc(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cxcalc"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run cxcalc");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().expect("failed to wait for cxcalc")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("non-utf8 output")
}

#[test]
fn expr_arguments_share_one_session() {
    let output = cxcalc(&["-e", "x = 3i", "-e", "x * x"], "");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "3i\n-9\n");
}

#[test]
fn stdin_lines_without_prompt() {
    let output = cxcalc(&[], "1 + 2i\n\n2 * (1 + i)   \nabs(3 + 4i)\n");
    assert!(output.status.success());
    assert_eq!(stdout(&output), "1 + 2i\n2 + 2i\n5\n");
}

#[test]
fn errors_are_reported_and_processing_continues() {
    let output = cxcalc(&[], "a = 2\ny\n1 +\n3 $\na * a\n");
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "2\n\
         [semantic error] unbound identifier \"y\"\n\
         [syntax error] unexpected end at offset 3\n\
         [lexical error] unexpected \"$\" at offset 2\n\
         4\n"
    );
}

#[test]
fn input_file() {
    let path = std::env::temp_dir().join(format!("cxcalc-cli-{}.txt", std::process::id()));
    std::fs::write(&path, "r = 1 / 0\nr\n").unwrap();
    let output = cxcalc(&["-i", path.to_str().unwrap()], "");
    std::fs::remove_file(&path).unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output), "NaN + NaNi\nNaN + NaNi\n");
}

#[test]
fn missing_input_file_fails() {
    let output = cxcalc(&["-i", "/nonexistent/cxcalc/input"], "");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("can't open"), "{stderr}");
}

#[test]
fn grammar_dump() {
    let output = cxcalc(&["--grammar"], "");
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("P,0,Start -> Line"));
    assert!(text.contains("P,2,Line -> Expr"));
    assert!(text.contains("C,0,"));
    assert!(text.contains("FIRST,Expr,{"));
    assert!(text.contains("FOLLOW,Line,{end}"));
}
