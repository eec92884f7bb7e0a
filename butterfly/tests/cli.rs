use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_butterfly"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn test_cli_with_check() {
    let output = run_cli(&["-N", "200", "-M", "200"]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert!(lines[0].starts_with("FourierKernel"));
    assert!(lines.iter().any(|l| l == "Computing direct matvec..."));

    // One (result, exact) line per target
    assert_eq!(lines.iter().filter(|l| l.contains('\t')).count(), 200);

    let summary = &lines[lines.len() - 3..];
    assert!(summary[0].starts_with("Vector  relative error:"));
    assert!(summary[1].starts_with("Average relative error:"));
    assert!(summary[2].starts_with("Maximum relative error:"));

    let vector_error: f64 = summary[0]
        .trim_start_matches("Vector  relative error:")
        .trim()
        .parse()
        .unwrap();
    assert!(vector_error < 1e-6);
}

#[test]
fn test_cli_nocheck() {
    for flag in ["-nocheck", "--nocheck"] {
        let output = run_cli(&["-N", "200", "-M", "200", flag]);
        assert!(output.status.success());

        let lines = stdout_lines(&output);
        assert!(lines[0].starts_with("FourierKernel"));
        assert!(lines.iter().all(|l| !l.contains('\t')));
        assert!(lines.iter().all(|l| !l.contains("relative error")));
    }
}

#[test]
fn test_cli_invalid_configuration() {
    // Trees too shallow to split
    let output = run_cli(&["-N", "10", "-M", "10"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));

    // Too many interpolation coefficients per box
    let output = run_cli(&["-N", "200", "-M", "200", "--dim", "6", "-nocheck"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
}
