use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn bench() -> Command {
    let mut cmd = Command::cargo_bin("intrinsics-bench").expect("binary built");
    cmd.env_remove("RUST_LOG").env_remove("INTRINSICS_SIMD");
    cmd
}

#[test]
fn seeded_run_prints_ten_report_lines() {
    let output = bench().args(["--seed", "42"]).output().expect("run ok");
    assert!(output.status.success(), "seeded session should succeed");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 report");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 10, "report:\n{stdout}");

    for (pair, label) in lines
        .chunks(2)
        .zip(["Min", "Max", "Sum", "Count", "Match"])
    {
        assert!(pair[0].starts_with(label), "{}", pair[0]);
        assert!(pair[0].contains("(Scalar),"), "{}", pair[0]);
        assert!(pair[1].starts_with(label), "{}", pair[1]);
        assert!(pair[1].contains("(Accelerated"), "{}", pair[1]);
        assert!(pair[1].contains("Duration = "), "{}", pair[1]);
    }
    assert!(lines[8].contains("True") && lines[9].contains("True"));
}

#[test]
fn portable_cap_still_agrees() {
    bench()
        .args(["--seed", "7"])
        .env("INTRINSICS_SIMD", "portable")
        .assert()
        .success()
        .stdout(predicate::str::contains("(Accelerated auto/portable),"))
        .stdout(predicate::str::contains("False").not());
}

#[test]
fn avx2_cap_keeps_dispatcher_below_avx512() {
    bench()
        .args(["--seed", "9"])
        .env("INTRINSICS_SIMD", "avx2")
        .assert()
        .success()
        .stdout(predicate::str::contains("auto/avx512").not());
}

#[test]
fn json_logs_stay_off_stdout() {
    bench()
        .args(["--seed", "11", "--json-logs", "--log-level", "debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"level\"").not())
        .stderr(predicate::str::contains("\"level\""));
}

#[test]
fn rejects_unknown_flag() {
    bench().arg("--region-size").assert().failure();
}
