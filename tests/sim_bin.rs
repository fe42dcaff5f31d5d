use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Run `sim` with two seeds, killing it if it does not finish in time.
fn run_sim(seed1: u64, seed2: u64, limit: Duration) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_sim"))
        .args([seed1.to_string(), seed2.to_string()])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to run sim binary");
    let start = Instant::now();
    while child.try_wait().expect("wait failed").is_none() {
        if start.elapsed() > limit {
            let _ = child.kill();
            panic!("sim {} {} did not finish within {:?}", seed1, seed2, limit);
        }
        thread::sleep(Duration::from_millis(20));
    }
    child.wait_with_output().expect("failed to collect output")
}

#[test]
fn sim_binary_smoke() {
    let output = run_sim(1, 2, Duration::from_secs(10));
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("invalid json");
    for seat in ["player1", "player2"] {
        assert!(v[seat]["status"].is_string());
        assert!(v[seat]["guesses"].is_u64());
    }
    assert!(v["winner"].is_string() || v["winner"].is_null());
}

#[test]
fn sim_finishes_for_many_seeds() {
    for seed in 1..=40u64 {
        let output = run_sim(seed, seed * 7, Duration::from_secs(10));
        assert!(output.status.success(), "sim {} {} failed", seed, seed * 7);
        let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
        let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("invalid json");
        assert!(v["player1"]["guesses"].is_u64(), "seed {}: {}", seed, stdout);
    }
}
