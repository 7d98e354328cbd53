mod common;

use std::process::Command;

use common::*;

fn summary(bundle: &Bundle) -> (bool, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_axona"))
        .arg(bundle.set_path())
        .output()
        .unwrap();
    (output.status.success(), String::from_utf8_lossy(&output.stdout).into_owned())
}

#[test]
fn summary_of_complete_recording() {
    let bundle = Bundle::complete("summary");
    let (success, stdout) = summary(&bundle);

    assert!(success);
    assert!(stdout.contains("channel group 1"));
    assert!(stdout.contains("eeg2"));
    assert!(stdout.contains("events"));
}

#[test]
fn broken_continuous_file_does_not_stop_summary() {
    let bundle = Bundle::complete("summary_bad_eeg");
    let mut bytes = data_file(&signal_header("EEG", 4, 1), &[0x00, 0x40, 0x80, 0x7F]);
    bytes.truncate(bytes.len() - 2);
    bundle.write("rec.eeg", &bytes);
    let (success, stdout) = summary(&bundle);

    assert!(success);
    let line = stdout.lines().find(|l| l.starts_with("analog signals")).unwrap();
    assert!(line.contains("rec.eeg"));
    // views after the continuous files are still reported
    assert!(stdout.contains("tracking"));
    assert!(stdout.contains("events"));
}
