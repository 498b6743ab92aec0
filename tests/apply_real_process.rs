// tests/apply_real_process.rs
//
// Runs real child processes through `sh`, with the "target" being a script
// file inside a temporary working directory.

#![cfg(unix)]

use std::fs;
use std::path::Path;

use makefile_provisioner::Provisioner;
use makefile_provisioner::config::ProvisionerSettings;
use makefile_provisioner::errors::{ProcessFailure, ProvisionerError};
use makefile_provisioner_test_utils::builders::ResourceConfigBuilder;
use makefile_provisioner_test_utils::recording_sink::RecordingSink;
use makefile_provisioner_test_utils::{init_tracing, with_timeout};
use tempfile::TempDir;

fn sh_provisioner(capture_limit: usize) -> Provisioner {
    Provisioner::new(ProvisionerSettings {
        program: "sh".to_string(),
        capture_limit,
    })
    .unwrap()
}

fn write_script(dir: &Path, body: &str) {
    fs::write(dir.join("build.sh"), body).unwrap();
}

#[tokio::test]
async fn streams_lines_from_a_real_process() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    write_script(dir.path(), "printf 'line1\\nline2\\n'\n");

    let sink = RecordingSink::new();
    let config = ResourceConfigBuilder::valid(dir.path().to_str().unwrap(), "build.sh").build();

    with_timeout(sh_provisioner(8192).apply(&config, sink.clone()))
        .await
        .unwrap();

    assert_eq!(sink.lines(), vec!["Executing: sh build.sh", "line1", "line2"]);
}

#[tokio::test]
async fn variables_are_passed_as_key_value_arguments() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    write_script(dir.path(), "for a in \"$@\"; do echo \"arg:$a\"; done\n");

    let sink = RecordingSink::new();
    let config = ResourceConfigBuilder::valid(dir.path().to_str().unwrap(), "build.sh")
        .variables(&[("REGION", "eu-west-1"), ("APP", "web")])
        .build();

    with_timeout(sh_provisioner(8192).apply(&config, sink.clone()))
        .await
        .unwrap();

    assert_eq!(sink.tool_lines(), vec!["arg:APP=web", "arg:REGION=eu-west-1"]);
}

#[tokio::test]
async fn failing_process_reports_trailing_window() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    write_script(
        dir.path(),
        "i=0\nwhile [ $i -lt 2000 ]; do printf 'out %05d\\n' $i; i=$((i+1)); done\nexit 3\n",
    );

    let expected: Vec<u8> = (0..2000)
        .flat_map(|i| format!("out {i:05}\n").into_bytes())
        .collect();

    let sink = RecordingSink::new();
    let config = ResourceConfigBuilder::valid(dir.path().to_str().unwrap(), "build.sh").build();

    let err = with_timeout(sh_provisioner(8192).apply(&config, sink.clone()))
        .await
        .unwrap_err();

    match err {
        ProvisionerError::Process {
            command,
            failure: ProcessFailure::Exit(3),
            output,
        } => {
            assert_eq!(command, "sh build.sh");
            assert_eq!(output.len(), 8192);
            assert_eq!(output.as_slice(), &expected[expected.len() - 8192..]);
        }
        other => panic!("expected exit failure, got {other:?}"),
    }
    assert_eq!(sink.tool_lines().len(), 2000);
}

#[tokio::test]
async fn stderr_is_part_of_the_captured_output() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    write_script(dir.path(), "echo 'missing rule' 1>&2\nexit 2\n");

    let sink = RecordingSink::new();
    let config = ResourceConfigBuilder::valid(dir.path().to_str().unwrap(), "build.sh").build();

    let err = with_timeout(sh_provisioner(8192).apply(&config, sink.clone()))
        .await
        .unwrap_err();

    assert_eq!(err.captured_output(), Some(&b"missing rule\n"[..]));
    assert_eq!(sink.tool_lines(), vec!["missing rule"]);
}

#[tokio::test]
async fn missing_build_tool_is_a_process_error() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    let provisioner = Provisioner::new(ProvisionerSettings {
        program: "no-such-build-tool-5e1c".to_string(),
        capture_limit: 1024,
    })
    .unwrap();
    let sink = RecordingSink::new();
    let config = ResourceConfigBuilder::valid(dir.path().to_str().unwrap(), "all").build();

    let err = with_timeout(provisioner.apply(&config, sink.clone()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProvisionerError::Process {
            failure: ProcessFailure::Spawn(_),
            ..
        }
    ));
    assert_eq!(sink.lines(), vec!["Executing: no-such-build-tool-5e1c all"]);
}

#[tokio::test]
async fn cancelling_kills_a_long_running_process() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    write_script(dir.path(), "echo started\nsleep 30\necho finished\n");

    let provisioner = sh_provisioner(8192);
    let sink = RecordingSink::new();
    let config = ResourceConfigBuilder::valid(dir.path().to_str().unwrap(), "build.sh").build();

    let (cancel_tx, cancel_rx) = tokio::sync::oneshot::channel();
    let apply = provisioner.apply_with_cancel(&config, sink.clone(), cancel_rx);
    let canceller = async {
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        let _ = cancel_tx.send(());
    };

    let (result, ()) = with_timeout(async { tokio::join!(apply, canceller) }).await;

    assert!(matches!(
        result,
        Err(ProvisionerError::Process {
            failure: ProcessFailure::Cancelled,
            ..
        })
    ));
    assert!(!sink.tool_lines().contains(&"finished".to_string()));
}
