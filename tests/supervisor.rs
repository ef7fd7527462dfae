#![cfg(unix)]

mod common;

use std::fs;
use std::os::unix::fs::symlink;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::thread;
use std::time::Duration;

use common::{FakeEngine, Workspace, august_2025, frontline_owners};
use sysinfo::{ProcessesToUpdate, System};
use vessel_export::engine::ProcessSupervisor;
use vessel_export::export::{ExportContext, ExportOptions, VesselExporter};
use vessel_export::model::{Outcome, VesselName};

const SIGKILL: i32 = 9;

/// Starts a long `sleep` under a unique process name so that only this test's
/// child can match it.
fn spawn_stray(dir: &Path, name: &str) -> Child {
    let sleep = ["/bin/sleep", "/usr/bin/sleep"]
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
        .expect("sleep binary available");
    let alias = dir.join(name);
    symlink(&sleep, &alias).expect("sleep alias created");
    let child = Command::new(&alias).arg("30").spawn().expect("stray spawned");
    thread::sleep(Duration::from_millis(300));
    child
}

fn own_process_name() -> String {
    let pid = sysinfo::get_current_pid().expect("own pid");
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system
        .process(pid)
        .expect("own process listed")
        .name()
        .to_string_lossy()
        .into_owned()
}

#[test]
fn matching_processes_are_killed() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let mut child = spawn_stray(dir.path(), "vx_stray_one");
    let supervisor = ProcessSupervisor::new(vec!["VX_STRAY_ONE".into()]);

    let killed = supervisor.terminate_strays();

    let status = child.wait().expect("child reaped");
    assert_eq!(killed, 1);
    assert_eq!(status.signal(), Some(SIGKILL));
}

#[test]
fn unrelated_names_leave_processes_alone() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let mut child = spawn_stray(dir.path(), "vx_stray_two");
    let supervisor = ProcessSupervisor::new(vec!["vx_no_such_proc".into()]);

    assert_eq!(supervisor.terminate_strays(), 0);

    assert!(child.try_wait().expect("child status").is_none());
    child.kill().expect("child stopped");
    child.wait().expect("child reaped");
}

#[test]
fn current_process_is_never_matched() {
    let name = own_process_name();
    let supervisor = ProcessSupervisor::new(vec![name.clone()]);
    assert_eq!(supervisor.process_names(), [name]);

    let killed = supervisor.terminate_strays();

    assert_eq!(killed, 0);
}

#[test]
fn strays_are_reaped_before_the_engine_starts() {
    let workspace = Workspace::new();
    fs::write(workspace.input.join("FRONT CHEETAH.xlsx"), b"engine reads it").expect("source");
    let mut child = spawn_stray(workspace.dir.path(), "vx_stray_three");
    let owners = frontline_owners();
    let calendar = august_2025();
    let engine = FakeEngine::with_sheets(&["EUA"]);
    let log = engine.log.clone();
    let context = ExportContext {
        owners: &owners,
        layout: &workspace.layout,
        calendar: &calendar,
        input_dir: &workspace.input,
        options: ExportOptions::default(),
    };
    let supervisor = ProcessSupervisor::new(vec!["vx_stray_three".into()]);
    let mut exporter = VesselExporter::new(context, engine, supervisor);

    let result = exporter.export_vessel(
        &VesselName::new("FRONT CHEETAH").expect("vessel name"),
        &["EUA".to_string()],
    );

    assert_eq!(result.status, Outcome::Produced);
    let status = child.wait().expect("child reaped");
    assert_eq!(status.signal(), Some(SIGKILL));
    assert_eq!(log.borrow().starts, 1);
}
