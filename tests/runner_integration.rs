//! Library-level runs against real directories

mod support;

use phaseprobe::fs::RealFileSystem;
use phaseprobe::progress::{ProgressEvent, ProgressHandler};
use phaseprobe::{HookMarkers, HookOperation, ProbeConfig, Project, Runner};
use std::path::Path;
use std::sync::{Arc, Mutex};
use support::{fixture_source, install_fixture, read_descriptor};
use tempfile::TempDir;
use yare::parameterized;

#[derive(Default)]
struct RecordingHandler {
    events: Mutex<Vec<String>>,
}

impl ProgressHandler for RecordingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        let label = match event {
            ProgressEvent::RunStarted { .. } => "run-started".to_string(),
            ProgressEvent::ProjectsDiscovered { count, .. } => format!("discovered {}", count),
            ProgressEvent::ProjectStarted { .. } => "project-started".to_string(),
            ProgressEvent::PhaseProcessed { phase, changed, .. } => {
                format!("phase {} {}", phase, changed)
            }
            ProgressEvent::ProjectCompleted { report, .. } => {
                format!("project-completed {}", report.name)
            }
            ProgressEvent::RunCompleted { changed_phases, .. } => {
                format!("run-completed {}", changed_phases)
            }
        };
        self.events.lock().unwrap().push(label);
    }
}

fn config_for(root: &Path) -> ProbeConfig {
    ProbeConfig {
        root: root.to_path_buf(),
        max_depth: 16,
        bundle_extension: "xcodeproj".to_string(),
        markers: HookMarkers::default(),
        log_level: "info".to_string(),
    }
}

fn runner_for(root: &Path) -> Runner {
    Runner::new(Arc::new(RealFileSystem::new()), config_for(root))
}

#[test]
fn test_run_hooks_every_discovered_project() {
    let temp = TempDir::new().unwrap();
    let first = install_fixture(temp.path(), "App/App.xcodeproj");
    let second = install_fixture(temp.path(), "Modules/Core/Core.xcodeproj");

    let summary = runner_for(temp.path()).run(HookOperation::Inject).unwrap();

    assert_eq!(summary.projects.len(), 2);
    assert_eq!(summary.projects[0].path, first);
    assert_eq!(summary.projects[1].path, second);
    assert_eq!(summary.changed_phases(), 4);

    for bundle in [&first, &second] {
        let project = Project::open(&RealFileSystem::new(), bundle).unwrap();
        for phase in project.shell_script_phases() {
            let script = project.shell_script(&phase.id).unwrap();
            assert_eq!(script.matches("[time] Starting phase").count(), 1);
            assert_eq!(script.matches("[time] Phase took").count(), 1);
        }
    }
}

#[test]
fn test_run_reports_progress_in_order() {
    let temp = TempDir::new().unwrap();
    install_fixture(temp.path(), "Sample.xcodeproj");
    let recorder = Arc::new(RecordingHandler::default());

    runner_for(temp.path())
        .with_progress(recorder.clone())
        .run(HookOperation::Inject)
        .unwrap();

    let events = recorder.events.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "run-started",
            "discovered 1",
            "project-started",
            "phase SwiftLint true",
            "phase ShellScript true",
            "project-completed Sample.xcodeproj",
            "run-completed 2",
        ]
    );
}

#[parameterized(
    inject = { HookOperation::Inject, HookOperation::Inject },
    strip = { HookOperation::Strip, HookOperation::Strip },
)]
fn test_repeated_operation_is_stable(first: HookOperation, second: HookOperation) {
    let temp = TempDir::new().unwrap();
    let bundle = install_fixture(temp.path(), "Sample.xcodeproj");
    let runner = runner_for(temp.path());

    runner.run(first).unwrap();
    let after_first = read_descriptor(&bundle);

    let summary = runner.run(second).unwrap();
    assert_eq!(summary.changed_phases(), 0);
    assert_eq!(read_descriptor(&bundle), after_first);
}

#[test]
fn test_strip_after_inject_leaves_only_the_added_newline() {
    let temp = TempDir::new().unwrap();
    let bundle = install_fixture(temp.path(), "Sample.xcodeproj");
    let runner = runner_for(temp.path());

    runner.run(HookOperation::Inject).unwrap();
    runner.run(HookOperation::Strip).unwrap();

    let restored = read_descriptor(&bundle);
    let original = fixture_source();
    let original_lines: Vec<&str> = original.lines().collect();
    let restored_lines: Vec<&str> = restored.lines().collect();

    assert_eq!(original_lines.len(), restored_lines.len());
    let differing: Vec<(&str, &str)> = original_lines
        .iter()
        .zip(&restored_lines)
        .filter(|(a, b)| a != b)
        .map(|(a, b)| (*a, *b))
        .collect();
    assert_eq!(differing.len(), 1);
    assert!(differing[0].1.ends_with(r#"\"${BUILT_PRODUCTS_DIR}\"\n";"#));
}

#[test]
fn test_strip_removes_hand_edited_marker_lines() {
    let temp = TempDir::new().unwrap();
    let bundle = install_fixture(temp.path(), "Sample.xcodeproj");
    let descriptor = bundle.join("project.pbxproj");

    // A header left behind without its footer
    let source = fixture_source().replace(
        r#"shellScript = "if which swiftlint"#,
        r#"shellScript = "start_time=$(date +%s)\necho \"[time] Starting phase SwiftLint\"\nif which swiftlint"#,
    );
    std::fs::write(&descriptor, &source).unwrap();

    let summary = runner_for(temp.path()).run(HookOperation::Strip).unwrap();

    assert_eq!(summary.changed_phases(), 1);
    assert_eq!(read_descriptor(&bundle), fixture_source());
}

#[test]
fn test_failed_project_stops_the_run() {
    let temp = TempDir::new().unwrap();
    let broken = temp.path().join("A.xcodeproj");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("project.pbxproj"), "{ rootObject = X; }").unwrap();
    let untouched = install_fixture(temp.path(), "B.xcodeproj");

    let err = runner_for(temp.path()).run(HookOperation::Inject).unwrap_err();

    assert!(format!("{:#}", err).contains("A.xcodeproj"));
    assert_eq!(read_descriptor(&untouched), fixture_source());
}
