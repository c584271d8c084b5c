//! Workspace isolation and checkpoint cursor against a real directory tree.

use std::fs;
use std::path::Path;

use cf_case::{CaseError, CaseWorkspace, TimeWindow, set_time_window};
use cf_core::EpisodeId;
use tempfile::TempDir;

fn write_template(dir: &Path) {
    fs::create_dir_all(dir.join("system")).unwrap();
    fs::create_dir_all(dir.join("constant")).unwrap();
    fs::create_dir_all(dir.join("0")).unwrap();
    fs::write(
        dir.join("system/controlDict"),
        "startFrom latestTime;\nstartTime 0;\nstopAt endTime;\nendTime 1000;\n",
    )
    .unwrap();
    fs::write(dir.join("system/fvSolution"), "fields { p 0.3; }\nequations { U 0.7; }\n").unwrap();
    fs::write(dir.join("0/p"), "internalField uniform 0;\n").unwrap();
}

#[test]
fn create_copies_template_and_destroy_removes_it() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("template");
    write_template(&template);

    let ws = CaseWorkspace::for_episode(&template, tmp.path(), &EpisodeId::generate());
    ws.create().unwrap();

    assert!(ws.control_dict().is_file());
    assert!(ws.fv_solution().is_file());
    assert!(ws.root().join("0/p").is_file());
    assert!(ws.root().join("constant").is_dir());

    ws.destroy().unwrap();
    assert!(!ws.exists());
    // idempotent
    ws.destroy().unwrap();
    assert!(template.join("system/controlDict").is_file());
}

#[test]
fn create_discards_previous_workspace_contents() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("template");
    write_template(&template);

    let ws = CaseWorkspace::new(&template, tmp.path().join("ws"));
    ws.create().unwrap();
    fs::create_dir(ws.root().join("5")).unwrap();
    fs::write(ws.log_path("simpleFoam"), "stale").unwrap();

    ws.create().unwrap();
    assert!(!ws.root().join("5").exists());
    assert!(!ws.log_path("simpleFoam").exists());
    assert_eq!(ws.checkpoint_cursor().unwrap(), 0);
}

#[test]
fn missing_template_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let ws = CaseWorkspace::new(tmp.path().join("nope"), tmp.path().join("ws"));
    let err = ws.create().unwrap_err();
    assert!(matches!(err, CaseError::TemplateMissing { .. }));
    assert!(!ws.exists());
}

#[test]
fn edits_in_workspace_do_not_touch_template() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("template");
    write_template(&template);
    let before = fs::read_to_string(template.join("system/controlDict")).unwrap();

    let ws = CaseWorkspace::new(&template, tmp.path().join("ws"));
    ws.create().unwrap();
    set_time_window(&ws.control_dict(), TimeWindow::single_step(3)).unwrap();

    let after = fs::read_to_string(template.join("system/controlDict")).unwrap();
    assert_eq!(before, after);
    let edited = fs::read_to_string(ws.control_dict()).unwrap();
    assert!(edited.contains("endTime\t4;"));
}

#[test]
fn checkpoint_cursor_tracks_largest_numbered_directory() {
    let tmp = TempDir::new().unwrap();
    let template = tmp.path().join("template");
    write_template(&template);

    let ws = CaseWorkspace::new(&template, tmp.path().join("ws"));
    ws.create().unwrap();
    assert_eq!(ws.checkpoint_cursor().unwrap(), 0);

    for name in ["1", "2", "10", "9"] {
        fs::create_dir(ws.root().join(name)).unwrap();
    }
    // numbered files and non-integer directories are ignored
    fs::write(ws.root().join("42"), "").unwrap();
    fs::create_dir(ws.root().join("11.5")).unwrap();
    fs::create_dir(ws.root().join("processor0")).unwrap();

    assert_eq!(ws.checkpoint_cursor().unwrap(), 10);
}

#[test]
fn checkpoint_cursor_fails_without_workspace() {
    let tmp = TempDir::new().unwrap();
    let ws = CaseWorkspace::new(tmp.path().join("template"), tmp.path().join("ws"));
    assert!(matches!(ws.checkpoint_cursor(), Err(CaseError::Io { .. })));
}
