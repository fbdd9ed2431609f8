//! Integration tests for role analysis.
//!
//! Builds role directories on disk and checks the aggregated flows and the
//! rendered report.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use roleflow::analysis::UNNAMED_TASK;
use roleflow::render::DOT_SOURCE_FORMAT;
use roleflow::{render_text, App, Config, LifecycleState};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn app_for(role: &Path, out: &Path) -> App {
    let mut config = Config::default();
    config.output.directory = out.to_path_buf();
    config.output.graph_format = DOT_SOURCE_FORMAT.to_string();
    App::new(role, config)
}

/// A role shaped like a typical install/remove role.
fn influxdb_role() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(
        root,
        "tasks/main.yml",
        r#"
- name: Include install tasks
  include_tasks: install.yml
  when: influxdb_state == present
  tags: [install]

- name: Include removal tasks
  include_tasks: setup.yml
  when: influxdb_state == absent
  tags: [remove]

- name: Gather facts
  setup:
  tags: always
"#,
    );

    write(
        root,
        "tasks/install.yml",
        r#"
- name: Install influxdb
  package:
    name: influxdb
    state: present
  when: influxdb_state == present

- name: Write config
  template:
    src: influxdb.conf.j2
    dest: "{{ influxdb_config_dir }}/influxdb.conf"
  when:
    - influxdb_state == present
    - influxdb_manage_config | bool
  notify: restart influxdb
"#,
    );

    write(
        root,
        "tasks/setup.yml",
        r#"
- name: Remove influxdb
  package:
    name: influxdb
    state: absent
  when: influxdb_state == absent

- when: influxdb_state == absent
  file:
    path: "{{ influxdb_data_dir }}"
    state: absent
"#,
    );

    write(
        root,
        "defaults/main.yml",
        "influxdb_state: present\ninfluxdb_config_dir: /etc/influxdb\ninfluxdb_data_dir: /var/lib/influxdb\n",
    );

    write(root, "handlers/main.yml", "- name: restart influxdb\n  service: {name: influxdb, state: restarted}\n");

    temp
}

#[test]
fn test_role_flows() {
    let role = influxdb_role();
    let out = TempDir::new().unwrap();

    let analysis = app_for(role.path(), out.path()).analyze().unwrap();

    assert_eq!(
        analysis.present.task_names(),
        vec!["Include install tasks", "Install influxdb", "Write config"]
    );
    assert_eq!(analysis.absent.task_names(), vec!["Include removal tasks", "Remove influxdb", UNNAMED_TASK]);

    let present_deps: Vec<_> = analysis.present.dependencies.iter().map(String::as_str).collect();
    assert_eq!(present_deps, vec!["install.yml"]);
    let absent_deps: Vec<_> = analysis.absent.dependencies.iter().map(String::as_str).collect();
    assert_eq!(absent_deps, vec!["setup.yml"]);

    let present_vars: Vec<_> = analysis.present.variables.iter().map(String::as_str).collect();
    assert_eq!(present_vars, vec!["influxdb_config_dir", "influxdb_manage_config", "influxdb_state"]);
    let absent_vars: Vec<_> = analysis.absent.variables.iter().map(String::as_str).collect();
    assert_eq!(absent_vars, vec!["influxdb_data_dir", "influxdb_state"]);

    let tags: Vec<_> = analysis.tags.iter().map(String::as_str).collect();
    assert_eq!(tags, vec!["always", "install", "remove"]);
    assert!(analysis.handlers.contains("restart influxdb"));
}

#[test]
fn test_round_trip_single_task() {
    let role = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(
        role.path(),
        "tasks/main.yml",
        "- name: install pkg\n  when: influxdb_state == present\n  tags: [setup]\n",
    );

    let analysis = app_for(role.path(), out.path()).analyze().unwrap();
    let report = render_text(&analysis);

    assert!(analysis.present.variables.contains("influxdb_state"));
    assert!(report.contains("Variables:\n  ├── influxdb_state\n"));
    assert!(report.contains("  ├── install pkg (main.yml)\n  │   ├── Conditions: influxdb_state == present"));
    assert!(analysis.tags.contains("setup"));
}

#[test]
fn test_absent_include_dependency() {
    let role = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(
        role.path(),
        "tasks/main.yml",
        "- name: cleanup\n  include_tasks: setup.yml\n  when: influxdb_state == absent\n",
    );

    let analysis = app_for(role.path(), out.path()).analyze().unwrap();
    assert_eq!(analysis.absent.dependencies.len(), 1);
    assert!(analysis.absent.dependencies.contains("setup.yml"));
    assert!(analysis.flow(LifecycleState::Present).unwrap().dependencies.is_empty());
}

#[test]
fn test_broken_sibling_keeps_primary_tasks() {
    let role = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(role.path(), "tasks/main.yml", "- name: keep me\n  when: influxdb_state == present\n");
    write(role.path(), "tasks/broken.yml", "- name: [never closed\n");

    let outcome = app_for(role.path(), out.path()).run().unwrap();
    assert!(outcome.report.contains("keep me (main.yml)"));
}

#[test]
fn test_broken_primary_aborts_run() {
    let role = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(role.path(), "tasks/main.yml", "- name: [never closed\n");
    write(role.path(), "tasks/other.yml", "- name: fine\n  when: influxdb_state == present\n");

    let app = app_for(role.path(), out.path());
    assert!(app.analyze().unwrap_err().is_parse_error());
    assert!(app.run().is_err());
}

#[test]
fn test_empty_role_renders_empty_sections() {
    let role = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();

    let outcome = app_for(role.path(), out.path()).run().unwrap();
    assert_eq!(outcome.analysis.task_count(), 0);
    assert!(outcome.report.contains("State: present"));
    assert!(outcome.report.contains("State: absent"));

    let dot = fs::read_to_string(outcome.graph_path).unwrap();
    assert!(dot.contains("\"cluster_present\""));
    assert!(dot.contains("\"cluster_absent\""));
}

#[test]
fn test_graph_chains_tasks_per_state() {
    let role = influxdb_role();
    let out = TempDir::new().unwrap();

    let outcome = app_for(role.path(), out.path()).run().unwrap();
    let dot = fs::read_to_string(&outcome.graph_path).unwrap();

    assert!(dot.contains("\"present_Include install tasks\" -> \"present_Install influxdb\""));
    assert!(dot.contains("\"present_Install influxdb\" -> \"present_Write config\""));
    assert!(dot.contains("\"absent_Remove influxdb\" -> \"absent_unnamed task\""));
    assert!(!dot.contains("\"present_Write config\" -> \"absent_"));
}
