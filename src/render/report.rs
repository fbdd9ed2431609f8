//! Text report rendering.

use crate::analysis::{AnalysisResult, StateFlow};

const BRANCH: &str = "  ├── ";
const NESTED_BRANCH: &str = "  │   ├── ";

/// Render the hierarchical text report.
///
/// Sections appear per state in the fixed order present, absent. Variables
/// and dependencies come out of their ordered sets already sorted; tasks keep
/// their declaration order.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut report = Vec::new();

    report.push(format!("=== {} Role State Analysis Report ===\n", result.role_name));

    for flow in result.flows() {
        render_flow(&mut report, flow);
    }

    report.join("\n")
}

fn render_flow(report: &mut Vec<String>, flow: &StateFlow) {
    let header = format!("State: {}", flow.state);
    report.push(format!("\n{header}"));
    report.push("=".repeat(header.chars().count()));

    report.push("\nVariables:".to_string());
    for var in &flow.variables {
        report.push(format!("{BRANCH}{var}"));
    }

    report.push("\nTasks:".to_string());
    for task in &flow.tasks {
        report.push(format!("{BRANCH}{} ({})", task.name, task.source_file));
        if !task.guard_expressions.is_empty() {
            report.push(format!("{NESTED_BRANCH}Conditions: {}", task.guard_expressions.join(", ")));
        }
    }

    report.push("\nDependencies:".to_string());
    for dep in &flow.dependencies {
        report.push(format!("{BRANCH}{dep}"));
    }

    report.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{LifecycleState, TaskRecord};
    use pretty_assertions::assert_eq;

    fn sample() -> AnalysisResult {
        let mut result = AnalysisResult::new("influxdb");
        result.present.variables.extend(["influxdb_state".to_string(), "influxdb_port".to_string()]);
        result.present.tasks.push(
            TaskRecord::new("install pkg", "main.yml")
                .with_guards(vec!["influxdb_state == present".to_string()]),
        );
        result.present.tasks.push(TaskRecord::new("unguarded copy", "extra.yml"));
        result.absent.dependencies.extend(["setup.yml".to_string(), "cleanup.yml".to_string()]);
        result
    }

    #[test]
    fn test_full_report_layout() {
        let expected = [
            "=== influxdb Role State Analysis Report ===",
            "",
            "",
            "State: present",
            "==============",
            "",
            "Variables:",
            "  ├── influxdb_port",
            "  ├── influxdb_state",
            "",
            "Tasks:",
            "  ├── install pkg (main.yml)",
            "  │   ├── Conditions: influxdb_state == present",
            "  ├── unguarded copy (extra.yml)",
            "",
            "Dependencies:",
            "",
            "",
            "State: absent",
            "=============",
            "",
            "Variables:",
            "",
            "Tasks:",
            "",
            "Dependencies:",
            "  ├── cleanup.yml",
            "  ├── setup.yml",
            "",
        ]
        .join("\n");

        assert_eq!(render_text(&sample()), expected);
    }

    #[test]
    fn test_conditions_joined_with_commas() {
        let mut result = AnalysisResult::new("influxdb");
        result.absent.tasks.push(TaskRecord::new("remove", "main.yml").with_guards(vec![
            "influxdb_state == absent".to_string(),
            "ansible_os_family == 'Debian'".to_string(),
        ]));

        let report = render_text(&result);
        assert!(report.contains(
            "  │   ├── Conditions: influxdb_state == absent, ansible_os_family == 'Debian'"
        ));
    }

    #[test]
    fn test_sections_sorted_regardless_of_insertion() {
        let mut result = AnalysisResult::new("r");
        for var in ["zeta", "alpha", "mid"] {
            result.present.variables.insert(var.to_string());
        }
        for dep in ["z.yml", "a.yml"] {
            result.present.dependencies.insert(dep.to_string());
        }

        let report = render_text(&result);
        let alpha = report.find("├── alpha").unwrap();
        let mid = report.find("├── mid").unwrap();
        let zeta = report.find("├── zeta").unwrap();
        assert!(alpha < mid && mid < zeta);
        assert!(report.find("├── a.yml").unwrap() < report.find("├── z.yml").unwrap());
    }

    #[test]
    fn test_states_in_fixed_order() {
        let report = render_text(&AnalysisResult::new("r"));
        let present = report.find(&format!("State: {}", LifecycleState::Present)).unwrap();
        let absent = report.find(&format!("State: {}", LifecycleState::Absent)).unwrap();
        assert!(present < absent);
        assert!(!report.contains("unknown"));
    }
}
