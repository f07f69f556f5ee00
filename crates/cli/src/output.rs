// Result types and table rendering

use colored::Colorize;
use serde::Deserialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Deserialize, Tabled)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub deadline: Option<String>,
    pub created_at: String,
    pub closed_at: Option<String>,
}

#[derive(Tabled)]
struct TaskRow {
    id: i64,
    project: i64,
    title: String,
    status: String,
    deadline: String,
    closed_at: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            project: task.project_id,
            title: task.title.clone(),
            status: task.status.clone(),
            deadline: task.deadline.clone().unwrap_or_else(|| "-".to_string()),
            closed_at: task.closed_at.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Deleted {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct AutocloseSummary {
    pub closed: usize,
    pub failed: Vec<i64>,
}

pub fn success(message: &str) {
    println!("{}", format!("✓ {}", message).green().bold());
}

pub fn projects_table(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects yet".yellow().to_string();
    }
    Table::new(projects).with(Style::rounded()).to_string()
}

pub fn tasks_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks".yellow().to_string();
    }
    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Multi-line view of a single task
pub fn task_details(task: &Task) -> String {
    let status = match task.status.as_str() {
        "done" => task.status.green(),
        "doing" => task.status.cyan(),
        _ => task.status.normal(),
    };

    [
        format!("{} #{} {}", "Task".bold(), task.id, task.title),
        format!("  {} {}", "Project:".bold(), task.project_id),
        format!("  {} {}", "Status:".bold(), status),
        format!("  {} {}", "Description:".bold(), task.description),
        format!(
            "  {} {}",
            "Deadline:".bold(),
            task.deadline.as_deref().unwrap_or("-")
        ),
        format!("  {} {}", "Created:".bold(), task.created_at),
        format!(
            "  {} {}",
            "Closed:".bold(),
            task.closed_at.as_deref().unwrap_or("-")
        ),
    ]
    .join("\n")
}

pub fn autoclose_summary(summary: &AutocloseSummary) -> String {
    let mut out = format!("{} overdue task(s) closed", summary.closed);
    if !summary.failed.is_empty() {
        let ids: Vec<String> = summary.failed.iter().map(i64::to_string).collect();
        out.push_str(&format!(", failed: {}", ids.join(", ")).red().to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(deadline: Option<&str>) -> Task {
        Task {
            id: 4,
            project_id: 1,
            title: "Ship".into(),
            description: "Release build".into(),
            status: "todo".into(),
            deadline: deadline.map(String::from),
            created_at: "2025-01-01T00:00:00Z".into(),
            closed_at: None,
        }
    }

    #[test]
    fn test_tasks_table_shows_placeholders() {
        colored::control::set_override(false);
        let table = tasks_table(&[task(None), task(Some("2025-12-09"))]);
        assert!(table.contains("Ship"));
        assert!(table.contains("2025-12-09"));
        assert!(table.contains(" - "));
    }

    #[test]
    fn test_empty_lists() {
        colored::control::set_override(false);
        assert_eq!(projects_table(&[]), "No projects yet");
        assert_eq!(tasks_table(&[]), "No tasks");
    }

    #[test]
    fn test_autoclose_summary_lists_failures() {
        colored::control::set_override(false);
        let text = autoclose_summary(&AutocloseSummary {
            closed: 2,
            failed: vec![7, 9],
        });
        assert_eq!(text, "2 overdue task(s) closed, failed: 7, 9");
    }
}
