//! Tracker CLI - Command-line interface for the tracker daemon

mod output;
mod rpc;
mod shell;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use output::{AutocloseSummary, Deleted, Project, Task};
use rpc::{exit_code_for, RpcClient};
use serde_json::json;
use std::process::ExitCode;

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9537";

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Project and task tracker CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "TRACKER_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Close every overdue task now
    Autoclose {
        /// Evaluate overdue as of this RFC 3339 instant instead of the daemon clock
        #[arg(long)]
        now: Option<String>,
    },

    /// Interactive menu
    Shell,
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Create a project
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: String,
    },
    /// List all projects
    List,
    /// Show one project
    Show { id: i64 },
    /// Change name and/or description
    Edit {
        id: i64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a project and its tasks
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task to a project
    Add {
        project_id: i64,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        description: String,
        /// YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List the tasks of a project
    List { project_id: i64 },
    /// Show one task
    Show { id: i64 },
    /// Change any of title, description, deadline and status
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// YYYY-MM-DD, empty string to clear
        #[arg(long)]
        deadline: Option<String>,
        /// todo, doing or done
        #[arg(long)]
        status: Option<String>,
    },
    /// Change status (todo, doing, done)
    Status { id: i64, status: String },
    /// Delete a task
    Delete { id: i64 },
    /// List overdue open tasks
    Overdue {
        #[arg(long)]
        now: Option<String>,
    },
}

fn as_of(now: Option<String>) -> serde_json::Value {
    match now {
        Some(now) => json!({ "now": now }),
        None => json!({}),
    }
}

async fn run_project(client: &RpcClient, command: ProjectCommand) -> Result<()> {
    match command {
        ProjectCommand::Create { name, description } => {
            let params = json!({ "name": name, "description": description });
            let project: Project = client.call("project.create.v1", params).await?;
            output::success(&format!("Project {} created", project.id));
            println!("{}", output::projects_table(&[project]));
        }
        ProjectCommand::List => {
            let projects: Vec<Project> = client.call("project.list.v1", json!({})).await?;
            println!("{}", output::projects_table(&projects));
        }
        ProjectCommand::Show { id } => {
            let project: Project = client.call("project.get.v1", json!({ "id": id })).await?;
            println!("{}", output::projects_table(&[project]));
        }
        ProjectCommand::Edit {
            id,
            name,
            description,
        } => {
            let params = json!({ "id": id, "name": name, "description": description });
            let project: Project = client.call("project.update.v1", params).await?;
            output::success(&format!("Project {} updated", project.id));
            println!("{}", output::projects_table(&[project]));
        }
        ProjectCommand::Delete { id } => {
            let deleted: Deleted = client.call("project.delete.v1", json!({ "id": id })).await?;
            output::success(&format!("Project {} deleted with its tasks", deleted.id));
        }
    }
    Ok(())
}

async fn run_task(client: &RpcClient, command: TaskCommand) -> Result<()> {
    match command {
        TaskCommand::Add {
            project_id,
            title,
            description,
            deadline,
        } => {
            let params = json!({
                "project_id": project_id,
                "title": title,
                "description": description,
                "deadline": deadline,
            });
            let task: Task = client.call("task.create.v1", params).await?;
            output::success(&format!("Task {} added", task.id));
            println!("{}", output::task_details(&task));
        }
        TaskCommand::List { project_id } => {
            let params = json!({ "project_id": project_id });
            let tasks: Vec<Task> = client.call("task.list.v1", params).await?;
            println!("{}", output::tasks_table(&tasks));
        }
        TaskCommand::Show { id } => {
            let task: Task = client.call("task.get.v1", json!({ "id": id })).await?;
            println!("{}", output::task_details(&task));
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            deadline,
            status,
        } => {
            let params = json!({
                "id": id,
                "title": title,
                "description": description,
                "deadline": deadline,
                "status": status,
            });
            let task: Task = client.call("task.update.v1", params).await?;
            output::success(&format!("Task {} updated", task.id));
            println!("{}", output::task_details(&task));
        }
        TaskCommand::Status { id, status } => {
            let params = json!({ "id": id, "status": status });
            let task: Task = client.call("task.status.v1", params).await?;
            output::success(&format!("Task {} is now {}", task.id, task.status));
        }
        TaskCommand::Delete { id } => {
            let deleted: Deleted = client.call("task.delete.v1", json!({ "id": id })).await?;
            output::success(&format!("Task {} deleted", deleted.id));
        }
        TaskCommand::Overdue { now } => {
            let tasks: Vec<Task> = client.call("task.overdue.v1", as_of(now)).await?;
            println!("{}", output::tasks_table(&tasks));
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let client = RpcClient::new(cli.rpc_url);

    match cli.command {
        Commands::Project(command) => run_project(&client, command).await,
        Commands::Task(command) => run_task(&client, command).await,
        Commands::Autoclose { now } => {
            let summary: AutocloseSummary = client.call("admin.autoclose.v1", as_of(now)).await?;
            println!("{}", output::autoclose_summary(&summary));
            Ok(())
        }
        Commands::Shell => shell::run(&client).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}
