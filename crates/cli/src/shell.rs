// Interactive shell
//
// Every field is read as a plain line. A form whose submission fails with a
// validation or business rule error is asked again; other failures go back
// to the menu.

use crate::output::{self, AutocloseSummary, Deleted, Project, Task};
use crate::rpc::{RpcClient, RpcError};
use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const HELP: &str = "\
Commands:
  projects        list projects
  new-project     create a project
  edit-project    rename or redescribe a project (blank keeps current)
  delete-project  delete a project and its tasks
  tasks           list the tasks of a project
  show-task       show one task
  new-task        add a task to a project
  edit-task       edit title, description and deadline (blank keeps current)
  status          change a task's status (todo, doing, done)
  delete-task     delete a task
  overdue         list overdue open tasks
  autoclose       close every overdue task now
  help            show this list
  quit            leave the shell";

/// Stdin closed while a prompt was waiting
#[derive(Debug, thiserror::Error)]
#[error("input closed")]
struct InputClosed;

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(InputClosed.into()),
        }
    }

    async fn text(&mut self, label: &str) -> Result<String> {
        self.line(&format!("{}: ", label)).await
    }

    /// Blank input means "none"
    async fn optional(&mut self, label: &str) -> Result<Option<String>> {
        let raw = self.text(label).await?;
        Ok(Some(raw).filter(|value| !value.trim().is_empty()))
    }

    /// Blank input keeps `current`, shown in brackets
    async fn keep(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        let raw = self.line(&format!("{} [{}]: ", label, current)).await?;
        Ok(replacement(raw))
    }

    async fn id(&mut self, label: &str) -> Result<i64> {
        loop {
            let raw = self.text(label).await?;
            match raw.trim().parse() {
                Ok(id) => return Ok(id),
                Err(_) => eprintln!("{}", "Please enter a numeric id".yellow()),
            }
        }
    }
}

/// `None` keeps the current value; omitted fields are left alone by updates
fn replacement(raw: String) -> Option<String> {
    Some(raw).filter(|value| !value.trim().is_empty())
}

/// Deadline answer for an edit: blank keeps, `-` clears, anything else replaces
fn deadline_replacement(raw: String) -> Option<String> {
    match raw.trim() {
        "-" => Some(String::new()),
        _ => replacement(raw),
    }
}

/// Print the failure and tell the caller whether to ask again
fn should_retry(err: &anyhow::Error) -> bool {
    eprintln!("{} {:#}", "✗".red().bold(), err);
    err.downcast_ref::<RpcError>()
        .is_some_and(RpcError::is_input_error)
}

pub async fn run(client: &RpcClient) -> Result<()> {
    let mut prompt = Prompt::new();
    println!("{} ({})", "Tracker shell".cyan().bold(), client.url());
    println!("{}", HELP);

    loop {
        let choice = match prompt.line("tracker> ").await {
            Ok(choice) => choice,
            Err(e) if e.is::<InputClosed>() => break,
            Err(e) => return Err(e),
        };

        let outcome = match choice.trim() {
            "" => Ok(()),
            "help" | "?" => {
                println!("{}", HELP);
                Ok(())
            }
            "quit" | "exit" | "q" => break,
            "projects" => list_projects(client).await,
            "new-project" => new_project(client, &mut prompt).await,
            "edit-project" => edit_project(client, &mut prompt).await,
            "delete-project" => delete_project(client, &mut prompt).await,
            "tasks" => list_tasks(client, &mut prompt).await,
            "show-task" => show_task(client, &mut prompt).await,
            "new-task" => new_task(client, &mut prompt).await,
            "edit-task" => edit_task(client, &mut prompt).await,
            "status" => change_status(client, &mut prompt).await,
            "delete-task" => delete_task(client, &mut prompt).await,
            "overdue" => overdue(client).await,
            "autoclose" => autoclose(client).await,
            other => {
                eprintln!("Unknown command '{}', type 'help'", other);
                Ok(())
            }
        };

        match outcome {
            Ok(()) => {}
            Err(e) if e.is::<InputClosed>() => break,
            Err(e) => eprintln!("{} {:#}", "✗".red().bold(), e),
        }
    }

    println!("Bye");
    Ok(())
}

async fn list_projects(client: &RpcClient) -> Result<()> {
    let projects: Vec<Project> = client.call("project.list.v1", json!({})).await?;
    println!("{}", output::projects_table(&projects));
    Ok(())
}

async fn new_project(client: &RpcClient, prompt: &mut Prompt) -> Result<()> {
    loop {
        let name = prompt.text("Name").await?;
        let description = prompt.text("Description").await?;
        let params = json!({ "name": name, "description": description });

        match client.call::<Project>("project.create.v1", params).await {
            Ok(project) => {
                output::success(&format!("Project {} created", project.id));
                return Ok(());
            }
            Err(e) if should_retry(&e) => continue,
            Err(_) => return Ok(()),
        }
    }
}

async fn edit_project(client: &RpcClient, prompt: &mut Prompt) -> Result<()> {
    let id = prompt.id("Project id").await?;
    let current: Project = client.call("project.get.v1", json!({ "id": id })).await?;
    println!("{}", output::projects_table(std::slice::from_ref(&current)));

    loop {
        let name = prompt.keep("New name", &current.name).await?;
        let description = prompt.keep("New description", &current.description).await?;
        let params = json!({ "id": id, "name": name, "description": description });

        match client.call::<Project>("project.update.v1", params).await {
            Ok(project) => {
                output::success(&format!("Project {} updated", project.id));
                return Ok(());
            }
            Err(e) if should_retry(&e) => continue,
            Err(_) => return Ok(()),
        }
    }
}

async fn delete_project(client: &RpcClient, prompt: &mut Prompt) -> Result<()> {
    let id = prompt.id("Project id").await?;
    let deleted: Deleted = client.call("project.delete.v1", json!({ "id": id })).await?;
    output::success(&format!("Project {} deleted with its tasks", deleted.id));
    Ok(())
}

async fn list_tasks(client: &RpcClient, prompt: &mut Prompt) -> Result<()> {
    let project_id = prompt.id("Project id").await?;
    let tasks: Vec<Task> = client
        .call("task.list.v1", json!({ "project_id": project_id }))
        .await?;
    println!("{}", output::tasks_table(&tasks));
    Ok(())
}

async fn show_task(client: &RpcClient, prompt: &mut Prompt) -> Result<()> {
    let id = prompt.id("Task id").await?;
    let task: Task = client.call("task.get.v1", json!({ "id": id })).await?;
    println!("{}", output::task_details(&task));
    Ok(())
}

async fn new_task(client: &RpcClient, prompt: &mut Prompt) -> Result<()> {
    loop {
        let project_id = prompt.id("Project id").await?;
        let title = prompt.text("Title").await?;
        let description = prompt.text("Description").await?;
        let deadline = prompt.optional("Deadline (YYYY-MM-DD, blank for none)").await?;
        let params = json!({
            "project_id": project_id,
            "title": title,
            "description": description,
            "deadline": deadline,
        });

        match client.call::<Task>("task.create.v1", params).await {
            Ok(task) => {
                output::success(&format!("Task {} added", task.id));
                return Ok(());
            }
            Err(e) if should_retry(&e) => continue,
            Err(_) => return Ok(()),
        }
    }
}

async fn edit_task(client: &RpcClient, prompt: &mut Prompt) -> Result<()> {
    let id = prompt.id("Task id").await?;
    let current: Task = client.call("task.get.v1", json!({ "id": id })).await?;
    println!("{}", output::task_details(&current));

    loop {
        let title = prompt.keep("New title", &current.title).await?;
        let description = prompt.keep("New description", &current.description).await?;
        let deadline = deadline_replacement(
            prompt
                .line(&format!(
                    "New deadline (YYYY-MM-DD, - to clear) [{}]: ",
                    current.deadline.as_deref().unwrap_or("none")
                ))
                .await?,
        );
        let params = json!({
            "id": id,
            "title": title,
            "description": description,
            "deadline": deadline,
        });

        match client.call::<Task>("task.update.v1", params).await {
            Ok(task) => {
                output::success(&format!("Task {} updated", task.id));
                return Ok(());
            }
            Err(e) if should_retry(&e) => continue,
            Err(_) => return Ok(()),
        }
    }
}

async fn change_status(client: &RpcClient, prompt: &mut Prompt) -> Result<()> {
    let id = prompt.id("Task id").await?;
    loop {
        let status = prompt.text("New status (todo, doing, done)").await?;
        let params = json!({ "id": id, "status": status });

        match client.call::<Task>("task.status.v1", params).await {
            Ok(task) => {
                output::success(&format!("Task {} is now {}", task.id, task.status));
                return Ok(());
            }
            Err(e) if should_retry(&e) => continue,
            Err(_) => return Ok(()),
        }
    }
}

async fn delete_task(client: &RpcClient, prompt: &mut Prompt) -> Result<()> {
    let id = prompt.id("Task id").await?;
    let deleted: Deleted = client.call("task.delete.v1", json!({ "id": id })).await?;
    output::success(&format!("Task {} deleted", deleted.id));
    Ok(())
}

async fn overdue(client: &RpcClient) -> Result<()> {
    let tasks: Vec<Task> = client.call("task.overdue.v1", json!({})).await?;
    println!("{}", output::tasks_table(&tasks));
    Ok(())
}

async fn autoclose(client: &RpcClient) -> Result<()> {
    let summary: AutocloseSummary = client.call("admin.autoclose.v1", json!({})).await?;
    println!("{}", output::autoclose_summary(&summary));
    Ok(())
}
