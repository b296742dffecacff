//! Command handlers: one engine operation per subcommand, printed either
//! as human-readable text or as the JSON response envelope.

use anyhow::{Context, Result};
use serde::Serialize;

use waypoint_core::{
    EngineError, NewTask, PlanEngine, Task, TaskStatus, TaskUpdate, response,
};
use waypoint_render::{ascii_graph, context_prompt, mermaid_graph, tree_view};

use crate::seed::parse_seed;
use crate::{Commands, GraphFormat};

/// Dispatch a parsed command against the engine.
pub fn run_command(command: Commands, engine: &mut PlanEngine, json: bool) -> Result<()> {
    match command {
        Commands::Init { file } => {
            let content = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read seed file: {file}"))?;
            let seed = parse_seed(&content)?;
            let result = engine.initialize_plan(&seed.goal, &seed.tasks);
            finish(json, result, |summary| {
                println!("Plan initialized.");
                println!("  Goal:  {}", summary.goal);
                println!("  Tasks: {}", summary.task_count);
            })
        }
        Commands::Current => finish(json, engine.current_task(), print_task),
        Commands::Start => finish(json, engine.start_next_task(), |task| {
            println!("Started task {}: {}", task.id, task.name);
        }),
        Commands::Complete { id, result } => {
            finish(json, engine.complete_task(id, &result), |ack| {
                println!("Task {} completed.", ack.task_id);
                if ack.plan_completed {
                    println!("All tasks settled -- plan completed.");
                }
            })
        }
        Commands::Fail {
            id,
            message,
            no_retry,
        } => finish(json, engine.fail_task(id, &message, !no_retry), |ack| {
            println!("Task {} failed (will retry: {}).", ack.task_id, ack.will_retry);
        }),
        Commands::Add {
            name,
            dependencies,
            reasoning,
            after,
        } => {
            let result = engine.add_task(NewTask {
                name,
                dependencies,
                reasoning,
                after_id: after,
            });
            finish(json, result, |task| {
                println!("Added task {}: {}", task.id, task.name);
            })
        }
        Commands::Update {
            id,
            name,
            reasoning,
            dependencies,
            clear_deps,
        } => {
            let dependencies = if clear_deps {
                Some(vec![])
            } else if dependencies.is_empty() {
                None
            } else {
                Some(dependencies)
            };
            let result = engine.update_task(
                id,
                TaskUpdate {
                    name,
                    reasoning,
                    dependencies,
                },
            );
            finish(json, result, |task| {
                println!("Updated task {}.", task.id);
                print_task(task);
            })
        }
        Commands::Skip { id, reason } => finish(json, engine.skip_task(id, &reason), |ack| {
            println!("Task {} skipped.", ack.task_id);
        }),
        Commands::Remove { id } => finish(json, engine.remove_task(id), |ack| {
            println!("Task {} removed.", ack.task_id);
        }),
        Commands::Show { id } => finish(json, engine.task(id), print_task),
        Commands::List { status } => {
            let listing = engine.task_list(status);
            finish(json, Ok(listing), |listing| {
                if listing.tasks.is_empty() {
                    println!("No tasks ({} total in plan).", listing.total);
                    return;
                }
                for task in &listing.tasks {
                    let deps: Vec<String> =
                        task.dependencies.iter().map(|d| d.to_string()).collect();
                    let deps = if deps.is_empty() {
                        String::new()
                    } else {
                        format!("  (needs: {})", deps.join(", "))
                    };
                    println!(
                        "  [{}] {} {}{}",
                        status_icon(task.status),
                        task.id,
                        task.name,
                        deps
                    );
                }
                println!();
                println!("{} of {} tasks shown.", listing.filtered, listing.total);
            })
        }
        Commands::Status => {
            let plan = engine.export_plan();
            let report = engine.plan_status();
            finish(json, Ok(report), |report| {
                println!("Goal: {}", plan.goal);
                println!("Status: {}", report.status);
                if let Some(current) = report.current_task_id {
                    println!("Current task: {current}");
                }
                println!(
                    "Progress: {}/{} completed",
                    report.completed_tasks, report.total_tasks
                );
                println!(
                    "  pending={} in_progress={} completed={} failed={} skipped={}",
                    report.pending_tasks,
                    report.in_progress_tasks,
                    report.completed_tasks,
                    report.failed_tasks,
                    report.skipped_tasks,
                );
            })
        }
        Commands::Executable => {
            let tasks = engine.executable_tasks();
            finish(json, Ok(tasks), |tasks| {
                if tasks.is_empty() {
                    println!("No executable tasks.");
                    return;
                }
                println!("Executable now:");
                for task in tasks {
                    println!("  [{}] {}", task.id, task.name);
                }
            })
        }
        Commands::Graph { format } => {
            let graph = engine.dependency_graph();
            let rendered = match format {
                GraphFormat::Ascii => ascii_graph(&graph),
                GraphFormat::Tree => tree_view(&graph),
                GraphFormat::Mermaid => mermaid_graph(&graph),
            };
            if json {
                // The structured graph is the JSON-facing form.
                println!(
                    "{}",
                    serde_json::to_string_pretty(&response::success(&graph))?
                );
            } else {
                print!("{rendered}");
            }
            Ok(())
        }
        Commands::Prompt => {
            let plan = engine.export_plan();
            let prompt = context_prompt(&plan);
            if json {
                let payload = serde_json::json!({ "prompt": prompt });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&response::success(&payload))?
                );
            } else {
                print!("{prompt}");
            }
            Ok(())
        }
        Commands::Export { output } => {
            let plan = engine.export_plan();
            let contents =
                serde_json::to_string_pretty(&plan).context("failed to serialize plan")?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &contents)
                        .with_context(|| format!("failed to write to {path}"))?;
                    println!("Plan exported to {path}");
                }
                None => println!("{contents}"),
            }
            Ok(())
        }
        Commands::Pause => finish(json, engine.pause_plan(), |status| {
            println!("Plan {status}.");
        }),
        Commands::Resume => finish(json, engine.resume_plan(), |status| {
            println!("Plan {status}.");
        }),
        Commands::Reset => finish(json, engine.reset_plan(), |summary| {
            println!("Plan reset ({} tasks back to pending).", summary.reset_tasks);
        }),
    }
}

/// Print the outcome of an operation and set the exit code for failures.
fn finish<T: Serialize>(
    json: bool,
    result: Result<T, EngineError>,
    human: impl FnOnce(&T),
) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response::envelope(&result))?
        );
        if result.is_err() {
            std::process::exit(1);
        }
        return Ok(());
    }
    match result {
        Ok(data) => {
            human(&data);
            Ok(())
        }
        Err(err) => {
            eprintln!("error[{}]: {err}", err.code());
            std::process::exit(1);
        }
    }
}

fn print_task(task: &Task) {
    println!("[{}] {} ({})", task.id, task.name, task.status);
    if !task.reasoning.is_empty() {
        println!("  Why: {}", task.reasoning);
    }
    if !task.dependencies.is_empty() {
        let deps: Vec<String> = task.dependencies.iter().map(|d| d.to_string()).collect();
        println!("  Needs: {}", deps.join(", "));
    }
    if let Some(result) = &task.result {
        println!("  Result: {result}");
    }
}

fn status_icon(status: TaskStatus) -> char {
    match status {
        TaskStatus::Pending => '.',
        TaskStatus::InProgress => '*',
        TaskStatus::Completed => '+',
        TaskStatus::Failed => '!',
        TaskStatus::Skipped => '~',
    }
}
