//! `blnt agent` subcommands

use crate::executors::build_executors;
use crate::output::{print_report, ConsoleListener};
use crate::AgentAction;
use anyhow::Context;
use blnt_foundation::BlntConfig;
use blnt_task::{AgentEngine, Task, TaskKind, TaskReport};
use std::path::Path;
use std::sync::Arc;

pub async fn run(action: AgentAction, config: &BlntConfig) -> anyhow::Result<()> {
    match action {
        AgentAction::Run {
            goal,
            plan,
            concurrent,
            verbose,
            json,
        } => {
            let tasks = match (plan, goal) {
                (Some(path), _) => load_plan(&path)?,
                (None, Some(goal)) => goal_plan(&goal),
                (None, None) => anyhow::bail!("Either --goal or --plan is required"),
            };
            run_tasks(config, tasks, concurrent, verbose, json).await
        }
        AgentAction::Task {
            kind,
            description,
            json,
        } => run_single(config, TaskKind::from(kind), description, json).await,
        AgentAction::Status => {
            print_status(config);
            Ok(())
        }
    }
}

/// Default breakdown of a goal
pub fn goal_plan(goal: &str) -> Vec<Task> {
    vec![
        Task::new(
            "task-1",
            format!("Analyze goal: {}", goal),
            TaskKind::Terminal,
        ),
        Task::composite("task-2", "Execute actions based on analysis", vec![]),
    ]
}

pub fn load_plan(path: &Path) -> anyhow::Result<Vec<Task>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read plan {}", path.display()))?;
    let tasks: Vec<Task> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid plan {}", path.display()))?;
    Ok(tasks)
}

async fn run_tasks(
    config: &BlntConfig,
    tasks: Vec<Task>,
    concurrent: bool,
    verbose: bool,
    json: bool,
) -> anyhow::Result<()> {
    let agent_config = config.agent.clone().verbose(verbose || config.agent.verbose);
    let engine = AgentEngine::new(agent_config, build_executors(config)?)?;

    if !json {
        println!("\n🤖 Starting autonomous agent ({} tasks)\n", tasks.len());
        engine
            .events()
            .subscribe(Arc::new(ConsoleListener::new(engine.config().verbose)))
            .await;
    }

    for task in tasks {
        engine.add_task(task).await;
    }

    let processed = if concurrent {
        engine.process_tasks_concurrent().await
    } else {
        engine.process_tasks().await
    };
    let reports: Vec<TaskReport> = processed.iter().map(Task::report).collect();
    let failed = processed.iter().filter(|t| t.error().is_some()).count();
    let status = engine.get_status().await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "status": status,
                "tasks": reports,
            }))?
        );
    } else {
        println!();
        for report in &reports {
            print_report(report, 0);
        }
        println!("\n✓ Agent execution completed");
        println!("Completed tasks: {} ({})", status.completed, status);
    }

    if failed > 0 {
        anyhow::bail!("{} of {} tasks failed", failed, processed.len());
    }
    Ok(())
}

async fn run_single(
    config: &BlntConfig,
    kind: TaskKind,
    description: String,
    json: bool,
) -> anyhow::Result<()> {
    let engine = AgentEngine::new(config.agent.clone(), build_executors(config)?)?;
    let mut task = Task::new(Task::generate_id(), description, kind);

    let outcome = engine.execute_task(&mut task).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&task.report())?);
    } else if let Some(result) = task.result() {
        println!("{}", serde_json::to_string_pretty(result)?);
    }

    outcome?;
    if !json {
        println!("\n✓ Task completed successfully");
    }
    Ok(())
}

fn print_status(config: &BlntConfig) {
    let agent = &config.agent;

    println!("\n=== Agent Status ===\n");
    println!("Agent is ready to execute tasks");
    println!("  Max concurrent tasks: {}", agent.max_concurrent_tasks);
    println!("  Timeout:              {}ms", agent.timeout);
    println!("  Retry attempts:       {}", agent.retry_attempts);
    println!("  Verbose:              {}", agent.verbose);
    println!(
        "  Model:                {} @ {}",
        config.provider.model, config.provider.ollama_url
    );
    println!("\nUse \"blnt agent run\" to start the agent\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_goal_plan() {
        let plan = goal_plan("tidy downloads");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].description(), "Analyze goal: tidy downloads");
        assert_eq!(plan[0].kind(), &TaskKind::Terminal);
        assert!(plan[1].kind().is_composite());
        assert!(plan[1].subtasks().is_empty());
    }

    #[test]
    fn test_load_plan() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"description": "echo hi", "type": "desktop"}}]"#
        )
        .unwrap();

        let tasks = load_plan(file.path()).unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(tasks[0].id().starts_with("task-"));
    }

    #[test]
    fn test_load_plan_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not a plan").unwrap();
        assert!(load_plan(file.path()).is_err());
        assert!(load_plan(Path::new("/nonexistent/plan.json")).is_err());
    }
}
