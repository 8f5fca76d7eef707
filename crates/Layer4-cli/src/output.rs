//! Console output for task events and reports

use async_trait::async_trait;
use blnt_task::{TaskEvent, TaskEventKind, TaskEventListener, TaskReport};

/// Prints lifecycle events as they happen
pub struct ConsoleListener {
    verbose: bool,
}

impl ConsoleListener {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

#[async_trait]
impl TaskEventListener for ConsoleListener {
    fn name(&self) -> &str {
        "console"
    }

    fn kinds(&self) -> Option<Vec<TaskEventKind>> {
        if self.verbose {
            None
        } else {
            Some(vec![
                TaskEventKind::Started,
                TaskEventKind::Completed,
                TaskEventKind::Failed,
            ])
        }
    }

    async fn on_event(&self, event: &TaskEvent) {
        println!("{}", format_event(event, self.verbose));
    }
}

pub fn format_event(event: &TaskEvent, verbose: bool) -> String {
    match event.kind {
        TaskEventKind::Queued => format!("  queued  [{}] {}", event.task_id, event.description),
        TaskEventKind::Started => format!(
            "▶ [{}] ({}) {}",
            event.task_id, event.task_type, event.description
        ),
        TaskEventKind::Completed => {
            let mut line = format!("✓ [{}] completed", event.task_id);
            if verbose {
                if let Some(result) = &event.result {
                    line.push_str(&format!(": {}", truncate(&result.to_string(), 200)));
                }
            }
            line
        }
        TaskEventKind::Failed => format!(
            "✗ [{}] failed: {}",
            event.task_id,
            event.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// One line per report, subtasks indented
pub fn print_report(report: &TaskReport, depth: usize) {
    let symbol = match report.status.as_str() {
        "completed" => "✓",
        "failed" => "✗",
        "running" => "…",
        _ => "○",
    };
    let duration = report
        .duration_ms
        .map(|ms| format!(" ({}ms)", ms))
        .unwrap_or_default();

    println!(
        "{}{} [{}] {}{}",
        "  ".repeat(depth),
        symbol,
        report.id,
        report.description,
        duration
    );
    if let Some(error) = &report.error {
        println!("{}    {}", "  ".repeat(depth), error);
    }

    for subtask in &report.subtasks {
        print_report(subtask, depth + 1);
    }
}

/// Truncate a string for display
pub fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_chars {
        s
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
