use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use kiln::config::Config;
use kiln::infrastructure::{CopyEngine, JsonEventSink, StylesheetWorkerPool};
use kiln::{BuildAction, BuildEvent, BuildEventSink, BuildOutput, BuildRequest};

use crate::cli::{BuildArgs, ColorWhen};
use crate::ui::context::UiContext;
use crate::ui::views::build::{render_build_event, render_build_header, render_build_output};

pub fn cmd_build(
    args: &BuildArgs,
    watch: bool,
    json: bool,
    verbose: u8,
    color: Option<ColorWhen>,
) -> Result<()> {
    let workspace_root = std::env::current_dir().context("failed to read current directory")?;
    let (config, warnings) = Config::load_for_workspace(&workspace_root)?;
    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    let ui = UiContext::new(json, color, &config);
    let request = build_request(&workspace_root, args, &config, watch, verbose);

    let styles = Arc::new(StylesheetWorkerPool::with_default_size());
    let engine = CopyEngine::new(request.project_root.clone(), Arc::clone(&styles))
        .skip_dir(request.resolved_output_path())
        .with_cache_dir(request.resolved_cache_path());

    if watch {
        let token = request.cancellation.clone();
        ctrlc::set_handler(move || token.cancel()).context("failed to set Ctrl+C handler")?;
    }

    let json_sink = json.then(|| Arc::new(JsonEventSink::stdout()));
    let events: Arc<dyn BuildEventSink> = match &json_sink {
        Some(sink) => Arc::clone(sink) as Arc<dyn BuildEventSink>,
        None => Arc::new(ConsoleEventSink { ui }),
    };

    if !ui.json {
        print!(
            "{}",
            render_build_header(
                &display_relative(&request.project_root, &workspace_root),
                &display_relative(&request.resolved_output_path(), &workspace_root),
                watch,
                ui.color,
                ui.unicode
            )
        );
    }

    let action = BuildAction::new(request)
        .with_worker_pool(styles)
        .with_event_sink(events);

    let mut last_success = true;
    for output in action.run(engine)? {
        let output = match output {
            Ok(output) => output,
            Err(error) => {
                if let Some(sink) = &json_sink {
                    sink.write_event(serde_json::json!({
                        "event": "error",
                        "command": "build",
                        "message": error.to_string(),
                    }));
                }
                return Err(error.into());
            }
        };

        last_success = output.is_success();
        match &json_sink {
            Some(sink) => sink.write_event(output_json(&output)),
            None => print!(
                "{}",
                render_build_output(&timestamp(), &output, ui.color, ui.unicode)
            ),
        }
    }

    if !watch && !last_success {
        anyhow::bail!("build failed");
    }
    Ok(())
}

/// CLI flags > environment (already folded into `config`) > kiln.toml > defaults
fn build_request(
    workspace_root: &Path,
    args: &BuildArgs,
    config: &Config,
    watch: bool,
    verbose: u8,
) -> BuildRequest {
    let project_root = match &args.project {
        Some(project) => workspace_root.join(project),
        None => config.project_root(workspace_root),
    };
    let output_path = args
        .output_path
        .clone()
        .unwrap_or_else(|| config.build.output_path.clone());

    let mut request = BuildRequest::new(workspace_root, output_path)
        .with_project_root(project_root)
        .with_watch(watch)
        .with_write_to_file_system(config.build.write && !args.no_write)
        .with_delete_output_path(config.build.delete_output_path || args.delete_output_path)
        .with_progress(config.output.progress && !args.no_progress)
        .with_verbose(verbose > 0)
        .with_watch_root(config.watch.watch_root || args.watch_root)
        .with_poll(
            args.poll
                .map(std::time::Duration::from_millis)
                .or_else(|| config.watch.poll_interval()),
        );

    if let Some(cache_dir) = args.cache_dir.as_ref().or(config.build.cache_dir.as_ref()) {
        request = request.with_cache_path(cache_dir);
    }
    request
}

fn output_json(output: &BuildOutput) -> serde_json::Value {
    let summary = output.summary();
    serde_json::json!({
        "event": "build_output",
        "command": "build",
        "written": matches!(output, BuildOutput::Written(_)),
        "summary": serde_json::to_value(summary).unwrap_or(serde_json::Value::Null),
    })
}

fn display_relative(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Renders orchestrator events as timestamped terminal lines
struct ConsoleEventSink {
    ui: UiContext,
}

impl BuildEventSink for ConsoleEventSink {
    fn on_event(&self, event: BuildEvent) {
        let rendered = render_build_event(&timestamp(), &event, self.ui.color, self.ui.unicode);
        match event {
            BuildEvent::TeardownFailed { .. } => eprint!("{rendered}"),
            _ => print!("{rendered}"),
        }
    }
}
