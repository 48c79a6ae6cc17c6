use kiln::{BuildEvent, BuildOutput};

use crate::ui::blocks::header::CommandHeader;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

pub fn render_build_header(
    project: &str,
    output: &str,
    watch: bool,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let mut header = if watch {
        CommandHeader::new(Icon::Watch, "Kiln Watch")
    } else {
        CommandHeader::new(Icon::Build, "Kiln Build")
    };
    header.add("Project", project);
    header.add("Output", output);
    if watch {
        header.add("Hint", "Press Ctrl+C to stop");
    }
    header.render(supports_color, supports_unicode)
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// One timestamped line per orchestrator event
pub fn render_build_event(
    timestamp: &str,
    event: &BuildEvent,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let prefix = ColoredText::dim(format!("[{}]", timestamp)).render(supports_color);
    let icon = |icon: Icon| icon.colored(supports_color, supports_unicode);

    match event {
        BuildEvent::BuildStarted { rebuild } => format!(
            "{} {} {}\n",
            prefix,
            icon(Icon::Progress),
            if *rebuild { "Rebuilding..." } else { "Building..." }
        ),
        BuildEvent::BuildCompleted {
            success: true,
            warnings,
            duration_ms,
            ..
        } => {
            let mut line = format!("{} {} Built in {}ms", prefix, icon(Icon::Success), duration_ms);
            if *warnings > 0 {
                let warnings = ColoredText::warning(plural(*warnings, "warning"));
                line.push_str(&format!(" ({})", warnings.render(supports_color)));
            }
            line.push('\n');
            line
        }
        BuildEvent::BuildCompleted {
            success: false,
            errors,
            warnings,
            duration_ms,
            ..
        } => format!(
            "{} {} Build failed: {}, {} ({}ms)\n",
            prefix,
            icon(Icon::Error),
            plural(*errors, "error"),
            plural(*warnings, "warning"),
            duration_ms
        ),
        BuildEvent::WatchStarted { watching } => format!(
            "{} {} Watching {}\n",
            prefix,
            icon(Icon::Watch),
            plural(*watching, "path")
        ),
        BuildEvent::ChangesDetected { summary } => format!(
            "{} {} Changes: {}\n",
            prefix,
            icon(Icon::Arrow),
            summary
        ),
        BuildEvent::WatchPathsUpdated { added, removed } => format!(
            "{} {} Watch set: +{} -{}\n",
            prefix,
            icon(Icon::Arrow),
            added,
            removed
        ),
        BuildEvent::OutputWritten {
            files,
            assets,
            destination,
        } => format!(
            "{} {} Wrote {}, {} to {}\n",
            prefix,
            icon(Icon::Success),
            plural(*files, "file"),
            plural(*assets, "asset"),
            destination.display()
        ),
        BuildEvent::TeardownFailed { message } => format!(
            "{} {} Cleanup failed: {}\n",
            prefix,
            icon(Icon::Warning),
            message
        ),
        BuildEvent::WatchStopped => format!(
            "\n{} {} Watch stopped.\n",
            prefix,
            icon(Icon::Watch)
        ),
    }
}

/// Errors and warnings of one build, plus a line for in-memory results
pub fn render_build_output(
    timestamp: &str,
    output: &BuildOutput,
    supports_color: bool,
    supports_unicode: bool,
) -> String {
    let summary = output.summary();
    let mut out = String::new();

    for error in &summary.errors {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Error.colored(supports_color, supports_unicode),
            ColoredText::error(error.to_string()).render(supports_color)
        ));
    }
    for warning in &summary.warnings {
        out.push_str(&format!(
            "  {} {}\n",
            Icon::Warning.colored(supports_color, supports_unicode),
            warning
        ));
    }

    if let BuildOutput::InMemory { .. } = output {
        out.push_str(&format!(
            "{} {} Built {}, {} (not written)\n",
            ColoredText::dim(format!("[{}]", timestamp)).render(supports_color),
            Icon::Arrow.colored(supports_color, supports_unicode),
            plural(summary.output_count, "file"),
            plural(summary.asset_count, "asset")
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln::{BuildMessage, BuildSummary};
    use std::path::PathBuf;

    fn summary(errors: Vec<BuildMessage>) -> BuildSummary {
        BuildSummary {
            success: errors.is_empty(),
            errors,
            warnings: Vec::new(),
            output_count: 2,
            asset_count: 1,
        }
    }

    #[test]
    fn header_mentions_ctrl_c_only_when_watching() {
        let once = render_build_header("site", "dist", false, false, false);
        assert!(once.starts_with("[BUILD] Kiln Build"));
        assert!(!once.contains("Ctrl+C"));

        let watch = render_build_header("site", "dist", true, false, false);
        assert!(watch.starts_with("[~] Kiln Watch"));
        assert!(watch.contains("Press Ctrl+C to stop"));
    }

    #[test]
    fn renders_failed_build_counts() {
        let event = BuildEvent::BuildCompleted {
            rebuild: true,
            success: false,
            errors: 2,
            warnings: 1,
            duration_ms: 15,
        };
        let rendered = render_build_event("12:00:00", &event, false, false);
        assert_eq!(
            rendered,
            "[12:00:00] [FAIL] Build failed: 2 errors, 1 warning (15ms)\n"
        );
    }

    #[test]
    fn renders_written_output() {
        let event = BuildEvent::OutputWritten {
            files: 1,
            assets: 0,
            destination: PathBuf::from("/ws/dist"),
        };
        let rendered = render_build_event("08:30:05", &event, false, false);
        assert!(rendered.contains("[OK] Wrote 1 file, 0 assets to /ws/dist"));
    }

    #[test]
    fn renders_watch_started_with_watch_icon() {
        let rendered =
            render_build_event("00:00:00", &BuildEvent::WatchStarted { watching: 7 }, false, false);
        assert!(rendered.contains("[~] Watching 7 paths"));
    }

    #[test]
    fn lists_build_errors_with_their_file() {
        let output = BuildOutput::Written(summary(vec![
            BuildMessage::new("unexpected '}'").with_file("styles/site.css")
        ]));
        let rendered = render_build_output("00:00:00", &output, false, false);
        assert!(rendered.contains("[FAIL] styles/site.css: unexpected '}'"));
        assert!(!rendered.contains("not written"));
    }

    #[test]
    fn in_memory_output_reports_counts() {
        let output = BuildOutput::InMemory {
            summary: summary(Vec::new()),
            files: Vec::new(),
            assets: Vec::new(),
        };
        let rendered = render_build_output("00:00:00", &output, false, false);
        assert!(rendered.contains("Built 2 files, 1 asset (not written)"));
    }
}
