//! Command implementations: wire the fix engine to the terminal.
//!
//! Every command follows the same shape: resolve the install paths, run
//! the engine, print one line per step with a status glyph, and turn the
//! report into the process exit code.  Nothing here returns an error; a
//! run that fixed nothing is exit code 1, not a panic.

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use colored::{ColoredString, Colorize};
use tracing::info;

use swfix_core::{
    CheckReport, CheckStatus, FixReport, StepReport, StepStatus, VerifyReport, GAME_PROCESS_NAMES,
};
use swfix_engine::application::watch_game::DEFAULT_POLL_INTERVAL;
use swfix_engine::infrastructure::probe::platform_probe;
use swfix_engine::infrastructure::process::platform_process_inspector;
use swfix_engine::infrastructure::registry::platform_registry_writer;
use swfix_engine::{FixPaths, FixSession, GameWatcher, SystemVerifier, WatchOutcome};

use crate::cli::{Cli, Command, CompleteArgs, RestoreArgs, UiArgs, VerifyArgs, WatchArgs};

pub fn run_command(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Ui(args) => cmd_ui(args),
        Command::Complete(args) => cmd_complete(args),
        Command::Verify(args) => cmd_verify(args),
        Command::Restore(args) => cmd_restore(args),
        Command::Watch(args) => cmd_watch(args),
    }
}

fn cmd_ui(args: UiArgs) -> ExitCode {
    let paths = FixPaths::with_overrides(None, args.settings_dir);
    println!("{}", path_line("Settings directory:", paths.settings_dir.as_deref()));
    let session = FixSession::new(paths, platform_registry_writer());
    print_fix_report("UI artifact fix", &session.run_ui_fix())
}

fn cmd_complete(args: CompleteArgs) -> ExitCode {
    let paths = FixPaths::with_overrides(args.game_dir, args.settings_dir);
    println!("{}", path_line("Game directory:    ", paths.game_dir.as_deref()));
    println!("{}", path_line("Settings directory:", paths.settings_dir.as_deref()));
    let session = FixSession::new(paths, platform_registry_writer());
    print_fix_report("Complete DX12 fix", &session.run_complete_fix())
}

fn cmd_verify(args: VerifyArgs) -> ExitCode {
    let paths = FixPaths::with_overrides(args.game_dir, args.settings_dir);
    println!("{}", path_line("Game directory:    ", paths.game_dir.as_deref()));
    println!("{}", path_line("Settings directory:", paths.settings_dir.as_deref()));
    let report = SystemVerifier::new(platform_probe()).run(&paths);
    print_verify_report(&report)
}

fn cmd_restore(args: RestoreArgs) -> ExitCode {
    let paths = FixPaths::with_overrides(args.game_dir, args.settings_dir);
    println!("{}", path_line("Game directory:    ", paths.game_dir.as_deref()));
    println!("{}", path_line("Settings directory:", paths.settings_dir.as_deref()));
    let session = FixSession::new(paths, platform_registry_writer());
    print_fix_report("Restore from backups", &session.restore_backups())
}

fn cmd_watch(args: WatchArgs) -> ExitCode {
    let paths = FixPaths::with_overrides(args.game_dir, None);
    match paths.game_executable() {
        Some(exe) if exe.is_file() => info!(exe = %exe.display(), "found game executable"),
        _ => println!(
            "{} game install not located; matching by process name only",
            "-".yellow()
        ),
    }
    println!("Waiting up to {} s for the game to launch...", args.timeout_secs);
    let watcher = GameWatcher::with_timing(
        platform_process_inspector(),
        Duration::from_secs(args.timeout_secs),
        DEFAULT_POLL_INTERVAL,
    );
    let outcome = watcher.wait_for_launch(&GAME_PROCESS_NAMES);
    println!("{}", outcome_line(&outcome));
    exit_code(watch_success(&outcome))
}

// ── Report rendering ──────────────────────────────────────────────────────────

fn print_fix_report(title: &str, report: &FixReport) -> ExitCode {
    println!("{}", title.bold());
    for step in report.steps() {
        println!("{}", step_line(step));
    }
    let ok = report.succeeded();
    println!("{} {}", tally_glyph(ok), report.summary());
    exit_code(ok)
}

fn print_verify_report(report: &VerifyReport) -> ExitCode {
    for check in report.checks() {
        println!("{}", check_line(check));
    }
    let ok = report.all_passed();
    println!("{} {}", tally_glyph(ok), report.summary());
    exit_code(ok)
}

fn step_line(step: &StepReport) -> String {
    match &step.status {
        StepStatus::Applied => format!("  {} {}", "✓".green(), step.name),
        StepStatus::Skipped(reason) => format!("  {} {} ({reason})", "-".yellow(), step.name),
        StepStatus::Failed(reason) => format!("  {} {} ({reason})", "✗".red(), step.name),
    }
}

fn check_line(check: &CheckReport) -> String {
    let glyph = match check.status {
        CheckStatus::Pass => "✓".green(),
        CheckStatus::Warn => "-".yellow(),
        CheckStatus::Fail => "✗".red(),
        CheckStatus::Unknown => "?".dimmed(),
    };
    format!("  {} {}: {}", glyph, check.name, check.detail)
}

fn outcome_line(outcome: &WatchOutcome) -> String {
    match outcome {
        WatchOutcome::Boosted { pid, name } => format!(
            "{} {name} (pid {pid}) is running at high priority",
            "✓".green().bold()
        ),
        WatchOutcome::Found { pid, name } => format!(
            "{} {name} (pid {pid}) found; its priority could not be raised",
            "-".yellow()
        ),
        WatchOutcome::TimedOut => {
            format!("{} the game did not launch before the deadline", "✗".red())
        }
        WatchOutcome::Unavailable(reason) => format!("{} {reason}", "✗".red()),
    }
}

fn watch_success(outcome: &WatchOutcome) -> bool {
    matches!(
        outcome,
        WatchOutcome::Boosted { .. } | WatchOutcome::Found { .. }
    )
}

fn path_line(label: &str, dir: Option<&Path>) -> String {
    match dir {
        Some(dir) => format!("{label} {}", dir.display().to_string().bold()),
        None => format!("{label} {}", "not found".yellow()),
    }
}

fn tally_glyph(ok: bool) -> ColoredString {
    if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
