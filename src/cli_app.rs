//! Command-line definition and the single purge run it drives.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, CommandFactory, Parser};
use thiserror::Error;

use advance_purge::core::config::Config;
use advance_purge::core::errors::PurgeError;
use advance_purge::core::paths::{self, ENV_LOG_FILE, ShareRoots};
use advance_purge::logger::activity::{ActivityEvent, ActivityLog};
use advance_purge::logger::jsonl::JsonlWriter;
use advance_purge::platform::pal::is_running_as_root;
use advance_purge::purge::engine::{PurgeEngine, PurgeOptions, RunSummary};

/// Remove translations, manual pages, help files and documentation you do
/// not need, keeping the locales listed in the configuration.
#[derive(Debug, Parser)]
#[command(
    name = "advancepurge",
    version,
    about = "Purge unneeded locale, manual, help, printer and documentation files",
    long_about = None,
    disable_help_flag = true,
    args_override_self = true,
    ignore_errors = true
)]
pub struct Cli {
    /// Show help.
    #[arg(short = 'h', long = "help", short_alias = '?', action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
    /// Purge the '/usr/local' directories.
    #[arg(short, long)]
    local: bool,
    /// More verbose output.
    #[arg(short, long)]
    verbose: bool,
    /// Override config file path.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Report what would be deleted without deleting anything.
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Append a JSONL record of every action to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Failures that end the run before anything is deleted.
#[derive(Debug, Error)]
pub enum CliError {
    /// The config file could not be opened.
    #[error("{0}")]
    ConfigOpen(#[source] PurgeError),
    /// The config file could not be parsed.
    #[error("{0}")]
    ConfigParse(#[source] PurgeError),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigOpen(_) => 2,
            Self::ConfigParse(_) => 3,
        }
    }
}

impl From<PurgeError> for CliError {
    fn from(err: PurgeError) -> Self {
        match err {
            PurgeError::ConfigOpen { .. } => Self::ConfigOpen(err),
            other => Self::ConfigParse(other),
        }
    }
}

// ──────────────────── argv filtering ────────────────────

/// Short and long names the parser accepts, each tagged with whether it
/// consumes a value.
struct KnownFlags {
    shorts: Vec<(char, bool)>,
    longs: Vec<(String, bool)>,
}

impl KnownFlags {
    fn from_command() -> Self {
        let mut command = Cli::command();
        // Generated flags such as --version only exist after build().
        command.build();

        let mut known = Self {
            shorts: Vec::new(),
            longs: Vec::new(),
        };
        for arg in command.get_arguments() {
            let takes_value = arg.get_action().takes_values();
            let shorts = arg
                .get_short()
                .into_iter()
                .chain(arg.get_all_short_aliases().unwrap_or_default());
            known.shorts.extend(shorts.map(|c| (c, takes_value)));
            let longs = arg
                .get_long()
                .into_iter()
                .chain(arg.get_all_aliases().unwrap_or_default());
            known
                .longs
                .extend(longs.map(|name| (name.to_string(), takes_value)));
        }
        known
    }

    fn short(&self, flag: char) -> Option<bool> {
        self.shorts
            .iter()
            .find(|(c, _)| *c == flag)
            .map(|(_, takes_value)| *takes_value)
    }

    fn long(&self, name: &str) -> Option<bool> {
        self.longs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, takes_value)| *takes_value)
    }
}

/// Drop every token the parser does not know, so an unrecognized flag never
/// hides the flags that follow it.
///
/// The first token is the program name and is kept. An option that takes a
/// separate value is glued to the next token (`-c PATH` becomes `-cPATH`),
/// so the value survives even when it starts with `-`. Short clusters such
/// as `-lzv` keep their known letters. Bare words are dropped.
pub fn retain_known_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let known = KnownFlags::from_command();
    let mut args = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = args.next().into_iter().collect();
    // Option text waiting for its value.
    let mut pending: Option<String> = None;

    for arg in args {
        if let Some(option) = pending.take() {
            let mut joined = OsString::from(option);
            joined.push(&arg);
            kept.push(joined);
            continue;
        }
        let Some(text) = arg.to_str() else {
            continue;
        };

        if let Some(long) = text.strip_prefix("--") {
            match long.split_once('=') {
                Some((name, _)) if known.long(name).is_some() => kept.push(arg),
                Some(_) => {}
                None => match known.long(long) {
                    Some(true) => pending = Some(format!("--{long}=")),
                    Some(false) => kept.push(arg),
                    None => {}
                },
            }
        } else if let Some(cluster) = text.strip_prefix('-') {
            let mut flags = String::new();
            for (index, flag) in cluster.char_indices() {
                match known.short(flag) {
                    Some(true) => {
                        // The rest of the cluster is the value, if any.
                        let rest = &cluster[index + flag.len_utf8()..];
                        if rest.is_empty() {
                            pending = Some(format!("-{flag}"));
                        } else {
                            kept.push(format!("-{flag}{rest}").into());
                        }
                        break;
                    }
                    Some(false) => flags.push(flag),
                    None => {}
                }
            }
            if !flags.is_empty() {
                kept.push(format!("-{flags}").into());
            }
        }
    }

    // A value option at the very end has nothing to take.
    if let Some(option) = pending {
        kept.push(option.trim_end_matches('=').into());
    }

    kept
}

// ──────────────────── run ────────────────────

/// Load the configuration and purge every category.
///
/// Category-level failures are reported through the activity log and never
/// turn into an error here.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let mut log = ActivityLog::new(cli.verbose);
    let jsonl_path = cli
        .log_file
        .clone()
        .or_else(|| paths::env_var(ENV_LOG_FILE).map(PathBuf::from));
    if let Some(path) = jsonl_path {
        log = log.with_jsonl(JsonlWriter::open(path));
    }

    let config_path = paths::config_file(cli.config.as_deref());
    let config = Config::load(&config_path, &mut log)?;

    let options = PurgeOptions {
        roots: ShareRoots::from_env(),
        use_local_root: cli.local,
        dry_run: cli.dry_run,
    };
    let engine = PurgeEngine::new(&config, options);

    if !cli.dry_run && !is_running_as_root() {
        log.record(ActivityEvent::Notice {
            message: format!(
                "not running as root, removals under {} will likely fail",
                engine.root().display()
            ),
        });
    }

    let summary = engine.run(&mut log);
    log.flush();
    report_outcome(&summary, &log, cli.dry_run);

    Ok(())
}

/// Closing lines: a verbose summary, and a stderr note when any category
/// ran into trouble. Warnings never change the exit code.
fn report_outcome(summary: &RunSummary, log: &ActivityLog, dry_run: bool) {
    if log.is_verbose() {
        let verb = if dry_run { "would remove" } else { "removed" };
        println!(
            "Purge complete: {verb} {} directories, {} errors",
            summary.deleted_count(),
            summary.error_count()
        );
        if let Some(writer) = log.jsonl() {
            println!(
                "Activity log: {} ({} entries, {})",
                writer.path().display(),
                writer.lines_written(),
                writer.state()
            );
        }
    }
    if summary.has_warnings() {
        eprintln!(
            "advancepurge: completed with warnings, {} errors reported",
            log.error_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let mut argv = vec!["advancepurge"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(retain_known_args(argv))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn short_flags_parse() {
        let cli = Cli::try_parse_from(["advancepurge", "-l", "-v", "-n"]).unwrap();
        assert!(cli.local);
        assert!(cli.verbose);
        assert!(cli.dry_run);
        assert!(cli.config.is_none());
    }

    #[test]
    fn long_flags_parse() {
        let cli = Cli::try_parse_from([
            "advancepurge",
            "--local",
            "--verbose",
            "--config",
            "/tmp/a.conf",
            "--log-file",
            "/tmp/a.jsonl",
        ])
        .unwrap();
        assert!(cli.local);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/a.conf")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/a.jsonl")));
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let cli = parse(&["--frobnicate", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(!cli.local);
    }

    #[test]
    fn flags_after_an_unknown_flag_still_apply() {
        let cli = parse(&["--frobnicate", "-v", "-l"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.local);

        let cli = parse(&["-z", "--local", "-q", "--dry-run"]).unwrap();
        assert!(cli.local);
        assert!(cli.dry_run);
    }

    #[test]
    fn help_after_an_unknown_flag_displays_help() {
        for args in [&["-z", "--help"][..], &["--bogus", "-h"], &["-x", "-v", "-?"]] {
            let err = parse(args).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp, "{args:?}");
        }
    }

    #[test]
    fn version_after_an_unknown_flag_displays_version() {
        let err = parse(&["--bogus", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn short_clusters_keep_known_letters() {
        let cli = parse(&["-lzv"]).unwrap();
        assert!(cli.local);
        assert!(cli.verbose);
        assert!(!cli.dry_run);
    }

    #[test]
    fn option_values_survive_filtering() {
        let cli = parse(&["-x", "-c", "-odd.conf", "--bogus", "-v"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("-odd.conf")));
        assert!(cli.verbose);

        let cli = parse(&[
            "--config=/tmp/a.conf",
            "-c/tmp/b.conf",
            "--log-file",
            "/tmp/x",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/b.conf")));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn bare_words_and_repeats_are_tolerated() {
        let cli = parse(&["stray", "--unknown", "value", "-v", "-v", "--", "-l"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.local);
    }

    #[test]
    fn filtering_keeps_program_name_and_known_tokens() {
        let kept = retain_known_args(["advancepurge", "--bogus", "-l", "extra"]);
        assert_eq!(kept, vec![OsString::from("advancepurge"), OsString::from("-l")]);

        let kept = retain_known_args(["advancepurge", "-c", "-odd.conf", "--log-file", "x"]);
        assert_eq!(
            kept,
            vec![
                OsString::from("advancepurge"),
                OsString::from("-c-odd.conf"),
                OsString::from("--log-file=x"),
            ]
        );
    }

    #[test]
    fn help_aliases_display_help() {
        for flag in ["-h", "-?", "--help"] {
            let err = parse(&[flag]).unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp, "{flag}");
        }
    }

    #[test]
    fn exit_codes() {
        let open: CliError = PurgeError::ConfigOpen {
            path: PathBuf::from("/etc/advancepurge.conf"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
        .into();
        assert_eq!(open.exit_code(), 2);

        let parse: CliError = PurgeError::ConfigAlloc {
            details: "capacity overflow".to_string(),
        }
        .into();
        assert_eq!(parse.exit_code(), 3);
    }
}
