#![deny(unsafe_code)]

//! src/bin/streamlog.rs
//!
//! Runs a command with its output routed through named diagnostic streams.
//! The child's standard output is emitted on `app` and `test` at INFO, its
//! standard error at WARNING, and everything logged before the command line
//! was understood is replayed once routing is known.

use std::ffi::OsString;
use std::io;
use std::process::{self, Command as ChildCommand, Stdio};
use std::thread;

use clap::{Arg, ArgAction, ArgMatches, Command};
use logging::{BuiltinStream, ExitCode, Severity, StreamSetAlias};
use routing::{Router, RouterOptions, init_tracing, init_tracing_with_filter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PROGRAM_NAME: &str = "streamlog";
/// Optional `tracing` filter directives for events bridged into the router.
const FILTER_ENV: &str = "STREAMLOG_FILTER";

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run a command with its output routed through named diagnostic streams.")
        .arg(
            Arg::new("show")
                .long("show")
                .value_name("STREAM[:LEVEL]")
                .help("Show STREAM (repeatable). Use --list-streams for the built-in names.")
                .value_delimiter(',')
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("paginator")
                .long("paginator")
                .value_name("on|off")
                .help("Send output through a pager on colour terminals.")
                .value_parser(["on", "off"])
                .default_value("off"),
        )
        .arg(
            Arg::new("silent")
                .long("silent")
                .help("Suppress all output.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("show-job-log")
                .long("show-job-log")
                .help("Show only the test stream.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Never colour output.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-streams")
                .long("list-streams")
                .help("List built-in streams and aliases, then exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("command")
                .value_name("COMMAND")
                .help("Command to run, with its arguments.")
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .value_parser(clap::value_parser!(OsString)),
        )
}

fn router_options(matches: &ArgMatches) -> RouterOptions {
    RouterOptions {
        enabled: matches
            .get_many::<String>("show")
            .map(|values| values.cloned().collect()),
        paginated: matches
            .get_one::<String>("paginator")
            .is_some_and(|value| value == "on"),
        show_only_test_output: matches.get_flag("show-job-log"),
        silent: matches.get_flag("silent"),
        colored: !matches.get_flag("no-color"),
    }
}

fn list_streams(router: &Router) {
    let app = router.logger(BuiltinStream::App.route_key());
    app.info("Built in streams:");
    for stream in BuiltinStream::ALL {
        app.info(format!("    {:<8} {}", stream.name(), stream.description()));
    }
    app.info("");
    app.info("Stream aliases:");
    for alias in StreamSetAlias::ALL {
        app.info(format!("    {:<8} {}", alias.name(), alias.description()));
    }
}

fn run_command(router: &Router, argv: &[OsString]) -> ExitCode {
    let app = router.logger(BuiltinStream::App.route_key());
    let Some((program, args)) = argv.split_first() else {
        return ExitCode::AllOk;
    };
    debug!(target: "app::debug", program = ?program, "starting command");

    let spawned = ChildCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(error) => {
            app.error(format!("failed to run {}: {error}", program.to_string_lossy()));
            return ExitCode::JobFail;
        }
    };

    let streams = [BuiltinStream::App.route_key(), BuiltinStream::Test.route_key()];
    let mut pumps = Vec::new();
    if let Some(mut stdout) = child.stdout.take() {
        let mut writer = router.line_writer("", Severity::INFO, &streams);
        pumps.push(thread::spawn(move || io::copy(&mut stdout, &mut writer)));
    }
    if let Some(mut stderr) = child.stderr.take() {
        let mut writer = router.line_writer("", Severity::WARNING, &streams);
        pumps.push(thread::spawn(move || io::copy(&mut stderr, &mut writer)));
    }
    for pump in pumps {
        match pump.join() {
            Ok(Ok(_)) => {}
            Ok(Err(error)) => debug!(target: "app::debug", %error, "reading command output failed"),
            Err(_) => debug!(target: "app::debug", "output reader panicked"),
        }
    }

    match child.wait() {
        Ok(status) if status.success() => ExitCode::AllOk,
        Ok(status) => {
            debug!(target: "app::debug", %status, "command failed");
            ExitCode::TestsFail
        }
        Err(error) => {
            app.error(format!("failed to wait for {}: {error}", program.to_string_lossy()));
            ExitCode::JobFail
        }
    }
}

fn run<I, T>(router: &Router, args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let early = router.logger(BuiltinStream::Early.route_key());
    early.debug(format!("{PROGRAM_NAME} {} starting", env!("CARGO_PKG_VERSION")));

    let matches = match clap_command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(error) => {
            router.enable_direct_output();
            if let Err(print_error) = error.print() {
                debug!(target: "app::debug", error = %print_error, "usage message not written");
            }
            return if error.use_stderr() {
                ExitCode::Fail
            } else {
                ExitCode::AllOk
            };
        }
    };

    let options = router_options(&matches);
    early.debug(format!("routing options: {options:?}"));
    if let Err(error) = router.finalize(&options) {
        router.enable_direct_output();
        if let Err(write_error) = router.err().write_str(&format!("{PROGRAM_NAME}: {error}\n")) {
            debug!(target: "app::debug", error = %write_error, "configuration error not written");
        }
        return error.exit_code();
    }

    if matches.get_flag("list-streams") {
        list_streams(router);
        return ExitCode::AllOk;
    }

    let argv: Vec<OsString> = matches
        .get_many::<OsString>("command")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    run_command(router, &argv)
}

fn main() -> process::ExitCode {
    let router = Router::from_env();
    let installed = match EnvFilter::try_from_env(FILTER_ENV) {
        Ok(filter) => init_tracing_with_filter(router.clone(), filter),
        Err(_) => init_tracing(router.clone()),
    };
    if let Err(error) = installed {
        debug!(%error, "tracing bridge not installed");
    }

    let code = run(&router, std::env::args_os());
    router.shutdown();
    code.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> RouterOptions {
        let matches = clap_command()
            .try_get_matches_from(std::iter::once(PROGRAM_NAME).chain(args.iter().copied()))
            .unwrap();
        router_options(&matches)
    }

    #[test]
    fn defaults_leave_selection_unset() {
        let options = parse(&[]);
        assert_eq!(options.enabled, None);
        assert!(!options.paginated);
        assert!(options.colored);
    }

    #[test]
    fn show_accumulates_and_splits_on_commas() {
        let options = parse(&["--show", "app,remote", "--show", "db:info"]);
        assert_eq!(
            options.enabled,
            Some(vec!["app".to_owned(), "remote".to_owned(), "db:info".to_owned()])
        );
    }

    #[test]
    fn flags_map_to_options() {
        let options = parse(&[
            "--paginator",
            "on",
            "--silent",
            "--show-job-log",
            "--no-color",
        ]);
        assert!(options.paginated);
        assert!(options.silent);
        assert!(options.show_only_test_output);
        assert!(!options.colored);
    }

    #[test]
    fn trailing_command_keeps_its_flags() {
        let matches = clap_command()
            .try_get_matches_from([PROGRAM_NAME, "--silent", "sh", "-c", "echo --show"])
            .unwrap();
        let argv: Vec<&OsString> = matches.get_many::<OsString>("command").unwrap().collect();
        assert_eq!(argv, ["sh", "-c", "echo --show"]);
    }
}
