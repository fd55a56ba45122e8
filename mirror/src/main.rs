//! Modpack mirror CLI entrypoint.
//!
//! Resolves configuration, mirrors the catalog into the target directory,
//! and exits non-zero when the run or any artifact failed.

use clap::Parser;
use modpack_mirror::cli::Cli;
use modpack_mirror::error::Result;
use modpack_mirror::output::{DryRunInfo, Reporter, write_stderr_line};
use modpack_mirror::pipeline::{require_success, run_mirror};
use modpack_mirror::transfer::HttpClient;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let config = cli.resolve_config()?;

    // Dry-run mode: show the effective settings without side effects
    if cli.dry_run {
        let info = DryRunInfo {
            config: &config,
            config_file: cli.config.as_deref(),
            quiet: cli.quiet,
        };
        write_stderr_line(stderr, info.display_text());
        return Ok(());
    }

    let client = HttpClient::new(config.request_timeout());
    let mut reporter = Reporter::new(stderr, cli.quiet);
    let stats = run_mirror(&config, &client, &mut reporter)?;
    require_success(stats)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}
