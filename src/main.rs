use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use regionswap::config::{ConfigLoader, JobConfig};
use regionswap::file::{rewrite_file, ReplacementOutcome};
use regionswap::utils::expand_tilde;
use regionswap::RegionError;

/// Replace the region of a file that starts at a pattern and ends at a marker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to rewrite
    path: Option<PathBuf>,

    /// Start anchor, a regular expression
    #[arg(short, long)]
    start: Option<String>,

    /// Match --start as literal text instead of a regular expression
    #[arg(long, overrides_with = "no_literal_start")]
    literal_start: bool,

    /// Match --start as a regular expression, even if the job file says literal
    #[arg(long, overrides_with = "literal_start")]
    no_literal_start: bool,

    /// End marker; the region ends after its first occurrence
    #[arg(short, long, allow_hyphen_values = true)]
    end: Option<String>,

    /// Replacement payload given inline
    #[arg(short, long, conflicts_with = "replacement_file", allow_hyphen_values = true)]
    replacement: Option<String>,

    /// File holding the replacement payload ('-' for stdin)
    #[arg(short = 'f', long)]
    replacement_file: Option<PathBuf>,

    /// TOML job file; flags given here override its values
    #[arg(short, long)]
    job: Option<PathBuf>,

    /// Write through a temporary file and rename it into place
    #[arg(long, overrides_with = "no_atomic")]
    atomic: bool,

    /// Overwrite in place, even if the job file asks for an atomic write
    #[arg(long, overrides_with = "atomic")]
    no_atomic: bool,

    /// Keep a timestamped copy of the original next to it
    #[arg(long, overrides_with = "no_backup")]
    backup: bool,

    /// Skip the backup, even if the job file asks for one
    #[arg(long, overrides_with = "backup")]
    no_backup: bool,

    /// Print the diff and leave the file untouched
    #[arg(short = 'n', long, overrides_with = "no_dry_run")]
    dry_run: bool,

    /// Write the file, even if the job file asks for a dry run
    #[arg(long, overrides_with = "dry_run")]
    no_dry_run: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> JobConfig {
        JobConfig {
            path: self.path.as_ref().map(expand_tilde),
            start: self.start.clone(),
            end: self.end.clone(),
            replacement: self.replacement.clone(),
            replacement_file: self.replacement_file.as_ref().map(expand_tilde),
            literal_start: switch(self.literal_start, self.no_literal_start),
            atomic: switch(self.atomic, self.no_atomic),
            backup: switch(self.backup, self.no_backup),
            dry_run: switch(self.dry_run, self.no_dry_run),
        }
    }
}

/// A `--flag`/`--no-flag` pair; neither given leaves the job file's value
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

fn run(cli: &Cli) -> Result<()> {
    let base = match &cli.job {
        Some(job) => {
            let loader = ConfigLoader::with_path(expand_tilde(job));
            loader
                .load()
                .with_context(|| format!("Failed to load job file {}", loader.path().display()))?
        }
        None => JobConfig::default(),
    };

    let request = base
        .merge(cli.overrides())
        .into_request()
        .context("Invalid rewrite job")?;
    info!(
        "Rewriting {} (start `{}`, end `{}`)",
        request.path.display(),
        request.anchor,
        request.end_marker
    );

    let outcome = rewrite_file(&request)
        .with_context(|| format!("Failed to rewrite {}", request.path.display()))?;

    report(&outcome, cli.json)
}

fn report(outcome: &ReplacementOutcome, json: bool) -> Result<()> {
    if json {
        let rendered =
            serde_json::to_string_pretty(outcome).context("Failed to serialize outcome")?;
        println!("{}", rendered);
        return Ok(());
    }

    if let Some(diff) = &outcome.diff {
        print!("{}", diff);
    }

    let action = if outcome.written {
        "replaced"
    } else if outcome.diff.is_some() {
        "would replace"
    } else {
        "unchanged"
    };
    eprintln!(
        "{}: {} lines {}-{} ({})",
        outcome.path.display(),
        action,
        outcome.region.start_line,
        outcome.region.end_line,
        outcome.summary
    );
    if let Some(backup) = &outcome.backup {
        eprintln!("backup: {}", backup.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = regionswap::init_with_logger(cli.verbose) {
        eprintln!("Warning: {:#}", e);
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if err
                .downcast_ref::<RegionError>()
                .is_some_and(RegionError::is_region_missing)
            {
                error!("Region not located, no file was modified");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_flags_become_overrides() {
        let cli = Cli::parse_from([
            "regionswap",
            "create.tsx",
            "--start",
            "<form>",
            "--end",
            "</form>",
            "-f",
            "-",
            "--atomic",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.path, Some(PathBuf::from("create.tsx")));
        assert_eq!(overrides.replacement_file, Some(PathBuf::from("-")));
        assert_eq!(overrides.atomic, Some(true));
        assert_eq!(overrides.backup, None);
        assert_eq!(overrides.literal_start, None);
    }

    #[test]
    fn test_inline_and_file_payload_conflict() {
        let result = Cli::try_parse_from([
            "regionswap",
            "create.tsx",
            "-r",
            "x",
            "-f",
            "payload.tsx",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_flags_switch_job_settings_off() {
        let cli = Cli::parse_from(["regionswap", "--no-backup", "--no-literal-start"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.backup, Some(false));
        assert_eq!(overrides.literal_start, Some(false));
        assert_eq!(overrides.atomic, None);

        // last one wins
        let cli = Cli::parse_from(["regionswap", "--no-atomic", "--atomic"]);
        assert_eq!(cli.overrides().atomic, Some(true));
    }

    #[test]
    fn test_run_replaces_region() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "A<form>X</form>B").unwrap();

        let cli = Cli::parse_from([
            "regionswap",
            path.to_str().unwrap(),
            "-s",
            "<form>",
            "-e",
            "</form>",
            "-r",
            "<form>Y</form>",
        ]);
        run(&cli).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "A<form>Y</form>B");
    }

    #[test]
    fn test_run_missing_end_fails_and_leaves_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "A<form>X").unwrap();

        let cli = Cli::parse_from([
            "regionswap",
            path.to_str().unwrap(),
            "-s",
            "<form>",
            "-e",
            "</form>",
            "-r",
            "<form>Y</form>",
        ]);
        let err = run(&cli).unwrap_err();

        assert!(format!("{:#}", err).contains("End marker not found"));
        assert!(matches!(
            err.downcast_ref::<RegionError>(),
            Some(RegionError::EndNotFound { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "A<form>X");
    }

    #[test]
    fn test_run_missing_start_fails_and_leaves_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "AXB").unwrap();

        let cli = Cli::parse_from([
            "regionswap",
            path.to_str().unwrap(),
            "-s",
            "<form>",
            "-e",
            "</form>",
            "-r",
            "<form>Y</form>",
        ]);
        let err = run(&cli).unwrap_err();

        assert!(format!("{:#}", err).contains("Start anchor not found"));
        assert!(err
            .downcast_ref::<RegionError>()
            .is_some_and(RegionError::is_region_missing));
        assert_eq!(fs::read_to_string(&path).unwrap(), "AXB");
    }

    #[test]
    fn test_run_job_file_with_cli_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("create.tsx");
        fs::write(&path, "A<form>X</form>B").unwrap();
        let job = dir.path().join("job.toml");
        fs::write(
            &job,
            r#"
path = "create.tsx"
start = "<form>"
end = "</form>"
replacement = "<form>JOB</form>"
backup = true
"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "regionswap",
            "-j",
            job.to_str().unwrap(),
            "-r",
            "<form>CLI</form>",
            "--no-backup",
        ]);
        run(&cli).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "A<form>CLI</form>B");
        // only create.tsx and job.toml, no backup
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
