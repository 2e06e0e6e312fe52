//! Command-line interface for the harvester.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use roxmltree::Document;

use crate::config::{HarvestConfig, EXTRACT_DIR_NAME, TARGET_FILE_TYPE};
use crate::error::Result;
use crate::http::create_client;
use crate::index::resolve_download_link_from_file;
use crate::pipeline::{convert_local, run as run_pipeline, working_file};
use crate::publish::{ObjectStore, S3Store};
use crate::table::read_csv;
use crate::xml::pretty_print;

/// FIRDS Harvester - Download ESMA DLTINS instrument files and publish them as CSV.
#[derive(Parser)]
#[command(name = "firds-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: index, archive, CSV, upload.
    Run {
        /// Start of the publication window in YYYY-MM-DD format (default: 2021-01-17; alone, selects that day)
        #[arg(long)]
        from: Option<String>,

        /// End of the publication window in YYYY-MM-DD format (default: 2021-01-19; alone, selects that day)
        #[arg(long)]
        to: Option<String>,

        /// Directory for downloaded and generated files (default: FIRDS_WORK_DIR or .)
        #[arg(short, long)]
        work_dir: Option<PathBuf>,

        /// Target bucket (default: FIRDS_BUCKET or steel-eye-task)
        #[arg(short, long)]
        bucket: Option<String>,

        /// Bucket region (default: FIRDS_REGION or us-east-2)
        #[arg(short, long)]
        region: Option<String>,

        /// Write the CSV locally without uploading it
        #[arg(long)]
        skip_upload: bool,
    },

    /// Print the download link resolved from a local index file.
    Resolve {
        /// Path to the index XML (e.g. source.xml)
        index: PathBuf,

        /// File type to look for
        #[arg(short, long, default_value = TARGET_FILE_TYPE)]
        file_type: String,
    },

    /// Convert a local DLTINS XML file or zip archive to CSV.
    Extract {
        /// Working XML file or zip archive
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long, default_value = "data.csv")]
        output: PathBuf,
    },

    /// Print a local DLTINS XML file or zip archive as an indented tree.
    Show {
        /// Working XML file or zip archive
        input: PathBuf,
    },

    /// Show the row count and first rows of a generated CSV.
    Inspect {
        /// CSV file to read
        csv: PathBuf,

        /// Number of rows to show
        #[arg(short = 'n', long, default_value_t = 5)]
        rows: usize,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            from,
            to,
            work_dir,
            bucket,
            region,
            skip_upload,
        } => {
            let options = RunOptions {
                from,
                to,
                work_dir,
                bucket,
                region,
            };
            let config = options.apply(HarvestConfig::from_env()?)?;
            run_command(&config, skip_upload)
        }
        Commands::Resolve { index, file_type } => resolve_command(&index, &file_type),
        Commands::Extract { input, output } => extract_command(&input, &output),
        Commands::Show { input } => show_command(&input),
        Commands::Inspect { csv, rows } => inspect_command(&csv, rows),
    }
}

/// Overrides given on the `run` command line.
#[derive(Debug, Default)]
struct RunOptions {
    from: Option<String>,
    to: Option<String>,
    work_dir: Option<PathBuf>,
    bucket: Option<String>,
    region: Option<String>,
}

impl RunOptions {
    /// Apply the overrides on top of `config`.
    ///
    /// A single window bound selects that one day. Without either bound the
    /// configured index URL is left alone.
    fn apply(self, mut config: HarvestConfig) -> Result<HarvestConfig> {
        let window = match (self.from, self.to) {
            (Some(from), Some(to)) => Some((from, to)),
            (Some(day), None) | (None, Some(day)) => Some((day.clone(), day)),
            (None, None) => None,
        };
        if let Some((from, to)) = window {
            config = config.with_window(&from, &to)?;
        }
        if let Some(dir) = self.work_dir {
            config = config.with_work_dir(dir);
        }
        if let Some(bucket) = self.bucket {
            config = config.with_bucket(bucket);
        }
        if let Some(region) = self.region {
            config = config.with_region(region);
        }
        Ok(config)
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Execute the run command.
fn run_command(config: &HarvestConfig, skip_upload: bool) -> Result<()> {
    config.validate()?;

    println!(
        "{} {} files into {}",
        style("Harvesting").bold(),
        style(&config.file_type).cyan(),
        style(config.work_dir.display()).green()
    );
    println!();

    let client = create_client()?;
    let store = if skip_upload {
        None
    } else {
        Some(S3Store::connect(&config.region)?)
    };

    let pb = spinner();
    let result = run_pipeline(
        config,
        &client,
        store.as_ref().map(|s| s as &dyn ObjectStore),
        &mut |step| pb.set_message(step.describe()),
    );
    pb.finish_and_clear();
    let summary = result?;

    println!("  Link: {}", style(&summary.download_link).cyan());
    println!("  Data file: {}", summary.data_file.display());
    println!("  Instruments: {}", summary.row_count);
    println!();
    println!(
        "{} {}",
        style("Saved to:").green().bold(),
        summary.csv_path.display()
    );

    match summary.bucket_created {
        Some(created) => {
            if !created {
                println!(
                    "  {}",
                    style("Bucket was not created (it may already exist)").yellow()
                );
            }
            println!(
                "{} s3://{}/{}",
                style("Uploaded to:").green().bold(),
                config.bucket,
                config.object_key
            );
        }
        None => println!("  {}", style("Upload skipped").yellow()),
    }

    Ok(())
}

/// Execute the resolve command.
fn resolve_command(index: &Path, file_type: &str) -> Result<()> {
    let link = resolve_download_link_from_file(index, file_type)?;
    println!("{link}");
    Ok(())
}

/// Execute the extract command.
fn extract_command(input: &Path, output: &Path) -> Result<()> {
    let extract_dir = extract_dir_beside(output);

    let pb = spinner();
    pb.set_message("Extracting instruments...");
    let result = convert_local(input, output, &extract_dir);
    pb.finish_and_clear();
    let rows = result?;

    println!(
        "{} {} rows to {}",
        style("Wrote").green().bold(),
        rows,
        output.display()
    );
    Ok(())
}

/// `data/` next to `path`.
fn extract_dir_beside(path: &Path) -> PathBuf {
    path.parent()
        .map(|p| p.join(EXTRACT_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(EXTRACT_DIR_NAME))
}

/// Execute the show command.
fn show_command(input: &Path) -> Result<()> {
    let data_file = working_file(input, &extract_dir_beside(input))?;
    let xml = fs::read_to_string(&data_file)?;
    let doc = Document::parse(&xml)?;
    print!("{}", pretty_print(doc.root_element()));
    Ok(())
}

/// Execute the inspect command.
fn inspect_command(csv: &Path, rows: usize) -> Result<()> {
    let records = read_csv(csv)?;

    println!("  Rows: {}", style(records.len()).green());
    for record in records.iter().take(rows) {
        println!("  {}", record.to_row().join(" | "));
    }
    if records.len() > rows {
        println!("  {}", style(format!("... {} more", records.len() - rows)).dim());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::index_url;
    use crate::error::HarvesterError;

    #[test]
    fn test_cli_parse_run_defaults() {
        let cli = Cli::parse_from(["firds-harvester", "run"]);

        let Commands::Run {
            from,
            to,
            work_dir,
            bucket,
            region,
            skip_upload,
        } = cli.command
        else {
            panic!("expected run command");
        };
        assert!(from.is_none());
        assert!(to.is_none());
        assert!(work_dir.is_none());
        assert!(bucket.is_none());
        assert!(region.is_none());
        assert!(!skip_upload);
    }

    #[test]
    fn test_cli_parse_run_with_options() {
        let cli = Cli::parse_from([
            "firds-harvester",
            "run",
            "--from",
            "2021-02-01",
            "--bucket",
            "my-bucket",
            "--skip-upload",
        ]);

        let Commands::Run {
            from,
            bucket,
            skip_upload,
            ..
        } = cli.command
        else {
            panic!("expected run command");
        };
        assert_eq!(from, Some("2021-02-01".to_string()));
        assert_eq!(bucket, Some("my-bucket".to_string()));
        assert!(skip_upload);
    }

    #[test]
    fn test_cli_parse_resolve() {
        let cli = Cli::parse_from(["firds-harvester", "resolve", "source.xml"]);

        let Commands::Resolve { index, file_type } = cli.command else {
            panic!("expected resolve command");
        };
        assert_eq!(index, PathBuf::from("source.xml"));
        assert_eq!(file_type, "DLTINS");
    }

    #[test]
    fn test_cli_parse_extract() {
        let cli = Cli::parse_from(["firds-harvester", "extract", "zip_data.zip", "-o", "out.csv"]);

        let Commands::Extract { input, output } = cli.command else {
            panic!("expected extract command");
        };
        assert_eq!(input, PathBuf::from("zip_data.zip"));
        assert_eq!(output, PathBuf::from("out.csv"));
    }

    #[test]
    fn test_cli_parse_show() {
        let cli = Cli::parse_from(["firds-harvester", "show", "data/DLTINS_20210117_01of01.xml"]);

        let Commands::Show { input } = cli.command else {
            panic!("expected show command");
        };
        assert_eq!(input, PathBuf::from("data/DLTINS_20210117_01of01.xml"));
    }

    #[test]
    fn test_extract_dir_beside_input() {
        assert_eq!(
            extract_dir_beside(Path::new("work/zip_data.zip")),
            PathBuf::from("work/data")
        );
        assert_eq!(extract_dir_beside(Path::new("zip_data.zip")), PathBuf::from("data"));
    }

    #[test]
    fn test_cli_parse_inspect() {
        let cli = Cli::parse_from(["firds-harvester", "inspect", "data.csv", "-n", "10"]);

        let Commands::Inspect { csv, rows } = cli.command else {
            panic!("expected inspect command");
        };
        assert_eq!(csv, PathBuf::from("data.csv"));
        assert_eq!(rows, 10);
    }

    fn run_options(args: &[&str]) -> RunOptions {
        let cli = Cli::parse_from(["firds-harvester", "run"].iter().chain(args).copied());
        let Commands::Run {
            from,
            to,
            work_dir,
            bucket,
            region,
            ..
        } = cli.command
        else {
            panic!("expected run command");
        };
        RunOptions {
            from,
            to,
            work_dir,
            bucket,
            region,
        }
    }

    #[test]
    fn test_from_alone_selects_that_day() {
        let config = run_options(&["--from", "2021-02-01"])
            .apply(HarvestConfig::default())
            .unwrap();
        assert_eq!(config.index_url, index_url("2021-02-01", "2021-02-01"));
    }

    #[test]
    fn test_to_alone_selects_that_day() {
        let config = run_options(&["--to", "2020-12-31"])
            .apply(HarvestConfig::default())
            .unwrap();
        assert_eq!(config.index_url, index_url("2020-12-31", "2020-12-31"));
    }

    #[test]
    fn test_both_bounds_set_window() {
        let config = run_options(&["--from", "2021-02-01", "--to", "2021-02-03"])
            .apply(HarvestConfig::default())
            .unwrap();
        assert_eq!(config.index_url, index_url("2021-02-01", "2021-02-03"));
    }

    #[test]
    fn test_reversed_bounds_are_rejected() {
        let result = run_options(&["--from", "2021-02-03", "--to", "2021-02-01"])
            .apply(HarvestConfig::default());
        assert!(matches!(result, Err(HarvesterError::Config(_))));
    }

    #[test]
    fn test_no_bounds_keep_configured_url() {
        let base = HarvestConfig::default().with_index_url("http://localhost/select");
        let config = run_options(&["--bucket", "b", "--region", "eu-west-1", "-w", "out"])
            .apply(base)
            .unwrap();
        assert_eq!(config.index_url, "http://localhost/select");
        assert_eq!(config.bucket, "b");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.work_dir, PathBuf::from("out"));
    }
}
