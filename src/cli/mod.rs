// CLI module - Feed, inspect and tail rotating log files

mod output;

use crate::config::{FileSinkConfig, LineFormat, LoggerConfig};
use crate::error::{LogError, Result};
use crate::logs::{
    backup_chain, read_logs, Dispatcher, Level, LogReadOptions, DEFAULT_MAX_BACKUPS,
    DEFAULT_MAX_LOG_SIZE,
};
use clap::{Parser, Subcommand, ValueEnum};
use output::ChainFile;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// rotalog - Size-rotated log files from the command line
#[derive(Parser)]
#[command(name = "rotalog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy stdin lines into a rotating log file
    Pipe {
        /// Base log file path (overrides the config file)
        path: Option<PathBuf>,

        /// Load logger settings from a .toml or .json file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum file size in bytes before rotation
        #[arg(short = 's', long)]
        max_size: Option<u64>,

        /// Number of backups to keep
        #[arg(short, long)]
        backups: Option<usize>,

        /// Minimum level written to the file
        #[arg(short, long)]
        threshold: Option<Level>,

        /// Level assigned to every input line
        #[arg(short, long, default_value = "INFO")]
        level: Level,

        /// Component name recorded on every line
        #[arg(long)]
        component: Option<String>,

        /// Line layout
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Print the last lines of a log and its backups
    Tail {
        /// Base log file path
        path: PathBuf,

        /// Number of lines to display
        #[arg(short = 'n', long, default_value = "20")]
        lines: usize,

        /// Only read the current file, not the backups
        #[arg(long)]
        current_only: bool,

        /// Only show lines containing this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show the files of a backup chain
    Status {
        /// Base log file path
        path: PathBuf,

        /// Rotation size to report alongside the chain
        #[arg(short = 's', long)]
        max_size: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Full,
    Message,
}

impl From<FormatArg> for LineFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Full => LineFormat::Full,
            FormatArg::Message => LineFormat::Message,
        }
    }
}

impl Cli {
    /// Run the CLI application
    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        cli.execute()
    }

    /// Execute the parsed command
    fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Pipe {
                path,
                config,
                max_size,
                backups,
                threshold,
                level,
                component,
                format,
            } => {
                let mut logger_config = match config {
                    Some(config_path) => LoggerConfig::from_file(config_path)?,
                    None => LoggerConfig::default(),
                };

                if let Some(component) = component {
                    logger_config.component = component.clone();
                }
                if let Some(threshold) = threshold {
                    logger_config.level = *threshold;
                }

                let mut file = match (logger_config.file.take(), path) {
                    (Some(mut file), Some(path)) => {
                        file.path = path.clone();
                        file
                    }
                    (Some(file), None) => file,
                    (None, Some(path)) => FileSinkConfig {
                        path: path.clone(),
                        max_size: DEFAULT_MAX_LOG_SIZE,
                        max_backups: DEFAULT_MAX_BACKUPS,
                        format: LineFormat::default(),
                    },
                    (None, None) => {
                        return Err(LogError::MissingConfigField(
                            "path (argument or [file] section)".to_string(),
                        ))
                    }
                };

                if let Some(max_size) = max_size {
                    file.max_size = *max_size;
                }
                if let Some(backups) = backups {
                    file.max_backups = *backups;
                }
                if let Some(format) = format {
                    file.format = (*format).into();
                }
                logger_config.file = Some(file);

                pipe_stdin(&logger_config, *level)
            }

            Commands::Tail {
                path,
                lines,
                current_only,
                filter,
            } => {
                let options = LogReadOptions {
                    lines: *lines,
                    include_backups: !current_only,
                    filter: filter.clone(),
                };
                let entries = read_logs(path, &options)?;
                output::print_logs(&entries);
                Ok(())
            }

            Commands::Status { path, max_size } => {
                let files = chain_files(path)?;
                output::print_chain_table(path, &files, *max_size);
                Ok(())
            }
        }
    }
}

/// Dispatch every stdin line through a configured logger
fn pipe_stdin(config: &LoggerConfig, level: Level) -> Result<()> {
    let (dispatcher, sink) = config.build()?;

    let stdin = io::stdin();
    let count = pipe_lines(stdin.lock(), &dispatcher, level)?;

    if let Some(sink) = sink {
        output::print_success_msg(&format!(
            "{} line(s) read, {} bytes in {}",
            count,
            sink.current_size(),
            sink.path().display()
        ));
    }

    Ok(())
}

/// Log each input line; invalid UTF-8 is replaced rather than rejected
fn pipe_lines<R: BufRead>(mut reader: R, dispatcher: &Dispatcher, level: Level) -> Result<u32> {
    let mut buf = Vec::new();
    let mut count: u32 = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        count = count.saturating_add(1);
        dispatcher.log(level, "stdin", count, String::from_utf8_lossy(&buf));
    }

    Ok(count)
}

/// Collect size and modification time of every file in a chain
fn chain_files(base: &Path) -> Result<Vec<ChainFile>> {
    backup_chain(base)
        .into_iter()
        .map(|path| -> Result<ChainFile> {
            let metadata = std::fs::metadata(&path)?;
            Ok(ChainFile {
                size: metadata.len(),
                modified: metadata.modified().ok(),
                path,
            })
        })
        .collect()
}

/// Report a command failure the way the CLI prints errors
pub fn report_error(error: &LogError) {
    output::print_error(&error.to_string());
}
