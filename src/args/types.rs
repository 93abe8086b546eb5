use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatabaseType {
    /// Keep everything in process memory; lost on exit.
    Memory,
    Sqlite,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Live match-play scoring for team golf events.", long_about = None)]
pub struct Args {
    /// Storage backend: memory or sqlite
    #[arg(
        short = 'd',
        long,
        value_name = "DATABASE_TYPE",
        value_enum,
        default_value = "sqlite"
    )]
    pub db_type: DatabaseType,
    /// For sqlite, the database filename. Ignored for memory.
    #[arg(short = 'n', long, value_name = "DATABASE_NAME")]
    pub db_name: Option<PathBuf>,
    #[arg(long, value_name = "BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind: String,
    #[arg(short = 'p', long, value_name = "PORT", default_value_t = 8081)]
    pub port: u16,
    /// Tournament fixture loaded into storage on startup.
    #[arg(
        long,
        value_name = "SEED_JSON",
        value_parser = crate::args::validation::check_readable_file_and_json
    )]
    pub seed_json: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub db_type: DatabaseType,
    pub db_name: Option<PathBuf>,
    pub bind: String,
    pub port: u16,
    pub seed_json: Option<Value>,
}

impl From<Args> for CleanArgs {
    fn from(args: Args) -> Self {
        Self {
            db_type: args.db_type,
            db_name: args.db_name,
            bind: args.bind,
            port: args.port,
            seed_json: args.seed_json,
        }
    }
}
