use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "marksheetd")]
#[command(about = "Gradesheet sidecar: JSON requests on stdin, JSON responses on stdout", long_about = None)]
#[command(version)]
pub struct Config {
    /// Directory exported workbooks are written to when a request names none
    #[arg(long, env = "MARKSHEETD_EXPORT_DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Log filter (tracing env-filter syntax); logs go to stderr
    #[arg(long, env = "MARKSHEETD_LOG", default_value = "warn")]
    pub log: String,
}

impl Config {
    pub fn load() -> Self {
        Config::parse()
    }
}
