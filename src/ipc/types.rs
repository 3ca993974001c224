use std::path::PathBuf;

use crate::roster::RosterStore;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub roster: RosterStore,
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(export_dir: PathBuf) -> Self {
        Self {
            roster: RosterStore::new(),
            export_dir,
        }
    }
}
