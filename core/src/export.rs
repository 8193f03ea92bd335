//! Standings as comma-separated text.
//!
//! Fields are joined verbatim: a comma inside a player name is not quoted
//! and will split that row into an extra column.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use log::info;

use crate::game_states::GameSession;

pub const HEADER: [&str; 4] = ["Name", "Verloren", "Durchmarsch", "Gesamt"];

/// A rendered export, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub contents: String,
}

impl CsvExport {
    pub fn new<Tz: TimeZone>(session: &GameSession, prefix: &str, at: &DateTime<Tz>) -> Self {
        Self {
            file_name: file_name(prefix, at),
            contents: to_csv(session),
        }
    }

    /// Write the export into `dir`, returning the path of the new file.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> io::Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        fs::write(&path, &self.contents)?;
        info!("exported standings to {}", path.display());
        Ok(path)
    }
}

/// One header row followed by one row per player, joined with newlines.
pub fn to_csv(session: &GameSession) -> String {
    let mut rows = vec![HEADER.join(",")];
    for (p, total) in session.standings() {
        rows.push(format!(
            "{},{},{},{}",
            p.name(),
            p.verloren(),
            p.durchmarsch(),
            total
        ));
    }
    rows.join("\n")
}

/// `<prefix><UTC timestamp>.csv`, with dashes instead of colons in the time.
pub fn file_name<Tz: TimeZone>(prefix: &str, at: &DateTime<Tz>) -> String {
    format!(
        "{}{}.csv",
        prefix,
        at.with_timezone(&Utc).format("%Y-%m-%dT%H-%M-%S%.3fZ")
    )
}
