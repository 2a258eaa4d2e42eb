//! Persisted best score and the append-only play log.
//!
//! The high-score file holds the player name on the first line and the
//! score on the second. A file with only a number on its first line is the
//! older format and is read with the default name.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::config::DEFAULT_PLAYER_NAME;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScore {
    pub name: String,
    pub score: u32,
}

impl Default for HighScore {
    fn default() -> Self {
        HighScore { name: DEFAULT_PLAYER_NAME.to_string(), score: 0 }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub trait ScoreStore {
    /// Never fails: unreadable or missing data yields the default record.
    fn load(&mut self) -> HighScore;

    fn save(&mut self, best: &HighScore) -> Result<(), StoreError>;

    fn append_log(&mut self, name: &str, score: u32) -> Result<(), StoreError>;
}

pub struct FileScoreStore {
    high_score_path: PathBuf,
    log_path: PathBuf,
}

impl FileScoreStore {
    pub fn new(high_score_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        FileScoreStore { high_score_path: high_score_path.into(), log_path: log_path.into() }
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&mut self) -> HighScore {
        match fs::read_to_string(&self.high_score_path) {
            Ok(contents) => parse_high_score(&contents),
            Err(_) => HighScore::default(),
        }
    }

    fn save(&mut self, best: &HighScore) -> Result<(), StoreError> {
        let contents = format!("{}\n{}\n", single_line(&best.name), best.score);
        fs::write(&self.high_score_path, contents)
            .map_err(|source| StoreError::Write { path: self.high_score_path.clone(), source })
    }

    fn append_log(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        let line = format!("{},{}\n", log_field(name), score);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|source| StoreError::Write { path: self.log_path.clone(), source })
    }
}

/// Keeps everything in memory. Used by tests and when nothing should touch
/// the disk.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    pub best: Option<HighScore>,
    pub log: Vec<(String, u32)>,
    pub saves: usize,
    pub fail_writes: bool,
}

impl ScoreStore for MemoryScoreStore {
    fn load(&mut self) -> HighScore {
        self.best.clone().unwrap_or_default()
    }

    fn save(&mut self, best: &HighScore) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(simulated_failure("memory:highscore"));
        }
        self.best = Some(best.clone());
        self.saves += 1;
        Ok(())
    }

    fn append_log(&mut self, name: &str, score: u32) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(simulated_failure("memory:log"));
        }
        self.log.push((name.to_string(), score));
        Ok(())
    }
}

fn simulated_failure(path: &str) -> StoreError {
    StoreError::Write {
        path: PathBuf::from(path),
        source: io::Error::new(io::ErrorKind::PermissionDenied, "writes disabled"),
    }
}

/// Reads either format. A file holding nothing but one integer is the older
/// format. Otherwise the first line is the name and the score is the first
/// number on the following lines; no number means zero.
pub fn parse_high_score(contents: &str) -> HighScore {
    let mut lines = contents.lines().map(str::trim);

    let first = match lines.next() {
        Some(line) => line,
        None => return HighScore::default(),
    };
    let only_line = lines.clone().all(str::is_empty);
    if only_line {
        if let Ok(score) = first.parse::<u32>() {
            return HighScore { name: DEFAULT_PLAYER_NAME.to_string(), score };
        }
    }

    let name = if first.is_empty() { DEFAULT_PLAYER_NAME.to_string() } else { first.to_string() };
    let score = lines
        .flat_map(str::split_whitespace)
        .find_map(|token| token.parse::<u32>().ok())
        .unwrap_or(0);
    HighScore { name, score }
}

/// Name as stored in the high-score file, where it must fit on one line.
fn single_line(name: &str) -> String {
    cleaned_name(name, |c| c == '\n' || c == '\r')
}

/// Name as stored in the `name,score` log.
fn log_field(name: &str) -> String {
    cleaned_name(name, |c| c == ',' || c.is_control())
}

fn cleaned_name(name: &str, replace: impl Fn(char) -> bool) -> String {
    let cleaned: String = name.chars().map(|c| if replace(c) { ' ' } else { c }).collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
