use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};

/// Comparisons allowed before an email has to be on file.
pub const FREE_ANALYSES: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Open,
    /// A new email was supplied and should be stored and forwarded before continuing.
    Capture(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateState {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub analysis_count: u32,
}

impl GateState {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(GateState::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Removes the persisted state. A missing file is not an error.
    pub fn reset(path: impl AsRef<Path>) -> Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn has_email(&self) -> bool {
        self.email.is_some()
    }

    pub fn check(&self, email: Option<&str>) -> Result<GateDecision> {
        if self.analysis_count < FREE_ANALYSES || self.has_email() {
            return Ok(GateDecision::Open);
        }

        match email.map(str::trim) {
            Some(email) if !email.is_empty() => Ok(GateDecision::Capture(email.to_string())),
            _ => Err(BenchError::EmailRequired),
        }
    }

    pub fn record_email(&mut self, email: String) {
        self.email = Some(email);
    }

    pub fn record_analysis(&mut self) -> u32 {
        self.analysis_count += 1;
        self.analysis_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_analysis_is_free() {
        let state = GateState::default();
        assert_eq!(state.check(None).unwrap(), GateDecision::Open);
    }

    #[test]
    fn second_analysis_needs_email() {
        let state = GateState {
            email: None,
            analysis_count: 1,
        };
        assert!(matches!(state.check(None), Err(BenchError::EmailRequired)));
        assert!(matches!(state.check(Some("   ")), Err(BenchError::EmailRequired)));
        assert_eq!(
            state.check(Some(" a@b.co ")).unwrap(),
            GateDecision::Capture("a@b.co".to_string())
        );
    }

    #[test]
    fn stored_email_keeps_gate_open() {
        let mut state = GateState::default();
        state.record_analysis();
        state.record_email("a@b.co".to_string());
        assert_eq!(state.record_analysis(), 2);
        assert_eq!(state.check(None).unwrap(), GateDecision::Open);
    }

    #[test]
    fn persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        assert_eq!(GateState::load(&path).unwrap(), GateState::default());

        let mut state = GateState::default();
        state.record_analysis();
        state.record_email("a@b.co".to_string());
        state.save(&path).unwrap();

        assert_eq!(GateState::load(&path).unwrap(), state);

        GateState::reset(&path).unwrap();
        GateState::reset(&path).unwrap();
        assert_eq!(GateState::load(&path).unwrap(), GateState::default());
    }

    #[test]
    fn corrupt_state_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(GateState::load(&path), Err(BenchError::Json(_))));
    }
}
