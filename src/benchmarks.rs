use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{BenchError, Result};
use crate::stats::PercentileStats;

/// States without enough data to publish a benchmark.
pub const EXCLUDED_STATES: [&str; 2] = ["WV", "DC"];

const STATE_NAMES: [(&str, &str); 51] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Display name for a state code, or the code itself when it is not a known state.
pub fn state_name(code: &str) -> &str {
    STATE_NAMES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// States a user may pick, sorted by display name.
pub fn selectable_states() -> Vec<(&'static str, &'static str)> {
    let mut states: Vec<_> = STATE_NAMES
        .iter()
        .copied()
        .filter(|(code, _)| !EXCLUDED_STATES.contains(code))
        .collect();
    states.sort_by(|a, b| a.1.cmp(b.1));
    states
}

/// Normalizes a user-supplied state code and checks that it can be selected.
pub fn parse_state(input: &str) -> Result<&'static str> {
    let code = input.trim().to_ascii_uppercase();
    STATE_NAMES
        .iter()
        .map(|(c, _)| *c)
        .find(|c| *c == code && !EXCLUDED_STATES.contains(c))
        .ok_or_else(|| BenchError::UnknownState(input.trim().to_string()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeBenchmark {
    pub description: String,
    #[serde(default)]
    pub percentiles: BTreeMap<String, PercentileStats>,
}

pub enum Lookup<'a> {
    Found(&'a PercentileStats),
    /// The code exists but no statistics were published for the state.
    Unavailable,
}

/// Benchmark statistics keyed by billing code, then by state.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct BenchmarkTable {
    codes: BTreeMap<String, CodeBenchmark>,
}

impl BenchmarkTable {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn code(&self, code: &str) -> Option<&CodeBenchmark> {
        self.codes.get(code.trim())
    }

    pub fn codes(&self) -> impl Iterator<Item = (&str, &CodeBenchmark)> {
        self.codes.iter().map(|(code, bench)| (code.as_str(), bench))
    }

    pub fn lookup(&self, code: &str, state: &str) -> Result<Lookup<'_>> {
        let bench = self
            .code(code)
            .ok_or_else(|| BenchError::UnknownCode(code.trim().to_string()))?;

        Ok(match bench.percentiles.get(state) {
            Some(stats) => Lookup::Found(stats),
            None => Lookup::Unavailable,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "97153": {
            "description": "Adaptive Behavior Treatment by Protocol (Direct 1:1) (per 15 min)",
            "percentiles": {
                "CA": {"p5": 12.5, "p10": 14.0, "p25": 16.0, "p50": 18.0, "p75": 21.0, "p90": 25.0, "p95": 28.0},
                "TX": {"p5": 10.0, "p10": 11.0, "p25": 13.0, "p50": 15.5, "p75": 18.0, "p90": 22.0, "p95": 24.0}
            }
        },
        "97151": {
            "description": "Behavior Identification Assessment (per 15 min)",
            "percentiles": {}
        }
    }"#;

    #[test]
    fn lookup_found_and_unavailable() {
        let table = BenchmarkTable::from_json(TABLE).unwrap();

        match table.lookup("97153", "TX").unwrap() {
            Lookup::Found(stats) => assert_eq!(stats.p50, 15.5),
            Lookup::Unavailable => panic!("expected stats for TX"),
        }
        assert!(matches!(
            table.lookup("97151", "CA").unwrap(),
            Lookup::Unavailable
        ));
        assert!(matches!(
            table.lookup("99999", "CA"),
            Err(BenchError::UnknownCode(code)) if code == "99999"
        ));
    }

    #[test]
    fn codes_are_sorted() {
        let table = BenchmarkTable::from_json(TABLE).unwrap();
        let codes: Vec<&str> = table.codes().map(|(code, _)| code).collect();
        assert_eq!(codes, vec!["97151", "97153"]);
    }

    #[test]
    fn rejects_malformed_table() {
        let err = BenchmarkTable::from_json(r#"{"97153": {"percentiles": {}}}"#).unwrap_err();
        assert!(matches!(err, BenchError::Json(_)));
    }

    #[test]
    fn excluded_states_are_not_selectable() {
        let states = selectable_states();
        assert_eq!(states.len(), 49);
        assert!(states.iter().all(|(code, _)| *code != "WV" && *code != "DC"));
        assert_eq!(states.first().map(|s| s.1), Some("Alabama"));
        assert_eq!(states.last().map(|s| s.1), Some("Wyoming"));

        assert_eq!(parse_state(" tx ").unwrap(), "TX");
        assert!(matches!(parse_state("WV"), Err(BenchError::UnknownState(_))));
        assert!(matches!(parse_state("ZZ"), Err(BenchError::UnknownState(_))));
    }

    #[test]
    fn state_names_fall_back_to_code() {
        assert_eq!(state_name("NY"), "New York");
        assert_eq!(state_name("PR"), "PR");
    }
}
