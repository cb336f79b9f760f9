// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pipeline stage model and checklist rendering.
//!
//! Each stage carries its own embed color and its position in the fixed
//! five-entry pipeline checklist shown in the top-level message. The set of
//! stages is closed: an unknown stage name fails at parse time instead of
//! reaching a default branch somewhere downstream.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Marker for a checklist entry whose stage has already finished.
pub const COMPLETE_MARKER: &str = "✅";

/// Marker for a checklist entry whose stage has not started yet.
pub const WAITING_MARKER: &str = "⏳";

/// Decoration wrapped around status text when a stage failed.
pub const FAIL_MARKER: &str = "❌";

/// Embed colors, 0xRRGGBB.
pub mod colors {
    /// Error state (#CC1111)
    pub const RED: u32 = 0xCC1111;
    /// Skipped/canceled state (#888888)
    pub const GREY: u32 = 0x888888;
    /// Base tests (#FC0FF8)
    pub const PINK: u32 = 0xFC0FF8;
    /// Compile & build (#18D6E0)
    pub const CYAN: u32 = 0x18D6E0;
    /// End-to-end tests (#E0CF18)
    pub const YELLOW: u32 = 0xE0CF18;
    /// Final build / re-tag (#0088FF)
    pub const DARK_BLUE: u32 = 0x0088FF;
    /// Deploy (#763E99)
    pub const PURPLE: u32 = 0x763E99;
    /// Pipeline complete (#66FF00)
    pub const GREEN: u32 = 0x66FF00;
}

/// Checklist labels shown in the top-level embed, in pipeline order.
pub const CHECKLIST_LABELS: [&str; 5] = [
    "Base Tests",
    "Compile & Build",
    "End 2 End",
    "Re-Tag",
    "Deploy",
];

/// A named phase of the CI pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Test,
    Build,
    E2e,
    FinalBuild,
    Deploy,
    Complete,
}

impl Stage {
    /// Embed color for this stage's notifications.
    pub fn color(self) -> u32 {
        match self {
            Stage::Test => colors::PINK,
            Stage::Build => colors::CYAN,
            Stage::E2e => colors::YELLOW,
            Stage::FinalBuild => colors::DARK_BLUE,
            Stage::Deploy => colors::PURPLE,
            Stage::Complete => colors::GREEN,
        }
    }

    /// Position in the checklist. `Complete` sits past the final entry so
    /// every checklist entry renders as finished.
    fn position(self) -> usize {
        match self {
            Stage::Test => 0,
            Stage::Build => 1,
            Stage::E2e => 2,
            Stage::FinalBuild => 3,
            Stage::Deploy => 4,
            Stage::Complete => 5,
        }
    }

    /// Render the five-entry checklist for this stage.
    ///
    /// Entries before the current stage show the completed marker and later
    /// entries show the waiting marker. The current entry carries the
    /// caller-supplied status text, wrapped in fail markers when `failed`
    /// is set.
    pub fn checklist(self, status: &str, failed: bool) -> Vec<ChecklistEntry> {
        let current = if failed {
            format!("{FAIL_MARKER} {status} {FAIL_MARKER}")
        } else {
            status.to_string()
        };

        CHECKLIST_LABELS
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let value = match index.cmp(&self.position()) {
                    std::cmp::Ordering::Less => COMPLETE_MARKER.to_string(),
                    std::cmp::Ordering::Equal => current.clone(),
                    std::cmp::Ordering::Greater => WAITING_MARKER.to_string(),
                };
                ChecklistEntry { label, value }
            })
            .collect()
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" => Ok(Stage::Test),
            "build" => Ok(Stage::Build),
            "e2e" => Ok(Stage::E2e),
            "final-build" => Ok(Stage::FinalBuild),
            "deploy" => Ok(Stage::Deploy),
            "complete" => Ok(Stage::Complete),
            _ => Err(Error::UnknownStage(s.to_string())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Test => "test",
            Stage::Build => "build",
            Stage::E2e => "e2e",
            Stage::FinalBuild => "final-build",
            Stage::Deploy => "deploy",
            Stage::Complete => "complete",
        };
        write!(f, "{}", name)
    }
}

/// One label/value pair of the pipeline checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistEntry {
    pub label: &'static str,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN_CHECKLIST: [Stage; 5] = [
        Stage::Test,
        Stage::Build,
        Stage::E2e,
        Stage::FinalBuild,
        Stage::Deploy,
    ];

    #[test]
    fn test_checklist_has_five_entries_in_fixed_order() {
        for stage in IN_CHECKLIST.iter().chain([Stage::Complete].iter()) {
            let entries = stage.checklist("running", false);
            assert_eq!(entries.len(), 5);
            let labels: Vec<_> = entries.iter().map(|e| e.label).collect();
            assert_eq!(labels, CHECKLIST_LABELS);
        }
    }

    #[test]
    fn test_exactly_one_current_entry_for_pipeline_stages() {
        for (position, stage) in IN_CHECKLIST.iter().enumerate() {
            let entries = stage.checklist("in progress", false);
            let current: Vec<_> = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.value != COMPLETE_MARKER && e.value != WAITING_MARKER)
                .collect();
            assert_eq!(current.len(), 1, "stage {} should have one current entry", stage);
            assert_eq!(current[0].0, position);
            assert_eq!(current[0].1.value, "in progress");
        }
    }

    #[test]
    fn test_entries_before_current_are_complete_after_are_waiting() {
        let entries = Stage::E2e.checklist("testing", false);
        assert_eq!(entries[0].value, COMPLETE_MARKER);
        assert_eq!(entries[1].value, COMPLETE_MARKER);
        assert_eq!(entries[2].value, "testing");
        assert_eq!(entries[3].value, WAITING_MARKER);
        assert_eq!(entries[4].value, WAITING_MARKER);
    }

    #[test]
    fn test_complete_stage_shows_all_entries_finished() {
        let entries = Stage::Complete.checklist("done", false);
        assert!(entries.iter().all(|e| e.value == COMPLETE_MARKER));
    }

    #[test]
    fn test_failed_stage_wraps_status_in_fail_markers() {
        let entries = Stage::Deploy.checklist("deploy failed", true);
        assert_eq!(entries[4].value, "❌ deploy failed ❌");
    }

    #[test]
    fn test_unknown_stage_fails_to_parse() {
        let err = "staging".parse::<Stage>().unwrap_err();
        assert!(matches!(err, Error::UnknownStage(ref s) if s == "staging"));
    }

    #[test]
    fn test_stage_parses_all_known_names() {
        for (name, stage) in [
            ("test", Stage::Test),
            ("build", Stage::Build),
            ("e2e", Stage::E2e),
            ("final-build", Stage::FinalBuild),
            ("deploy", Stage::Deploy),
            ("complete", Stage::Complete),
        ] {
            assert_eq!(name.parse::<Stage>().unwrap(), stage);
            assert_eq!(stage.to_string(), name);
        }
    }

    #[test]
    fn test_stage_colors() {
        assert_eq!(Stage::Test.color(), colors::PINK);
        assert_eq!(Stage::Build.color(), colors::CYAN);
        assert_eq!(Stage::E2e.color(), colors::YELLOW);
        assert_eq!(Stage::FinalBuild.color(), colors::DARK_BLUE);
        assert_eq!(Stage::Deploy.color(), colors::PURPLE);
        assert_eq!(Stage::Complete.color(), colors::GREEN);
    }
}
