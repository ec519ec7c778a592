use serde::Serialize;

use crate::browser::{CycleReport, LoadOutcome};

/// Summary of one completed render cycle.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    pub timestamp: String,
    pub trigger: RenderTrigger,
    pub selected: Option<String>,
    pub traders: PanelReport,
    pub trades: Option<PanelReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderTrigger {
    InitialLoad,
    Click,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelReport {
    pub outcome: &'static str,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&LoadOutcome> for PanelReport {
    fn from(outcome: &LoadOutcome) -> Self {
        Self {
            outcome: outcome.label(),
            count: outcome.count(),
            error: match outcome {
                LoadOutcome::Failed(e) => Some(e.to_string()),
                _ => None,
            },
        }
    }
}

impl RenderReport {
    pub fn new(trigger: RenderTrigger, selected: Option<&str>, cycle: &CycleReport) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            trigger,
            selected: selected.map(str::to_string),
            traders: PanelReport::from(&cycle.traders),
            trades: cycle.trades.as_ref().map(PanelReport::from),
        }
    }
}

/// Emit a render report as a single JSON line to stdout.
pub fn report_render(report: &RenderReport) {
    if let Ok(json) = serde_json::to_string(report) {
        println!("{json}");
    }
}
