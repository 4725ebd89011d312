//! Scripted event runner
//!
//! Reads newline-delimited JSON steps and writes one JSON outcome line per
//! step. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"type": "startup"}
//! {"type": "service_state", "state": "in_service"}
//! {"type": "service_state", "state": 2}
//! {"type": "broadcast", "kind": "emergency_cell_broadcast", "channel": 4370, "privileged": true}
//! {"type": "select_subscription", "slot": 1}
//! {"type": "edit", "key": "enable_cmas_extreme_threat_alerts", "value": false}
//! ```

use cellbroadcast_core::{
    BroadcastKind, BroadcastMessage, Delivery, DeviceEvent, ServiceState, SubscriptionId,
};
use cellbroadcast_receiver::Dispatch;
use cellbroadcast_settings::{EditOutcome, PrefValue, PreferenceKey, SettingsResult};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

use crate::app::App;

/// Service state given by name or by raw registration code
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum StateInput {
    Named(ServiceState),
    Raw(i32),
}

impl From<StateInput> for ServiceState {
    fn from(input: StateInput) -> Self {
        match input {
            StateInput::Named(state) => state,
            StateInput::Raw(code) => ServiceState::from_raw(code),
        }
    }
}

/// One script line
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptStep {
    Startup,
    AirplaneMode {
        on: bool,
    },
    ServiceState {
        state: StateInput,
    },
    Broadcast {
        kind: BroadcastKind,
        channel: u16,
        #[serde(default)]
        slot: Option<u32>,
        #[serde(default)]
        body: String,
        #[serde(default)]
        privileged: bool,
    },
    /// Any other intent action
    Action {
        action: String,
    },
    SelectSubscription {
        slot: u32,
    },
    Edit {
        key: String,
        value: PrefValue,
        /// Defaults to the active subscription
        #[serde(default)]
        slot: Option<u32>,
    },
}

/// Result of one step
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum StepOutcome {
    Dispatched { line: usize, dispatch: Dispatch },
    Selected { line: usize, subscription: SubscriptionId },
    Edited { line: usize, edit: EditOutcome },
    Error { line: usize, message: String },
}

impl StepOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, StepOutcome::Error { .. })
    }
}

/// Totals for a finished script
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    pub steps: usize,
    pub errors: usize,
}

impl App {
    /// Apply one parsed step
    pub fn apply(&mut self, line: usize, step: ScriptStep) -> StepOutcome {
        let result = match step {
            ScriptStep::SelectSubscription { slot } => {
                let subscription = SubscriptionId(slot);
                self.controller
                    .select_subscription(subscription)
                    .map(|()| StepOutcome::Selected { line, subscription })
            }
            ScriptStep::Edit { key, value, slot } => self
                .edit(&key, value, slot)
                .map(|edit| StepOutcome::Edited { line, edit }),
            ScriptStep::Startup => Ok(self.dispatch(line, DeviceEvent::Startup)),
            ScriptStep::AirplaneMode { on } => {
                Ok(self.dispatch(line, DeviceEvent::AirplaneModeChanged { on }))
            }
            ScriptStep::ServiceState { state } => Ok(self.dispatch(
                line,
                DeviceEvent::ServiceStateChanged {
                    state: state.into(),
                },
            )),
            ScriptStep::Broadcast {
                kind,
                channel,
                slot,
                body,
                privileged,
            } => {
                let message = BroadcastMessage {
                    kind,
                    channel,
                    subscription: slot.map(SubscriptionId),
                    body,
                };
                Ok(self.dispatch(
                    line,
                    DeviceEvent::BroadcastReceived {
                        message,
                        delivery: Delivery::from_flag(privileged),
                    },
                ))
            }
            ScriptStep::Action { action } => {
                Ok(self.dispatch(line, DeviceEvent::Unrecognized { action }))
            }
        };

        result.unwrap_or_else(|e| StepOutcome::Error {
            line,
            message: e.to_string(),
        })
    }

    fn dispatch(&mut self, line: usize, event: DeviceEvent) -> StepOutcome {
        StepOutcome::Dispatched {
            line,
            dispatch: self.receiver.on_receive(event),
        }
    }

    fn edit(&mut self, key: &str, value: PrefValue, slot: Option<u32>) -> SettingsResult<EditOutcome> {
        let key: PreferenceKey = key.parse()?;
        match slot {
            Some(slot) => self.controller.edit_for(SubscriptionId(slot), key, value),
            None => self.controller.edit(key, value),
        }
    }
}

/// Run every step in `input`, writing outcomes to `output`
pub fn run_script<R: BufRead, W: Write>(
    app: &mut App,
    input: R,
    mut output: W,
) -> anyhow::Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let outcome = match serde_json::from_str::<ScriptStep>(trimmed) {
            Ok(step) => app.apply(line_no, step),
            Err(e) => {
                tracing::warn!("line {}: malformed step: {}", line_no, e);
                StepOutcome::Error {
                    line: line_no,
                    message: format!("malformed step: {}", e),
                }
            }
        };

        summary.steps += 1;
        if outcome.is_error() {
            summary.errors += 1;
        }

        serde_json::to_writer(&mut output, &outcome)?;
        writeln!(output)?;
    }

    output.flush()?;
    Ok(summary)
}
