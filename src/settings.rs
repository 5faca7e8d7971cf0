use std::fs;
use std::path::Path;

use amptune::amplify::{AmplifyParams, ProcessingMode, Transition, TransitionMode};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::ColorScheme;

// ---------------------------------------------------------------------------
// Panel settings (saved as JSON presets)
// ---------------------------------------------------------------------------

/// Which processing the next finalized selection runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    #[default]
    Scale,
    Align,
}

impl ModeKind {
    pub const ALL: [ModeKind; 2] = [ModeKind::Scale, ModeKind::Align];

    pub fn label(self) -> &'static str {
        match self {
            ModeKind::Scale => "Scale by factor",
            ModeKind::Align => "Align to surroundings",
        }
    }
}

/// Everything the side panel edits.
///
/// Both processing modes keep their own parameters so switching back and
/// forth does not lose values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: ModeKind,
    pub scale_factor: f32,
    pub transition_traces: i32,
    pub transition_ms: f32,
    pub transition_mode: TransitionMode,
    pub align_traces: i32,
    pub align_ms: f32,
    pub color_scheme: ColorScheme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: ModeKind::Scale,
            scale_factor: 2.0,
            transition_traces: 5,
            transition_ms: 20.0,
            transition_mode: TransitionMode::Inside,
            align_traces: 10,
            align_ms: 50.0,
            color_scheme: ColorScheme::Gray,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read settings from {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("Cannot serialize settings")?;
        fs::write(path, text)
            .with_context(|| format!("Cannot write settings to {}", path.display()))
    }

    /// Engine parameters for the current panel state.
    pub fn to_params(&self) -> AmplifyParams {
        let mode = match self.mode {
            ModeKind::Scale => ProcessingMode::Scale {
                factor: self.scale_factor,
            },
            ModeKind::Align => ProcessingMode::Align {
                width_traces: self.align_traces.max(0),
                width_ms: self.align_ms.max(0.0),
            },
        };
        AmplifyParams {
            mode,
            transition: Transition {
                width_traces: self.transition_traces,
                width_ms: self.transition_ms,
                mode: self.transition_mode,
            },
        }
    }

    /// History label for one application of these settings.
    pub fn describe(&self) -> String {
        match self.mode {
            ModeKind::Scale => format!("Scale ×{:.2}", self.scale_factor),
            ModeKind::Align => format!("Align ({} tr, {} ms)", self.align_traces, self.align_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_panel() {
        let s = Settings::default();
        let p = s.to_params();
        assert_eq!(p.mode, ProcessingMode::Scale { factor: 2.0 });
        assert_eq!(p.transition, Transition::default());
        assert_eq!(s.describe(), "Scale ×2.00");
    }

    #[test]
    fn align_description_and_clamping() {
        let s = Settings {
            mode: ModeKind::Align,
            align_traces: -3,
            ..Settings::default()
        };
        assert_eq!(
            s.to_params().mode,
            ProcessingMode::Align {
                width_traces: 0,
                width_ms: 50.0
            }
        );
        let s = Settings {
            mode: ModeKind::Align,
            ..Settings::default()
        };
        assert_eq!(s.describe(), "Align (10 tr, 50 ms)");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let s: Settings = serde_json::from_str(r#"{"mode":"align","align_ms":80.0}"#).unwrap();
        assert_eq!(s.mode, ModeKind::Align);
        assert_eq!(s.align_ms, 80.0);
        assert_eq!(s.scale_factor, 2.0);
        assert_eq!(s.transition_mode, TransitionMode::Inside);
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preset.json");
        let s = Settings {
            scale_factor: 0.5,
            transition_mode: TransitionMode::Outside,
            color_scheme: ColorScheme::Seismic,
            ..Settings::default()
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), s);
        assert!(Settings::load(&dir.path().join("missing.json")).is_err());
    }
}
