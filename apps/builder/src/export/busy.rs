//! Busy state for the controls that trigger long-running requests.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub label: String,
    pub disabled: bool,
}

/// A shared handle to one trigger control (button).
#[derive(Debug, Clone)]
pub struct Control {
    state: Arc<Mutex<ControlState>>,
}

impl Control {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControlState {
                label: label.into(),
                disabled: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControlState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn snapshot(&self) -> ControlState {
        self.lock().clone()
    }

    /// Disables the control and shows `busy_label` until the guard drops.
    ///
    /// The guard restores whatever state the control had at this call.
    pub fn begin_busy(&self, busy_label: &str) -> BusyGuard {
        let original = {
            let mut state = self.lock();
            let original = state.clone();
            state.label = busy_label.to_string();
            state.disabled = true;
            original
        };
        BusyGuard {
            control: self.clone(),
            original,
        }
    }
}

#[must_use = "the control is restored as soon as the guard is dropped"]
pub struct BusyGuard {
    control: Control,
    original: ControlState,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        *self.control.lock() = self.original.clone();
    }
}

/// The controls the export flows own.
#[derive(Debug, Clone)]
pub struct Controls {
    pub download_pdf: Control,
    pub upload_pdf: Control,
    pub analyze_job: Control,
    pub cover_letter: Control,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            download_pdf: Control::new("Download PDF"),
            upload_pdf: Control::new("Upload & Extract"),
            analyze_job: Control::new("Analyze Job Description"),
            cover_letter: Control::new("Generate Cover Letter"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlsSnapshot {
    pub download_pdf: ControlState,
    pub upload_pdf: ControlState,
    pub analyze_job: ControlState,
    pub cover_letter: ControlState,
}

impl Controls {
    pub fn snapshot(&self) -> ControlsSnapshot {
        ControlsSnapshot {
            download_pdf: self.download_pdf.snapshot(),
            upload_pdf: self.upload_pdf.snapshot(),
            analyze_job: self.analyze_job.snapshot(),
            cover_letter: self.cover_letter.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_disables_then_restores() {
        let button = Control::new("Download PDF");
        {
            let _busy = button.begin_busy("⏳ Generating PDF...");
            let state = button.snapshot();
            assert!(state.disabled);
            assert_eq!(state.label, "⏳ Generating PDF...");
        }
        assert_eq!(
            button.snapshot(),
            ControlState {
                label: "Download PDF".into(),
                disabled: false
            }
        );
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn failing_flow(control: &Control) -> Result<(), &'static str> {
            let _busy = control.begin_busy("Working...");
            Err("boom")
        }
        let button = Control::new("Go");
        assert!(failing_flow(&button).is_err());
        assert!(!button.snapshot().disabled);
        assert_eq!(button.snapshot().label, "Go");
    }

    #[test]
    fn test_guard_restores_through_cloned_handle() {
        let button = Control::new("Go");
        let elsewhere = button.clone();
        let guard = button.begin_busy("Working...");
        assert!(elsewhere.snapshot().disabled);
        drop(guard);
        assert!(!elsewhere.snapshot().disabled);
    }

    #[test]
    fn test_default_controls_start_enabled() {
        let controls = Controls::default();
        let snap = controls.snapshot();
        assert!(!snap.download_pdf.disabled);
        assert_eq!(snap.cover_letter.label, "Generate Cover Letter");
    }
}
