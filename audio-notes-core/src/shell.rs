use std::path::PathBuf;
use std::sync::Arc;

use crate::models::audio_models::StreamInfo;
use crate::models::config::RecorderConfiguration;
use crate::models::error::RecorderError;
use crate::models::recording::{SaveReceipt, VaultFile};
use crate::models::state::SessionState;
use crate::processing::encoders::EncoderRegistry;
use crate::session::controller::RecordingController;
use crate::session::monitor::LiveMonitor;
use crate::storage::library::RecordingLibrary;
use crate::storage::naming;
use crate::traits::capture_provider::CaptureProvider;
use crate::traits::notifier::{Notice, Notifier};
use crate::traits::vault::Vault;

/// The user-facing recorder: one controller, one recordings library.
///
/// Front ends (the CLI menu, subcommands) drive everything through this type.
/// Failures are returned and also surfaced through the notifier.
pub struct RecorderShell<P: CaptureProvider, V: Vault> {
    controller: RecordingController<P>,
    library: RecordingLibrary<V>,
    notifier: Arc<dyn Notifier>,
    save_empty: bool,
}

impl<P: CaptureProvider, V: Vault> RecorderShell<P, V> {
    pub fn new(
        controller: RecordingController<P>,
        library: RecordingLibrary<V>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            controller,
            library,
            notifier,
            save_empty: false,
        }
    }

    /// Wire a shell from configuration. The saved file extension follows the
    /// encoding the registry selects.
    pub fn from_config(
        provider: P,
        vault: V,
        registry: &EncoderRegistry,
        config: &RecorderConfiguration,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, RecorderError> {
        let controller = RecordingController::from_config(provider, registry, config)?;
        let library = RecordingLibrary::new(
            vault,
            config.folder(),
            controller.encoding().extension(),
            Arc::clone(&notifier),
        );
        let mut shell = Self::new(controller, library, notifier);
        shell.save_empty = config.save_empty_recordings;
        Ok(shell)
    }

    pub fn controller(&self) -> &RecordingController<P> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut RecordingController<P> {
        &mut self.controller
    }

    pub fn library(&self) -> &RecordingLibrary<V> {
        &self.library
    }

    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    pub fn is_recording(&self) -> bool {
        self.controller.is_recording()
    }

    pub fn monitor(&self) -> LiveMonitor {
        self.controller.monitor()
    }

    /// Start when idle, finish with the default name when armed.
    pub fn toggle(&mut self) -> Result<Option<SaveReceipt>, RecorderError> {
        match self.controller.state() {
            SessionState::Idle => self.start().map(|_| None),
            SessionState::Armed { .. } => self.finish(None),
            SessionState::Finalizing => {
                log::debug!("Toggle ignored while finalizing");
                Ok(None)
            }
        }
    }

    pub fn start(&mut self) -> Result<StreamInfo, RecorderError> {
        match self.controller.start() {
            Ok(info) => {
                self.notifier
                    .notify(Notice::info(format!("Recording from {}", info.device.name)));
                Ok(info)
            }
            Err(e) => {
                let message = match e {
                    RecorderError::PermissionDenied | RecorderError::DeviceNotAvailable => {
                        format!("Error accessing the microphone: {}", e)
                    }
                    _ => format!("Could not start recording: {}", e),
                };
                self.notifier.notify(Notice::error(message));
                Err(e)
            }
        }
    }

    /// Stop the session and save it as `name` (or the default name).
    ///
    /// The name is validated before the session is stopped, so a rejected
    /// name leaves the recording running. Returns `None` when the session
    /// captured nothing and empty recordings are not kept.
    pub fn finish(&mut self, name: Option<&str>) -> Result<Option<SaveReceipt>, RecorderError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.library.default_file_name(),
        };
        if let Err(e) = naming::normalize_file_name(&name, self.library.extension()) {
            self.notifier.notify(Notice::error(format!("Could not save recording: {}", e)));
            return Err(e);
        }

        let blob = self.controller.stop().map_err(|e| {
            self.notifier
                .notify(Notice::error(format!("Could not finish recording: {}", e)));
            e
        })?;

        if blob.is_empty() && !self.save_empty {
            log::info!("Skipping save of empty recording");
            self.notifier.notify(Notice::info("Nothing was recorded"));
            return Ok(None);
        }

        self.library.save(&blob, &name).map(Some)
    }

    /// Discard the running session.
    pub fn cancel(&mut self) {
        if self.controller.state().is_armed() {
            self.controller.cancel();
            self.notifier.notify(Notice::info("Recording discarded"));
        }
    }

    pub fn open_recordings(&self) -> Result<Vec<VaultFile>, RecorderError> {
        self.library.list()
    }

    pub fn rename(&self, name: &str, new_name: &str) -> Result<VaultFile, RecorderError> {
        self.library.rename(name, new_name)
    }

    pub fn delete(&self, name: &str) -> Result<(), RecorderError> {
        self.library.delete(name)
    }

    pub fn resource_path(&self, name: &str) -> Result<PathBuf, RecorderError> {
        self.library.resource_path(name)
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, RecorderError> {
        self.library.read(name)
    }
}
