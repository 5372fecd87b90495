use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use audio_notes_core::{EncoderRegistry, FsVault, Notifier, RecorderConfiguration, RecorderShell};
use audio_notes_cpal::CpalMicCapture;

use crate::delegate::LoggingDelegate;
use crate::notifier::TerminalNotifier;

pub type Shell = RecorderShell<CpalMicCapture, FsVault>;

/// Wire microphone, vault and notices into a shell.
///
/// The vault directory is created on first use. Setup failures are returned
/// as plain messages; `RecorderError`s reaching `main` come from shell
/// operations, which have already shown them as notices.
pub fn build_shell(config: &RecorderConfiguration) -> Result<Shell> {
    std::fs::create_dir_all(&config.vault_root).with_context(|| {
        format!("failed to create vault directory: {}", config.vault_root.display())
    })?;
    let vault = FsVault::open(&config.vault_root, config.trash).map_err(|e| anyhow!("{}", e))?;
    let mic = CpalMicCapture::from_name(config.input_device.as_deref());
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);

    let registry = EncoderRegistry::builtin();
    let mut shell = RecorderShell::from_config(mic, vault, &registry, config, notifier)
        .map_err(|e| anyhow!("{}", e))?;
    shell.controller_mut().set_delegate(Arc::new(LoggingDelegate));

    log::debug!(
        "Vault {} / {} ({})",
        config.vault_root.display(),
        shell.library().folder(),
        shell.controller().encoding()
    );
    Ok(shell)
}
