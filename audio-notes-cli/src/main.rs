mod app;
mod delegate;
mod menu;
mod notifier;
mod prompt;
mod settings;
#[cfg(test)]
mod testing;
mod views;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use audio_notes_core::{AudioSource, RecorderError};
use audio_notes_cpal::{permissions, CpalPlayer, DeviceEnumerator};

use settings::Settings;
use views::{RecordingView, View};

#[derive(Parser)]
#[command(name = "audio-notes", version, about = "Record audio notes into a notes vault")]
struct Cli {
    /// Vault directory (overrides the settings file and AUDIO_NOTES_VAULT)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Recordings folder inside the vault
    #[arg(long, global = true)]
    folder: Option<String>,

    /// Settings file (default: <config dir>/audio-notes/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Record a note; Enter stops and saves, Esc discards
    Record {
        /// File name to save under instead of asking
        #[arg(long)]
        name: Option<String>,
        /// Print the save receipt as JSON instead of opening the recordings
        #[arg(long)]
        json: bool,
    },
    /// Browse recordings: play, rename, delete
    Recordings,
    /// List recordings
    List {
        #[arg(long)]
        json: bool,
    },
    /// Play a recording
    Play { name: String },
    /// Rename a recording
    Rename { name: String, new_name: String },
    /// Move a recording to the trash
    Delete { name: String },
    /// Print the file path of a recording
    Path { name: String },
    /// List audio devices and check microphone access
    Devices,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(cli) {
        if e.downcast_ref::<RecorderError>().is_none() {
            prompt::error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(Command::Devices) = cli.command {
        return list_devices();
    }

    let settings = Settings::load(cli.config.as_deref())?.with_overrides(cli.vault, cli.folder);
    let config = settings.to_configuration();
    let mut shell = app::build_shell(&config)?;

    match cli.command {
        None => menu::run(&mut shell),
        Some(Command::Record { name, json: true }) => {
            let receipt = RecordingView::new(&mut shell).with_name(name).render()?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            Ok(())
        }
        Some(Command::Record { name, json: false }) => {
            menu::record_then_browse(
                &mut shell,
                |shell| RecordingView::new(shell).with_name(name).render(),
                |shell| menu::browse(shell),
            )?;
            Ok(())
        }
        Some(Command::Recordings) => menu::browse(&shell),
        Some(Command::List { json }) => {
            let files = shell.open_recordings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&files)?);
            } else {
                for file in &files {
                    let relative = shell.library().relative_name(file);
                    println!("{}", views::playback::describe(relative, file));
                }
            }
            Ok(())
        }
        Some(Command::Play { name }) => {
            let path = shell.resource_path(&name)?;
            views::playback::play_until_key(&CpalPlayer::new(), &path, &name)
        }
        Some(Command::Rename { name, new_name }) => {
            shell.rename(&name, &new_name)?;
            Ok(())
        }
        Some(Command::Delete { name }) => {
            shell.delete(&name)?;
            Ok(())
        }
        Some(Command::Path { name }) => {
            let path = shell.resource_path(&name)?;
            println!("{}", path.display());
            Ok(())
        }
        Some(Command::Devices) => list_devices(),
    }
}

fn list_devices() -> Result<()> {
    let enumerator = DeviceEnumerator::new();

    prompt::header(&format!("Input devices ({})", enumerator.host_name()));
    let inputs = enumerator
        .list_input_devices()
        .map_err(|e| anyhow!("failed to list input devices: {}", e))?;
    print_devices(&inputs, "No input devices found");

    prompt::header("Output devices");
    let outputs = enumerator
        .list_output_devices()
        .map_err(|e| anyhow!("failed to list output devices: {}", e))?;
    print_devices(&outputs, "No output devices found");

    println!();
    let available = permissions::check_microphone_permission()
        .map_err(|e| anyhow!("failed to check microphone access: {}", e))?;
    if available {
        prompt::success("Microphone access available");
    } else {
        prompt::error("Microphone access unavailable");
    }
    Ok(())
}

fn print_devices(devices: &[AudioSource], none: &str) {
    if devices.is_empty() {
        prompt::info(none);
    }
    for device in devices {
        let marker = if device.is_default { " (default)" } else { "" };
        println!("  {}{}", device.name, marker);
    }
}
