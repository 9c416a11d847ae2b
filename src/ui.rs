// UI layer: an interactive menu using `dialoguer`, plus the one-shot flow
// used when a file is given on the command line. Everything is synchronous:
// while a request is in flight only the spinner moves.

use crate::api::PredictClient;
use crate::asset::UploadedAsset;
use crate::config::ClientConfig;
use crate::render::{Panel, PanelKind};
use crate::session::{Session, SessionState};
use anyhow::Result;
use crossterm::style::{style, Stylize};
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

/// Settings for the interactive menu that do not belong to the client.
pub struct UiOptions {
    /// Try the native file dialog before asking for a typed path.
    pub use_dialog: bool,
    /// Where "Save settings" writes to.
    pub config_path: PathBuf,
}

/// Main interactive menu. Runs a select loop until the user chooses "Exit".
pub fn main_menu(mut api: PredictClient, opts: &UiOptions) -> Result<()> {
    let mut session = Session::new();
    println!("{}", "Speech Emotion Recognition".bold());
    println!("Upload a .wav file to detect the emotion expressed in the voice.");
    loop {
        let current = match session.asset() {
            Some(asset) => format!("Predict ({})", asset.file_name()),
            None => "Predict".to_string(),
        };
        let items = vec!["Choose a .wav file", current.as_str(), "Settings", "Exit"];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                session.begin_upload();
                match choose_file(opts.use_dialog)? {
                    Some(path) => load_into_session(&mut session, &path),
                    None => session.cancel_upload(),
                }
            }
            1 => {
                if !session.can_submit() {
                    let hint = match session.state() {
                        SessionState::Rejected => "Please choose a .wav file first.",
                        _ => "Choose a file first.",
                    };
                    println!("{}", hint);
                    continue;
                }
                let spinner = spinner("Sending to the API...")?;
                let result = session.submit(&api);
                spinner.finish_and_clear();
                match result {
                    Ok(panel) => print_panel(&panel),
                    Err(e) => println!("{}", e),
                }
            }
            2 => {
                api = edit_settings(api, &opts.config_path)?;
            }
            3 => break,
            _ => {}
        }
    }
    Ok(())
}

/// One-shot exit status: the request failed (network or decode).
pub const EXIT_REQUEST_FAILED: u8 = 1;
/// One-shot exit status: the file was not declared as `audio/wav`.
pub const EXIT_REJECTED: u8 = 2;
/// One-shot exit status: the file could not be read.
pub const EXIT_UNREADABLE: u8 = 3;

/// Validate, send and render one file. See the `EXIT_*` constants for the
/// non-zero exit codes.
pub fn predict_once(api: &PredictClient, path: &Path) -> Result<ExitCode> {
    let mut session = Session::new();
    session.begin_upload();
    let asset = match UploadedAsset::from_path(path) {
        Ok(asset) => asset,
        Err(e) => {
            session.cancel_upload();
            println!("Could not load file: {}", e);
            return Ok(ExitCode::from(EXIT_UNREADABLE));
        }
    };
    show_preview(&asset);
    if let Some(warning) = session.accept(asset) {
        print_panel(&warning);
        return Ok(ExitCode::from(EXIT_REJECTED));
    }

    let spinner = spinner("Sending to the API...")?;
    let result = session.submit(api);
    spinner.finish_and_clear();
    print_panel(&result?);

    Ok(match session.state() {
        SessionState::Succeeded => ExitCode::SUCCESS,
        _ => ExitCode::from(EXIT_REQUEST_FAILED),
    })
}

/// Print a panel, coloured by kind.
pub fn print_panel(panel: &Panel) {
    let title = match panel.kind {
        PanelKind::Success => style(panel.title.clone()).green().bold(),
        PanelKind::Warning => style(format!("⚠ {}", panel.title)).yellow().bold(),
        PanelKind::NetworkError | PanelKind::DecodeError => {
            style(format!("✖ {}", panel.title)).red().bold()
        }
    };
    println!("{}", title);
    for line in &panel.lines {
        println!("  {}", line);
    }
}

/// Ask for a file: native dialog filtered to .wav first, typed path as a
/// fallback. `None` means the user gave up.
fn choose_file(use_dialog: bool) -> Result<Option<PathBuf>> {
    if use_dialog {
        let picked = rfd::FileDialog::new()
            .set_title("Choose a .wav file")
            .add_filter("WAV audio", &["wav"])
            .pick_file();
        if picked.is_some() {
            return Ok(picked);
        }
        if !Confirm::new()
            .with_prompt("No file chosen. Type a path instead?")
            .default(true)
            .interact()?
        {
            return Ok(None);
        }
    }
    let path: String = Input::new()
        .with_prompt("Path to .wav file (empty to cancel)")
        .allow_empty(true)
        .interact_text()?;
    let path = path.trim();
    if path.is_empty() {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(path)))
}

fn load_into_session(session: &mut Session, path: &Path) {
    match UploadedAsset::from_path(path) {
        Ok(asset) => {
            show_preview(&asset);
            if let Some(warning) = session.accept(asset) {
                print_panel(&warning);
            }
        }
        Err(e) => {
            println!("Could not load file: {}", e);
            session.cancel_upload();
        }
    }
}

/// One line describing the recording, in place of an audio player.
fn show_preview(asset: &UploadedAsset) {
    match asset.preview() {
        Ok(summary) => println!("♪ {}: {}", asset.file_name(), summary),
        Err(e) => {
            log::debug!("no preview for {}: {}", asset.file_name(), e);
            println!("♪ {} (preview unavailable)", asset.file_name());
        }
    }
}

/// Let the user change the endpoint and timeout. Saving is always offered,
/// so settings that came from flags or env can be persisted unchanged.
fn edit_settings(api: PredictClient, config_path: &Path) -> Result<PredictClient> {
    let current = api.config().clone();
    println!("Current endpoint: {} (field `{}`)", current.endpoint(), current.field_name);

    let base_url: String = Input::new()
        .with_prompt("API base URL")
        .default(current.base_url.clone())
        .interact_text()?;
    let predict_path: String = Input::new()
        .with_prompt("Predict path")
        .default(current.predict_path.clone())
        .interact_text()?;
    let field_name: String = Input::new()
        .with_prompt("File field name")
        .default(current.field_name.clone())
        .interact_text()?;
    let timeout_secs: u64 = Input::new()
        .with_prompt("Timeout in seconds (0 waits forever)")
        .default(current.timeout.map(|t| t.as_secs()).unwrap_or(0))
        .interact_text()?;

    let updated = ClientConfig {
        base_url,
        predict_path,
        field_name,
        timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
    };
    let save = Confirm::new()
        .with_prompt(format!("Save settings to {}?", config_path.display()))
        .default(false)
        .interact()?;
    commit_settings(api, updated, save.then_some(config_path))
}

/// Swap in `updated` (rebuilding the client only if something changed) and
/// write it to `save_to` when given. A failed save is reported, not fatal.
pub fn commit_settings(
    api: PredictClient,
    updated: ClientConfig,
    save_to: Option<&Path>,
) -> Result<PredictClient> {
    let api = if updated == *api.config() {
        api
    } else {
        let api = PredictClient::new(updated)?;
        println!("Endpoint is now {}", api.config().endpoint());
        api
    };
    if let Some(path) = save_to {
        match api.config().save(path) {
            Ok(()) => println!("Settings saved."),
            Err(e) => println!("Could not save settings: {:#}", e),
        }
    }
    Ok(api)
}

fn spinner(msg: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;

    #[test]
    fn unchanged_settings_can_still_be_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let config = ClientConfig {
            base_url: "http://x:1".into(),
            ..ClientConfig::default()
        };
        let api = PredictClient::new(config.clone()).unwrap();

        let api = commit_settings(api, config.clone(), Some(path.as_path())).unwrap();
        assert_eq!(*api.config(), config);
        let saved = ConfigOverrides::load(&path).unwrap().unwrap();
        assert_eq!(ClientConfig::default().apply(&saved), config);
    }

    #[test]
    fn changed_settings_rebuild_the_client() {
        let api = PredictClient::new(ClientConfig::default()).unwrap();
        let updated = ClientConfig {
            field_name: "file".into(),
            timeout: Some(Duration::from_secs(10)),
            ..ClientConfig::default()
        };
        let api = commit_settings(api, updated.clone(), None).unwrap();
        assert_eq!(*api.config(), updated);
    }

    #[test]
    fn failed_save_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be written as a file
        let api = PredictClient::new(ClientConfig::default()).unwrap();
        assert!(commit_settings(api, ClientConfig::default(), Some(dir.path())).is_ok());
    }
}
