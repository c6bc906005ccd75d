//! Command runners

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use tracing::warn;

use crate::application::ports::{AssistantApi, ConfigStore, TranscriptionError};
use crate::application::{
    AssistantUseCase, ChatUseCase, TextTurnOutput, TurnCallbacks, TurnError,
};
use crate::domain::assistant::{
    ChatRequest, CommandSequence, DeviceType, NewDevice, ServiceWord, SettingsUpdate,
};
use crate::domain::audio::EncodedPayload;
use crate::domain::config::AppConfig;
use crate::infrastructure::{create_capture, CpalCapture, HttpBackend, XdgConfigStore};

use super::presenter::Presenter;
use super::signals::{wait_for_stop, StopReason};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable overriding the configured backend URL
pub const SERVER_ENV: &str = "HOME_VOICE_SERVER";

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        server_url: env::var(SERVER_ENV).ok().filter(|s| !s.trim().is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

/// HTTP client for the configured backend
pub fn build_backend(config: &AppConfig) -> HttpBackend {
    HttpBackend::with_timeout(
        config.server_url_or_default(),
        config.request_timeout_or_default(),
    )
}

/// Record one utterance and run a voice turn
pub async fn run_listen(
    config: &AppConfig,
    input: Option<PathBuf>,
    save: Option<PathBuf>,
    device: Option<String>,
) -> ExitCode {
    let mut presenter = Presenter::new();
    let from_file = input.is_some();

    let device = device.as_deref().or(config.input_device());
    let capture = create_capture(input, device);
    let backend = build_backend(config);
    let mut use_case = AssistantUseCase::new(capture, backend.clone(), backend);

    if let Err(e) = use_case.begin_listening().await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let label = presenter.format_recording(0);
    presenter.start_spinner(&label);

    if !from_file {
        let stop = wait_for_stop();
        tokio::pin!(stop);
        let mut ticker = tokio::time::interval(Duration::from_millis(250));

        let reason = loop {
            tokio::select! {
                reason = &mut stop => break reason,
                _ = ticker.tick() => {
                    presenter.update_spinner(&presenter.format_recording(use_case.elapsed_ms()));
                }
            }
        };

        match reason {
            Ok(StopReason::Interrupt) => warn!("recording stopped by Ctrl-C"),
            Ok(StopReason::Enter) => {}
            Err(e) => warn!(error = %e, "stop signal failed, stopping now"),
        }
    }

    presenter.update_spinner("Encoding...");
    let callbacks = listen_callbacks(&presenter, save);

    match use_case.finish_listening(&callbacks).await {
        Ok(Some(output)) => {
            presenter.spinner_success(&format!("Sent {}", output.audio_size));
            presenter.user_line(&output.transcript);
            show_turn(&presenter, &output.turn);
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(None) => {
            presenter.stop_spinner();
            presenter.warn("No recording in progress");
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.spinner_fail("Voice turn failed");
            report_turn_error(&presenter, &e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Callbacks that keep the spinner current and optionally save the payload
fn listen_callbacks(presenter: &Presenter, save: Option<PathBuf>) -> TurnCallbacks {
    let spinner = presenter.spinner_handle();

    let on_recording_end = {
        let spinner = spinner.clone();
        move |payload: &EncodedPayload| {
            let Some(path) = save.as_ref() else { return };
            let message = match std::fs::write(path, payload.data()) {
                Ok(()) => format!("Saved recording to {}", path.display()),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to save recording");
                    format!("Could not save recording to {}: {}", path.display(), e)
                }
            };
            match &spinner {
                Some(s) => s.println(message),
                None => eprintln!("{}", message),
            }
        }
    };

    let on_transcribing_start = {
        let spinner = spinner.clone();
        move || {
            if let Some(s) = &spinner {
                s.set_message("Recognizing speech...");
            }
        }
    };

    let on_sending_start = {
        let spinner = spinner.clone();
        move || {
            if let Some(s) = &spinner {
                s.set_message("Waiting for the assistant...");
            }
        }
    };

    TurnCallbacks {
        on_recording_end: Some(Box::new(on_recording_end)),
        on_transcribing_start: Some(Box::new(on_transcribing_start)),
        on_transcript: None,
        on_sending_start: Some(Box::new(on_sending_start)),
    }
}

/// Send typed text as a chat turn
pub async fn run_say(config: &AppConfig, words: &[String]) -> ExitCode {
    let mut presenter = Presenter::new();
    let text = words.join(" ");

    // Validate before touching the network
    if let Err(e) = ChatRequest::new(&text) {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let chat = ChatUseCase::new(build_backend(config));

    presenter.start_spinner("Waiting for the assistant...");
    match chat.send_text(&text, &TurnCallbacks::default()).await {
        Ok(output) => {
            presenter.stop_spinner();
            show_turn(&presenter, &output);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail("Message not delivered");
            report_turn_error(&presenter, &e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Print settings and the device list
pub async fn run_state(config: &AppConfig) -> ExitCode {
    let presenter = Presenter::new();
    let backend = build_backend(config);

    match backend.fetch_state().await {
        Ok(state) => {
            presenter.settings(&state.settings);
            presenter.output("");
            presenter.devices(&state.devices);
            presenter.output("");
            presenter.service_words(&state.service_words);
            presenter.sequences(state.sequences.values());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Switch one device on or off
pub async fn run_toggle(config: &AppConfig, id: &str, is_on: bool) -> ExitCode {
    let presenter = Presenter::new();
    let backend = build_backend(config);

    match backend.toggle_device(id, is_on).await {
        Ok(device) => {
            presenter.output(&Presenter::format_device(&device));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) if e.is_not_found() => {
            presenter.error(&format!("No device with id '{}'", id));
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Register a device
pub async fn run_device_add(
    config: &AppConfig,
    device_type: DeviceType,
    name: Option<&str>,
    is_on: bool,
) -> ExitCode {
    let presenter = Presenter::new();
    let backend = build_backend(config);

    let mut device = NewDevice::new(device_type, name);
    device.is_on = is_on;

    match backend.add_device(&device).await {
        Ok(created) => {
            presenter.success(&format!("Device \"{}\" added", created.name));
            presenter.output(&Presenter::format_device(&created));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Forward a settings update, or show settings when none is given
pub async fn run_settings(config: &AppConfig, update: SettingsUpdate) -> ExitCode {
    let presenter = Presenter::new();
    let backend = build_backend(config);

    let result = if update.is_empty() {
        backend.fetch_state().await.map(|state| state.settings)
    } else {
        backend.update_settings(&update).await
    };

    match result {
        Ok(settings) => {
            presenter.settings(&settings);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Register a service word
pub async fn run_service_word(config: &AppConfig, word: &str) -> ExitCode {
    let presenter = Presenter::new();

    let word = match ServiceWord::new(word) {
        Ok(word) => word,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    match build_backend(config).add_service_word(&word).await {
        Ok(words) => {
            presenter.success(&format!("Service word \"{}\" added", word.as_str()));
            presenter.service_words(&words);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Store a named command sequence
pub async fn run_sequence_add(
    config: &AppConfig,
    name: &str,
    steps: &[String],
    description: &str,
) -> ExitCode {
    let presenter = Presenter::new();

    let sequence = match CommandSequence::new(name, steps, description) {
        Ok(sequence) => sequence,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    match build_backend(config).add_sequence(&sequence).await {
        Ok(stored) => {
            presenter.success(&format!("Sequence \"{}\" saved", stored.name));
            presenter.output(&Presenter::format_sequence(&stored));
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// List audio input devices on this machine
pub fn run_inputs() -> ExitCode {
    let presenter = Presenter::new();

    match CpalCapture::input_device_names() {
        Ok(names) if names.is_empty() => {
            presenter.warn("No audio input devices found");
            ExitCode::from(EXIT_ERROR)
        }
        Ok(names) => {
            for name in names {
                presenter.output(&name);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn show_turn(presenter: &Presenter, turn: &TextTurnOutput) {
    for line in &turn.replies {
        presenter.assistant_line(line);
    }
    if let Some(state) = &turn.state {
        presenter.devices_brief(&state.devices);
    }
}

fn report_turn_error(presenter: &Presenter, error: &TurnError) {
    match error {
        TurnError::Transcription(TranscriptionError::Empty(message)) => presenter.warn(message),
        TurnError::Transcription(e) => {
            presenter.error(&e.to_string());
            if let Some(hint) = e.hint() {
                presenter.info(hint);
            }
        }
        other => presenter.error(&other.to_string()),
    }
}
