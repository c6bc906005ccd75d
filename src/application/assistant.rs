//! Voice and text turns against the assistant backend

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::assistant::{AssistantState, ChatRequest, ChatTextError};
use crate::domain::audio::EncodedPayload;
use crate::domain::recorder::RecorderStatus;

use super::ports::{
    AssistantApi, AudioCapture, BackendError, RecordingError, Transcriber, TranscriptionError,
};
use super::recorder::Recorder;

/// Errors from a turn
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Recording failed: {0}")]
    Recording(#[from] RecordingError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("{0}")]
    InvalidText(#[from] ChatTextError),

    #[error("No audio was captured")]
    NothingCaptured,
}

/// Result of sending one utterance
#[derive(Debug, Clone)]
pub struct TextTurnOutput {
    /// Lines to show for the assistant's answer
    pub replies: Vec<String>,
    /// State after the turn, if the refresh succeeded
    pub state: Option<AssistantState>,
}

/// Result of a completed voice turn
#[derive(Debug, Clone)]
pub struct VoiceTurnOutput {
    pub transcript: String,
    pub audio_size: String,
    pub turn: TextTurnOutput,
}

/// Callbacks for progress and status updates
#[derive(Default)]
#[allow(clippy::type_complexity)]
pub struct TurnCallbacks {
    /// Called with the encoded recording before upload
    pub on_recording_end: Option<Box<dyn Fn(&EncodedPayload) + Send + Sync>>,
    /// Called when the upload to the transcription endpoint starts
    pub on_transcribing_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called with the recognized text
    pub on_transcript: Option<Box<dyn Fn(&str) + Send + Sync>>,
    /// Called when the chat request is sent
    pub on_sending_start: Option<Box<dyn Fn() + Send + Sync>>,
}

/// Text turns and state refreshes; needs no audio input
pub struct ChatUseCase<A: AssistantApi> {
    api: A,
}

impl<A: AssistantApi> ChatUseCase<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Send typed (or transcribed) text and summarize the reply
    pub async fn send_text(
        &self,
        text: &str,
        callbacks: &TurnCallbacks,
    ) -> Result<TextTurnOutput, TurnError> {
        let request = ChatRequest::new(text)?;

        if let Some(ref cb) = callbacks.on_sending_start {
            cb();
        }

        let reply = self.api.send_chat(&request).await?;
        if let Some(intent) = reply.intent.as_deref() {
            debug!(intent, "chat reply");
        }

        Ok(TextTurnOutput {
            replies: reply.summary(),
            state: self.refresh_state().await,
        })
    }

    /// Fetch current state; failures are logged and yield `None`
    pub async fn refresh_state(&self) -> Option<AssistantState> {
        match self.api.fetch_state().await {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(error = %e, "state refresh failed");
                None
            }
        }
    }
}

/// Assistant front end: one recorder, the transcriber, and a chat session
pub struct AssistantUseCase<C, T, A>
where
    C: AudioCapture,
    T: Transcriber,
    A: AssistantApi,
{
    recorder: Recorder<C>,
    transcriber: T,
    chat: ChatUseCase<A>,
}

impl<C, T, A> AssistantUseCase<C, T, A>
where
    C: AudioCapture,
    T: Transcriber,
    A: AssistantApi,
{
    /// Create a new use case instance
    pub fn new(capture: C, transcriber: T, api: A) -> Self {
        Self {
            recorder: Recorder::new(capture),
            transcriber,
            chat: ChatUseCase::new(api),
        }
    }

    pub fn recorder_status(&self) -> RecorderStatus {
        self.recorder.status()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.recorder.elapsed_ms()
    }

    /// Open the microphone and start buffering
    pub async fn begin_listening(&mut self) -> Result<(), TurnError> {
        self.recorder.start().await?;
        Ok(())
    }

    /// Stop recording, transcribe, and send the transcript as a chat turn.
    ///
    /// Returns `Ok(None)` if nothing was recording. By the time any error is
    /// returned the input has already been released.
    pub async fn finish_listening(
        &mut self,
        callbacks: &TurnCallbacks,
    ) -> Result<Option<VoiceTurnOutput>, TurnError> {
        let payload = match self.recorder.stop().await? {
            Some(payload) => payload,
            None => return Ok(None),
        };

        if let Some(ref cb) = callbacks.on_recording_end {
            cb(&payload);
        }

        if payload.is_silent() {
            return Err(TurnError::NothingCaptured);
        }

        let audio_size = payload.human_readable_size();
        debug!(
            bytes = payload.size_bytes(),
            duration_ms = payload.duration_ms(),
            "uploading recording"
        );

        if let Some(ref cb) = callbacks.on_transcribing_start {
            cb();
        }

        let transcript = self.transcriber.transcribe(&payload).await?;
        info!(chars = transcript.chars().count(), "transcript received");

        if let Some(ref cb) = callbacks.on_transcript {
            cb(&transcript);
        }

        let turn = self.chat.send_text(&transcript, callbacks).await?;

        Ok(Some(VoiceTurnOutput {
            transcript,
            audio_size,
            turn,
        }))
    }

    pub async fn send_text(
        &self,
        text: &str,
        callbacks: &TurnCallbacks,
    ) -> Result<TextTurnOutput, TurnError> {
        self.chat.send_text(text, callbacks).await
    }

    pub async fn refresh_state(&self) -> Option<AssistantState> {
        self.chat.refresh_state().await
    }
}
