// Per-user interaction state: which file is chosen and where the last
// submission ended up.
//
//   Idle -> AwaitingUpload -> Validated | Rejected
//   Validated -> Submitting -> Succeeded | NetworkFailed | DecodeFailed
//
// A terminal state still holding a validated file may submit again.

use crate::api::Predictor;
use crate::asset::UploadedAsset;
use crate::error::{PredictError, SessionError};
use crate::render::{render_outcome, render_rejection, Panel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingUpload,
    Validated,
    Rejected,
    Submitting,
    Succeeded,
    NetworkFailed,
    DecodeFailed,
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    asset: Option<UploadedAsset>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            state: SessionState::Idle,
            asset: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn asset(&self) -> Option<&UploadedAsset> {
        self.asset.as_ref()
    }

    /// The picker is open; any previous file is forgotten.
    pub fn begin_upload(&mut self) {
        self.asset = None;
        self.state = SessionState::AwaitingUpload;
    }

    /// The user closed the picker without choosing.
    pub fn cancel_upload(&mut self) {
        if self.state == SessionState::AwaitingUpload {
            self.state = SessionState::Idle;
        }
    }

    /// Take a chosen file and run the media type gate. Returns the warning
    /// panel when the file is rejected.
    pub fn accept(&mut self, asset: UploadedAsset) -> Option<Panel> {
        let warning = if asset.validate_type() {
            self.state = SessionState::Validated;
            None
        } else {
            log::info!(
                "rejected {} (declared {})",
                asset.file_name(),
                asset.media_type()
            );
            self.state = SessionState::Rejected;
            Some(render_rejection(&asset))
        };
        self.asset = Some(asset);
        warning
    }

    pub fn can_submit(&self) -> bool {
        self.asset.is_some()
            && matches!(
                self.state,
                SessionState::Validated
                    | SessionState::Succeeded
                    | SessionState::NetworkFailed
                    | SessionState::DecodeFailed
            )
    }

    /// Send the validated file through `predictor` exactly once and return
    /// the panel to show.
    pub fn submit<P>(&mut self, predictor: &P) -> Result<Panel, SessionError>
    where
        P: Predictor + ?Sized,
    {
        if !self.can_submit() {
            return Err(match (&self.asset, self.state) {
                (Some(_), SessionState::Rejected) => SessionError::NotValidated,
                _ => SessionError::NoAsset,
            });
        }
        let asset = self.asset.as_ref().ok_or(SessionError::NoAsset)?;

        self.state = SessionState::Submitting;
        let outcome = predictor.predict(asset);
        self.state = match &outcome {
            Ok(_) => SessionState::Succeeded,
            Err(PredictError::Network(_)) => SessionState::NetworkFailed,
            Err(PredictError::Decode(_)) => SessionState::DecodeFailed,
        };
        log::debug!("submission finished in {:?}", self.state);
        Ok(render_outcome(&outcome))
    }
}
