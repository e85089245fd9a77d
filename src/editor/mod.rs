//! Editor controller.
//!
//! Turns user intents into session transitions and drives the collaborators.
//! Everything runs on the thread that owns the [`Editor`]; collaborators that
//! finish later post their completion back through the intent queue, which is
//! drained by [`Editor::run_pending`].

pub mod file;
pub mod services;

use crate::config::EditorConfig;
use crate::core::error::{AcquireError, SaveError};
use crate::core::types::ImageValue;
use crate::engine::ImageEngine;
use crate::pipeline::catalog::FilterId;
use crate::pipeline::render::{ProcessingPipeline, RenderResult};
use crate::pipeline::session::SessionState;
use crossbeam::channel::{self, Receiver, Sender};
use std::sync::Arc;

pub use file::{DirectoryLibrary, FileImageSource, LogPresenter};
pub use services::{ImageSource, Notification, PhotoLibrary, Presenter};

/// Something the user did, or a collaborator finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// A filter was chosen from the menu.
    FilterSelected(FilterId),
    /// The slider moved.
    IntensityChanged(f64),
    /// The user asked to pick a new image.
    PickRequested,
    /// The image source delivered an image.
    ImagePicked(ImageValue),
    /// The user dismissed the picker without choosing.
    PickCancelled,
    /// The user asked to save the displayed image.
    SaveRequested,
    /// The library finished a save.
    SaveFinished(Result<(), SaveError>),
}

/// Cloneable handle for posting intents back to an editor.
#[derive(Debug, Clone)]
pub struct IntentSender {
    tx: Sender<Intent>,
}

impl IntentSender {
    /// Queue an intent. Dropped silently once the editor is gone.
    pub fn send(&self, intent: Intent) {
        if self.tx.send(intent).is_err() {
            log::debug!("Editor gone, dropping intent");
        }
    }
}

/// The photo-editing screen without its widgets.
pub struct Editor {
    pipeline: ProcessingPipeline,
    session: SessionState,
    source: Box<dyn ImageSource>,
    library: Box<dyn PhotoLibrary>,
    presenter: Box<dyn Presenter>,
    tx: Sender<Intent>,
    rx: Receiver<Intent>,
    pick_pending: bool,
}

impl Editor {
    /// Create an editor over an existing pipeline and session.
    pub fn new(
        pipeline: ProcessingPipeline,
        session: SessionState,
        source: Box<dyn ImageSource>,
        library: Box<dyn PhotoLibrary>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        let (tx, rx) = channel::unbounded();
        Self {
            pipeline,
            session,
            source,
            library,
            presenter,
            tx,
            rx,
            pick_pending: false,
        }
    }

    /// Create an editor from configuration, with the default filter selected.
    pub fn from_config(
        config: &EditorConfig,
        engine: Arc<dyn ImageEngine>,
        source: Box<dyn ImageSource>,
        library: Box<dyn PhotoLibrary>,
        presenter: Box<dyn Presenter>,
    ) -> Self {
        let pipeline = ProcessingPipeline::new(engine)
            .with_catalog(config.catalog())
            .with_policy(config.policy());
        let session =
            SessionState::with_default_filter(&pipeline, config.default_filter, config.intensity());
        Self::new(pipeline, session, source, library, presenter)
    }

    /// Handle for posting intents.
    pub fn sender(&self) -> IntentSender {
        IntentSender {
            tx: self.tx.clone(),
        }
    }

    /// The session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The processing pipeline.
    pub fn pipeline(&self) -> &ProcessingPipeline {
        &self.pipeline
    }

    /// Whether an image request is in flight.
    pub fn is_picking(&self) -> bool {
        self.pick_pending
    }

    /// Handle every queued intent. Returns how many were handled.
    pub fn run_pending(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(intent) = self.rx.try_recv() {
            self.handle(intent);
            handled += 1;
        }
        handled
    }

    /// Perform the transition for one intent.
    pub fn handle(&mut self, intent: Intent) {
        match intent {
            Intent::FilterSelected(id) => match self.session.select_filter(&self.pipeline, id) {
                Ok(result) => self.show(result),
                Err(e) => log::warn!("Keeping current filter: {}", e),
            },
            Intent::IntensityChanged(value) => {
                let result = self.session.set_intensity(&self.pipeline, value);
                self.show(result);
            }
            Intent::PickRequested => {
                if let Err(e) = self.request_pick() {
                    log::debug!("Pick not started: {}", e);
                }
            }
            Intent::ImagePicked(image) => {
                log::info!("Picked {}x{} image", image.width(), image.height());
                let result = self.session.set_image(&self.pipeline, image);
                self.show(result);
                self.finish_pick();
            }
            Intent::PickCancelled => {
                log::debug!("Pick cancelled");
                self.finish_pick();
            }
            Intent::SaveRequested => match self.session.displayed() {
                Some(image) => {
                    log::info!("Saving {}x{} image", image.width(), image.height());
                    let image = image.clone();
                    let reply = self.sender();
                    self.library.save(image, reply);
                }
                None => self.presenter.notify(Notification::nothing_to_save()),
            },
            Intent::SaveFinished(Ok(())) => self.presenter.notify(Notification::saved()),
            Intent::SaveFinished(Err(e)) => {
                log::warn!("Save failed: {}", e);
                self.presenter.notify(Notification::save_failed(&e));
            }
        }
    }

    /// Start acquiring a new source image.
    ///
    /// Only one request may be in flight; the overlay stays up until the
    /// source reports back.
    pub fn request_pick(&mut self) -> Result<(), AcquireError> {
        if self.pick_pending {
            return Err(AcquireError::AlreadyPending);
        }

        self.pick_pending = true;
        self.presenter.show_overlay();
        let reply = self.sender();
        if let Err(e) = self.source.request_image(reply) {
            log::warn!("Could not start image request: {}", e);
            self.finish_pick();
            return Err(e);
        }
        Ok(())
    }

    fn finish_pick(&mut self) {
        self.pick_pending = false;
        self.presenter.hide_overlay();
    }

    fn show(&mut self, result: RenderResult) {
        if let RenderResult::Image(image) = result {
            self.presenter.display(&image);
        }
    }
}
