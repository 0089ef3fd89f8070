//! Host screen
//!
//! A [`Screen`] owns the sampler and the notifier for one visible screen.
//! The sampler runs while the screen is started and is stopped on every
//! teardown path: `on_stop`, `close`, or simply dropping the screen.

use log::debug;
use pulse_sens_core::{
    NotificationRequest, Position, Sampler, SamplerConfig, SamplerError, SamplerState,
    SharedNotifier, SharedValueSource,
};
use tokio::runtime::Handle;

pub struct Screen {
    config: SamplerConfig,
    source: SharedValueSource,
    notifier: SharedNotifier,
    sampler: Sampler,
}

impl Screen {
    /// Create a screen whose sampler runs on the ambient tokio runtime
    pub fn new(config: SamplerConfig, source: SharedValueSource, notifier: SharedNotifier) -> Self {
        Self {
            config,
            source,
            notifier,
            sampler: Sampler::new(),
        }
    }

    /// Create a screen whose sampler runs on `handle`
    pub fn with_handle(
        config: SamplerConfig,
        source: SharedValueSource,
        notifier: SharedNotifier,
        handle: Handle,
    ) -> Self {
        Self {
            config,
            source,
            notifier,
            sampler: Sampler::with_handle(handle),
        }
    }

    /// Screen became active: start the periodic check
    pub fn on_start(&self) -> Result<SamplerState, SamplerError> {
        self.sampler
            .start(&self.config, self.source.clone(), self.notifier.clone())
    }

    /// Screen became inactive: stop the periodic check
    pub fn on_stop(&self) {
        self.sampler.stop();
    }

    /// Tear the screen down, waiting for the background task to exit
    pub async fn close(self) {
        self.sampler.shutdown().await;
    }

    /// Example button handler
    pub fn click(&self) {
        self.notifier.notify(&NotificationRequest::click());
    }

    /// Show `message` at the position named by `hint` ("top", "center", else bottom)
    pub fn notify(&self, message: &str, hint: &str) {
        self.notifier.display(message, Position::from_hint(hint));
    }

    pub fn notifier(&self) -> &SharedNotifier {
        &self.notifier
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        debug!("Screen torn down");
        self.sampler.stop();
    }
}
