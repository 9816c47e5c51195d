use crate::engines::generation::evolution_engine::{
    CancellationToken, EvolutionConfig, EvolutionEngine, EvolutionOutcome,
};
use crate::engines::generation::progress::{ChannelProgressCallback, ProgressMessage};
use crate::error::{CrossgaError, Result};
use crate::types::PriceSeries;
use std::sync::mpsc::{channel, Receiver};
use std::thread::{self, JoinHandle};

/// Runs a search on a background thread so a caller (UI, CLI spinner)
/// can poll progress and cancel.
pub struct EvolutionRunner {
    handle: Option<JoinHandle<Result<EvolutionOutcome>>>,
    progress_rx: Receiver<ProgressMessage>,
    cancel: CancellationToken,
}

impl EvolutionRunner {
    /// Validate the configuration and start the search thread.
    pub fn start(prices: PriceSeries, config: EvolutionConfig) -> Result<Self> {
        let (progress_tx, progress_rx) = channel();
        let cancel = CancellationToken::new();
        let mut engine = EvolutionEngine::new(config)?.with_cancellation(cancel.clone());

        let handle = thread::Builder::new()
            .name("crossga-search".to_string())
            .spawn(move || {
                log::debug!("Search thread started with {} bars", prices.len());
                engine.run(&prices, ChannelProgressCallback::new(progress_tx))
            })?;

        Ok(Self {
            handle: Some(handle),
            progress_rx,
            cancel,
        })
    }

    /// Poll for progress updates (non-blocking)
    pub fn poll_progress(&self) -> Option<ProgressMessage> {
        self.progress_rx.try_recv().ok()
    }

    /// Check if the search is complete and take its result
    pub fn try_get_results(&mut self) -> Option<Result<EvolutionOutcome>> {
        let handle = self.handle.take()?;
        if handle.is_finished() {
            Some(Self::join(handle))
        } else {
            self.handle = Some(handle);
            None
        }
    }

    /// Block until the search finishes.
    pub fn wait(mut self) -> Result<EvolutionOutcome> {
        match self.handle.take() {
            Some(handle) => Self::join(handle),
            None => Err(CrossgaError::Generation(
                "Search result was already taken".to_string(),
            )),
        }
    }

    /// Ask the search to stop after the current generation. The best
    /// individual found so far is still returned.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    fn join(handle: JoinHandle<Result<EvolutionOutcome>>) -> Result<EvolutionOutcome> {
        handle.join().unwrap_or_else(|_| {
            Err(CrossgaError::Generation("Search thread panicked".to_string()))
        })
    }
}

impl Drop for EvolutionRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}
