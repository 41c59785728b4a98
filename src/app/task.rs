//! Background thread for the hotkey dispatcher
//!
//! Runs the polling loop on its own thread so the main thread can pump
//! tray messages. Stopping is cooperative: the shared cancel token is set
//! and the loop returns at its next tick or sequence step boundary.

use std::thread::{self, JoinHandle};

use log::{debug, info};

use crate::app::cancel::CancelToken;
use crate::app::dispatcher::{DispatchExit, HotkeyDispatcher};
use crate::platform::{KeyboardState, PointerDevice, WindowProbe};

/// Dispatcher task errors
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to spawn dispatcher thread: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Dispatcher task not running")]
    NotRunning,

    #[error("Dispatcher thread panicked")]
    ThreadJoinFailed,
}

/// Handle to a running dispatcher loop
///
/// Dropping the handle stops the loop and joins the thread.
pub struct DispatcherTask {
    thread_handle: Option<JoinHandle<DispatchExit>>,
    cancel: CancelToken,
}

impl DispatcherTask {
    /// Starts `dispatcher` on a dedicated thread
    pub fn start<P, W, K>(dispatcher: HotkeyDispatcher<P, W, K>) -> Result<Self, DispatchError>
    where
        P: PointerDevice + Send + 'static,
        W: WindowProbe + Send + 'static,
        K: KeyboardState + Send + 'static,
    {
        let cancel = dispatcher.sequencer().cancel_token().clone();

        let handle = thread::Builder::new()
            .name("hotkey-dispatcher".into())
            .spawn(move || {
                let exit = dispatcher.run();
                debug!("dispatcher loop returned: {exit:?}");
                exit
            })
            .map_err(DispatchError::SpawnFailed)?;

        Ok(Self {
            thread_handle: Some(handle),
            cancel,
        })
    }

    /// Token shared with the loop and the sequences it runs
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Whether the loop is still polling
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signals the loop to stop and waits for the thread
    ///
    /// # Returns
    /// How the loop ended. If it had already stopped on the exit key, that
    /// is what is reported.
    pub fn stop(&mut self) -> Result<DispatchExit, DispatchError> {
        let handle = self.thread_handle.take().ok_or(DispatchError::NotRunning)?;

        self.cancel.cancel();
        let exit = handle.join().map_err(|_| DispatchError::ThreadJoinFailed)?;
        info!("dispatcher stopped ({exit:?})");
        Ok(exit)
    }
}

impl Drop for DispatcherTask {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
