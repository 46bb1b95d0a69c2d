use parking_lot::Mutex;

type Callback = Box<dyn FnOnce() + Send>;

/// Runs a callback exactly once, on the first [`dispose`](Self::dispose) call
/// or when dropped, whichever happens first.
///
/// Dropping without `dispose` is a caller bug: it is logged at `warn`, but the
/// callback still runs so the guarded resource is released.
///
/// `dispose` may race from several threads; only one of them runs the callback.
pub struct CallbackOnDispose {
    callback: Mutex<Option<Callback>>,
}

impl CallbackOnDispose {
    pub fn new(callback: impl FnOnce() + Send + 'static) -> Self {
        Self {
            callback: Mutex::new(Some(Box::new(callback))),
        }
    }

    pub fn dispose(&self) {
        // Take the callback first so it runs without the lock held.
        let callback = self.callback.lock().take();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.callback.lock().is_none()
    }
}

impl Drop for CallbackOnDispose {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.get_mut().take() {
            tracing::warn!(
                target: "scribe.workbench",
                "CallbackOnDispose dropped without dispose; running callback"
            );
            callback();
        }
    }
}

impl std::fmt::Debug for CallbackOnDispose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackOnDispose")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
