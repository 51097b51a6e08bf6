//! Utility types for the SolCourier SDK

/// Cancellation primitives shared by the transfer and confirmation paths
pub mod cancel {
    use tokio::sync::watch;

    /// Create a linked cancellation handle/token pair
    pub fn pair() -> (CancelHandle, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelToken { rx })
    }

    /// Caller-side handle used to cancel in-flight operations
    pub struct CancelHandle {
        tx: watch::Sender<bool>,
    }

    impl CancelHandle {
        /// Signal cancellation to every linked token
        pub fn cancel(&self) {
            let _ = self.tx.send(true);
        }
    }

    /// Token observed by long-running operations
    #[derive(Debug, Clone)]
    pub struct CancelToken {
        rx: watch::Receiver<bool>,
    }

    impl CancelToken {
        /// Token that can never fire, for callers that do not need cancellation
        pub fn never() -> Self {
            let (_tx, rx) = watch::channel(false);
            Self { rx }
        }

        /// Check without waiting
        pub fn is_cancelled(&self) -> bool {
            *self.rx.borrow()
        }

        /// Resolve once cancellation is signalled.
        ///
        /// If the handle was dropped without cancelling, this pends forever;
        /// the surrounding select loop falls through to its other branches.
        pub async fn cancelled(&mut self) {
            loop {
                if *self.rx.borrow() {
                    return;
                }
                if self.rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
        }
    }

}

pub use cancel::{CancelHandle, CancelToken};
