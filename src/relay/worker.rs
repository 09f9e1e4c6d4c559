//! Background execution of relay calls.
//!
//! The UI thread must never block on HTTP.  [`RelayWorker::submit`] spawns
//! the call on the tokio runtime and hands back a [`PendingReply`] which the
//! owning screen polls once per frame.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use super::{Relay, RelayError};
use crate::profile::Profile;

/// Cloneable handle that runs relay calls on a tokio runtime.
#[derive(Clone)]
pub struct RelayWorker {
    relay: Arc<dyn Relay>,
    runtime: Handle,
}

impl RelayWorker {
    pub fn new(relay: Arc<dyn Relay>, runtime: Handle) -> Self {
        Self { relay, runtime }
    }

    /// Start one relay call in the background.
    pub fn submit(
        &self,
        message: String,
        profile: Profile,
        system_prompt: String,
    ) -> PendingReply {
        let (tx, rx) = oneshot::channel();
        let relay = Arc::clone(&self.relay);

        self.runtime.spawn(async move {
            let result = relay.relay(&message, &profile, &system_prompt).await;
            // The receiver is gone when the screen was left; nothing to do.
            let _ = tx.send(result);
        });

        PendingReply { rx }
    }
}

/// A relay call that may still be running.
pub struct PendingReply {
    rx: oneshot::Receiver<Result<String, RelayError>>,
}

impl PendingReply {
    /// Non-blocking check for completion.
    ///
    /// Returns `None` while the call is in flight.  Once a value has been
    /// returned the reply is spent and must be dropped.
    pub fn poll(&mut self) -> Option<Result<String, RelayError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(RelayError::Network(
                "Request was interrupted".into(),
            ))),
        }
    }

    /// Build an already-completed reply.
    #[cfg(test)]
    pub fn ready(result: Result<String, RelayError>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    use crate::profile::Provider;

    struct Echo;

    #[async_trait]
    impl Relay for Echo {
        async fn relay(
            &self,
            message: &str,
            _profile: &Profile,
            system_prompt: &str,
        ) -> Result<String, RelayError> {
            Ok(format!("{system_prompt}|{message}"))
        }
    }

    fn profile() -> Profile {
        Profile {
            name: "T".into(),
            native_language: "Tamil".into(),
            ai_provider: Provider::Groq,
            api_key: "k".into(),
        }
    }

    fn wait(pending: &mut PendingReply) -> Result<String, RelayError> {
        for _ in 0..200 {
            if let Some(result) = pending.poll() {
                return result;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("relay did not complete");
    }

    #[test]
    fn submit_delivers_result_through_poll() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let worker = RelayWorker::new(Arc::new(Echo), rt.handle().clone());

        let mut pending = worker.submit("hi".into(), profile(), "sys".into());
        assert_eq!(wait(&mut pending).unwrap(), "sys|hi");
    }

    #[test]
    fn ready_reply_polls_immediately() {
        let mut pending = PendingReply::ready(Err(RelayError::Configuration("x".into())));
        assert_eq!(
            pending.poll(),
            Some(Err(RelayError::Configuration("x".into())))
        );
    }
}
