//! Presence subscription: the one realtime connection the client holds.
//!
//! Opening a subscription dials the realtime server with the user's id and
//! spawns a task that owns the connection. The task applies roster pushes
//! to a shared `watch` channel and logs connection errors. The
//! [`PresenceSubscription`] handle is the only way to stop it.
//!
//! ```text
//! SessionManager ── open() ──→ Connector::connect(userId)
//!       │                             │
//!       │ holds handle                ▼
//!       │                     presence task (owns Connection)
//!       │                        ├─ getOnlineUsers → watch::Sender<OnlineUsers>
//!       │                        └─ connect_error  → tracing::error!
//!       └── cancel() / Drop ──→ oneshot → task closes the connection
//! ```

use std::sync::Arc;

use parley_protocol::{
    Codec, OnlineUsers, RealtimeEvent, USER_ID_QUERY, UserId,
};
use parley_transport::{Connection, ConnectionId, Connector, TransportError};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// Handle to a running presence connection.
///
/// Dropping the handle releases the connection: `Drop` signals the task,
/// which closes the connection and exits. Use [`cancel`](Self::cancel) to
/// also wait until the close has happened.
#[derive(Debug)]
pub struct PresenceSubscription {
    user_id: UserId,
    connection_id: ConnectionId,
    cancel: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PresenceSubscription {
    /// Connects as `user_id` and starts the presence task.
    ///
    /// Must be called from inside a Tokio runtime.
    ///
    /// # Errors
    /// Returns the connector's error if the connection can't be opened.
    pub async fn open<C, K>(
        connector: &C,
        codec: K,
        user_id: UserId,
        online: Arc<watch::Sender<OnlineUsers>>,
    ) -> Result<Self, TransportError>
    where
        C: Connector,
        K: Codec,
    {
        let conn = connector
            .connect(&[(USER_ID_QUERY, user_id.as_str())])
            .await?;
        let connection_id = conn.id();
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let task = tokio::spawn(run_presence(
            conn,
            codec,
            user_id.clone(),
            online,
            cancel_rx,
        ));

        tracing::info!(%user_id, %connection_id, "presence connection opened");
        Ok(Self {
            user_id,
            connection_id,
            cancel: Some(cancel_tx),
            task: Some(task),
        })
    }

    /// The user this connection was opened for.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// The transport's id for the underlying connection.
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Returns `true` while the presence task is still running.
    ///
    /// Becomes `false` once the server closes the connection or a
    /// receive error ends the task.
    pub fn is_live(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the presence task and waits for it to close the connection.
    pub async fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(
                    user_id = %self.user_id,
                    error = %e,
                    "presence task ended abnormally"
                );
            }
        }
    }
}

impl Drop for PresenceSubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            // The task may already be gone; nothing left to release then.
            let _ = cancel.send(());
        }
    }
}

/// Body of the presence task. Runs until cancelled or the connection ends.
async fn run_presence<C, K>(
    conn: C,
    codec: K,
    user_id: UserId,
    online: Arc<watch::Sender<OnlineUsers>>,
    mut cancel: oneshot::Receiver<()>,
) where
    C: Connection,
    K: Codec,
{
    loop {
        tokio::select! {
            // Fires on an explicit cancel and when the handle's sender is
            // dropped without sending.
            _ = &mut cancel => {
                if let Err(e) = conn.close().await {
                    tracing::debug!(%user_id, error = %e, "presence close failed");
                }
                tracing::info!(%user_id, "presence connection closed");
                return;
            }
            frame = conn.recv() => match frame {
                Ok(Some(bytes)) => apply_frame(&codec, &bytes, &online),
                Ok(None) => {
                    tracing::info!(%user_id, "realtime server closed the presence connection");
                    return;
                }
                Err(e) => {
                    tracing::error!(%user_id, error = %e, "realtime connection error");
                    return;
                }
            },
        }
    }
}

/// Decodes one frame and applies it.
fn apply_frame<K: Codec>(
    codec: &K,
    bytes: &[u8],
    online: &watch::Sender<OnlineUsers>,
) {
    match codec.decode::<RealtimeEvent>(bytes) {
        Ok(RealtimeEvent::GetOnlineUsers(ids)) => {
            let roster: OnlineUsers = ids.into_iter().collect();
            tracing::debug!(count = roster.len(), "online users updated");
            online.send_replace(roster);
        }
        Ok(RealtimeEvent::ConnectError(detail)) => {
            tracing::error!(error = detail.message(), "realtime connection error");
        }
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unrecognised realtime frame");
        }
    }
}
