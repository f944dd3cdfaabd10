use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::peer_connection::configuration::{RTCAnswerOptions, RTCOfferOptions};
use crate::peer_connection::sdp::RTCSessionDescription;
use shared::error::{Error, Result, SdpCreationError, SdpSetError};

/// The four operations serialized by the operations chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCOperationKind {
    CreateOffer,
    CreateAnswer,
    SetLocalDescription,
    SetRemoteDescription,
}

impl RTCOperationKind {
    /// The failure reported when the connection closes before the operation
    /// finished.
    pub(crate) fn closed_error(&self) -> Error {
        match *self {
            RTCOperationKind::CreateOffer | RTCOperationKind::CreateAnswer => {
                SdpCreationError::Closed.into()
            }
            RTCOperationKind::SetLocalDescription | RTCOperationKind::SetRemoteDescription => {
                SdpSetError::Closed.into()
            }
        }
    }

    pub(crate) fn busy_error(&self) -> Error {
        match *self {
            RTCOperationKind::CreateOffer | RTCOperationKind::CreateAnswer => {
                SdpCreationError::OperationInProgress.into()
            }
            RTCOperationKind::SetLocalDescription | RTCOperationKind::SetRemoteDescription => {
                SdpSetError::OperationInProgress.into()
            }
        }
    }
}

impl fmt::Display for RTCOperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCOperationKind::CreateOffer => "CreateOffer",
            RTCOperationKind::CreateAnswer => "CreateAnswer",
            RTCOperationKind::SetLocalDescription => "SetLocalDescription",
            RTCOperationKind::SetRemoteDescription => "SetRemoteDescription",
        };
        write!(f, "{s}")
    }
}

/// The eventual result of an asynchronous negotiation operation.
///
/// Resolves exactly once. Await it, poll it with [`try_recv`](Self::try_recv),
/// or block on it from a non-async thread with
/// [`blocking_recv`](Self::blocking_recv). If the peer connection is dropped
/// without being closed the completion resolves with the operation's closed
/// error.
#[must_use = "a completion reports whether the operation succeeded"]
#[derive(Debug)]
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T>>,
    abandoned: Error,
}

impl<T> Completion<T> {
    /// Returns the result if it has been delivered, `None` while the
    /// operation is still in flight.
    pub fn try_recv(&mut self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(self.abandoned.clone())),
        }
    }

    /// Blocks the current thread until the result arrives. Must not be called
    /// from within an async runtime.
    pub fn blocking_recv(self) -> Result<T> {
        match self.rx.blocking_recv() {
            Ok(result) => result,
            Err(_) => Err(self.abandoned),
        }
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(this.abandoned.clone())),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// The delivering half of a [`Completion`]. Consumed by
/// [`complete`](Self::complete), so a result can only be sent once.
#[derive(Debug)]
pub(crate) struct CompletionSender<T> {
    tx: oneshot::Sender<Result<T>>,
}

impl<T> CompletionSender<T> {
    pub(crate) fn complete(self, result: Result<T>) {
        if self.tx.send(result).is_err() {
            log::trace!("completion receiver dropped before delivery");
        }
    }
}

pub(crate) fn completion<T>(kind: RTCOperationKind) -> (CompletionSender<T>, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    (
        CompletionSender { tx },
        Completion {
            rx,
            abandoned: kind.closed_error(),
        },
    )
}

/// An operation waiting in, or occupying, the operations chain.
#[derive(Debug)]
pub(crate) enum PendingOperation {
    CreateOffer {
        options: RTCOfferOptions,
        done: CompletionSender<RTCSessionDescription>,
    },
    CreateAnswer {
        options: RTCAnswerOptions,
        done: CompletionSender<RTCSessionDescription>,
    },
    SetLocalDescription {
        description: RTCSessionDescription,
        done: CompletionSender<()>,
    },
    SetRemoteDescription {
        description: RTCSessionDescription,
        done: CompletionSender<()>,
    },
}

impl PendingOperation {
    pub(crate) fn kind(&self) -> RTCOperationKind {
        match self {
            PendingOperation::CreateOffer { .. } => RTCOperationKind::CreateOffer,
            PendingOperation::CreateAnswer { .. } => RTCOperationKind::CreateAnswer,
            PendingOperation::SetLocalDescription { .. } => RTCOperationKind::SetLocalDescription,
            PendingOperation::SetRemoteDescription { .. } => RTCOperationKind::SetRemoteDescription,
        }
    }

    /// Resolves the operation's completion with `err`.
    pub(crate) fn fail(self, err: Error) {
        match self {
            PendingOperation::CreateOffer { done, .. }
            | PendingOperation::CreateAnswer { done, .. } => done.complete(Err(err)),
            PendingOperation::SetLocalDescription { done, .. }
            | PendingOperation::SetRemoteDescription { done, .. } => done.complete(Err(err)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_completion_delivers_once() {
        let (done, mut completion) = completion::<u32>(RTCOperationKind::CreateOffer);
        assert!(completion.try_recv().is_none());
        done.complete(Ok(7));
        assert_eq!(completion.try_recv(), Some(Ok(7)));
    }

    #[test]
    fn test_completion_abandoned() {
        let tests = vec![
            (RTCOperationKind::CreateOffer, Error::from(SdpCreationError::Closed)),
            (RTCOperationKind::CreateAnswer, Error::from(SdpCreationError::Closed)),
            (RTCOperationKind::SetLocalDescription, Error::from(SdpSetError::Closed)),
            (RTCOperationKind::SetRemoteDescription, Error::from(SdpSetError::Closed)),
        ];

        for (kind, expected) in tests {
            let (done, mut completion) = completion::<()>(kind);
            drop(done);
            assert_eq!(completion.try_recv(), Some(Err(expected)), "{kind}");
        }
    }

    #[test]
    fn test_pending_operation_fail() {
        let (done, completion) = completion(RTCOperationKind::SetRemoteDescription);
        let op = PendingOperation::SetRemoteDescription {
            description: RTCSessionDescription::rollback(),
            done,
        };
        assert_eq!(op.kind(), RTCOperationKind::SetRemoteDescription);
        op.fail(SdpSetError::CannotRollback.into());
        assert_eq!(
            completion.blocking_recv(),
            Err(Error::from(SdpSetError::CannotRollback))
        );
    }

    #[tokio::test]
    async fn test_completion_future() {
        let (done, completion) = completion::<&'static str>(RTCOperationKind::CreateAnswer);
        tokio::spawn(async move { done.complete(Ok("answer")) });
        assert_eq!(completion.await, Ok("answer"));
    }
}
