use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Error, Debug)]
#[error("Callback returned an error")]
pub enum CallbackError<TInner> {
    Inner(#[from] TInner),
}

pub type SendCallback<TError> = oneshot::Sender<Result<(), CallbackError<TError>>>;

/// Data queued for a writer task, optionally with a channel to report the write result on.
#[derive(Debug)]
pub struct WithCallback<TData, TError> {
    pub callback: Option<SendCallback<TError>>,
    pub data: TData,
}

impl<TData, TError> WithCallback<TData, TError> {
    pub fn new(callback: SendCallback<TError>, data: TData) -> Self {
        Self {
            callback: Some(callback),
            data,
        }
    }

    pub fn without_callback(data: TData) -> Self {
        Self {
            callback: None,
            data,
        }
    }

    /// Reports the result to whoever is waiting. Nobody waiting is fine.
    pub fn complete(callback: Option<SendCallback<TError>>, result: Result<(), TError>) {
        if let Some(callback) = callback {
            let _ = callback.send(result.map_err(CallbackError::Inner));
        }
    }
}
