//! JSON-lines worker loop.
//!
//! Reads one [`Request`] per line and writes one [`Response`] per line. `apply` requests run
//! detached from the loop, so a slow parse never blocks reading the next request or a
//! `cancel` for it. In-flight requests live in a [`Correlator`] owned by the loop; each
//! one leaves it exactly once, on completion, cancellation or timeout.

use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info, warn};

use crate::correlator::{Correlator, RequestId};
use crate::engine::Engine;
use crate::error::Result;
use crate::mods::ModFailure;
use crate::protocol::{Call, Outcome, Request, Response};

/// Longest pause between deadline sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_millis(250);

struct Completion {
    id: RequestId,
    outcome: Outcome,
}

/// Serves requests from `input` until it closes and every in-flight request is settled.
pub async fn serve<R, W>(engine: Engine, input: R, mut output: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    // A zero period would make the sweep interval panic.
    let timeout = Duration::from_millis(engine.config().request_timeout_ms.max(1));
    let mut correlator: Correlator<AbortHandle> = Correlator::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
    let mut lines = BufReader::new(input).lines();
    let mut sweep = tokio::time::interval(timeout.min(SWEEP_INTERVAL));
    let mut input_open = true;

    info!(timeout_ms = timeout.as_millis() as u64, "serving requests");

    while input_open || !correlator.is_empty() {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        if let Some(response) =
                            dispatch(&engine, &line, &mut correlator, &tx, timeout)
                        {
                            write_response(&mut output, &response).await?;
                        }
                    }
                    None => {
                        debug!(pending = correlator.len(), "input closed");
                        input_open = false;
                    }
                }
            }
            Some(completion) = rx.recv() => {
                if correlator.complete(completion.id).is_some() {
                    let response = Response::new(Some(completion.id), completion.outcome);
                    write_response(&mut output, &response).await?;
                } else {
                    debug!(id = completion.id, "dropping response for settled request");
                }
            }
            _ = sweep.tick() => {
                for (id, handle) in correlator.evict_expired(Instant::now()) {
                    handle.abort();
                    warn!(id, timeout_ms = timeout.as_millis() as u64, "request timed out");
                    let failure = ModFailure::unclassified(format!(
                        "request timed out after {}ms",
                        timeout.as_millis()
                    ));
                    write_response(&mut output, &Response::new(Some(id), Outcome::Error(failure)))
                        .await?;
                }
            }
        }
    }

    output.flush().await?;
    Ok(())
}

/// Handles one request line. Returns the response to write now, if any; `apply` responses
/// arrive later through `tx`.
fn dispatch(
    engine: &Engine,
    line: &str,
    correlator: &mut Correlator<AbortHandle>,
    tx: &mpsc::UnboundedSender<Completion>,
    timeout: Duration,
) -> Option<Response> {
    let request = match Request::parse(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "rejecting request");
            return Some(Response::new(None, e.into()));
        }
    };
    let id = request.id;

    let call = match request.call() {
        Ok(call) => call,
        Err(e) => {
            warn!(?id, error = %e, "rejecting request");
            return Some(Response::new(id, e.into()));
        }
    };

    match call {
        Call::Mods => Some(Response::new(id, Outcome::mods())),
        Call::Cancel(params) => {
            if let Some(handle) = correlator.cancel(params.id) {
                handle.abort();
            }
            None
        }
        Call::Apply(params) => {
            let Some(id) = id else {
                let failure = ModFailure::unclassified("apply requires an id");
                return Some(Response::new(None, Outcome::Error(failure)));
            };
            if correlator.contains(id) {
                let failure =
                    ModFailure::unclassified(format!("request id {id} is already in flight"));
                return Some(Response::new(Some(id), Outcome::Error(failure)));
            }

            debug!(id, mod_name = params.mod_name.name(), "dispatching apply");
            let engine = engine.clone();
            let tx = tx.clone();
            let task = tokio::spawn(async move {
                let result = engine.run_detached(params.mod_name, params.context()).await;
                let outcome = Outcome::from_mod(params.mod_name, &result);
                // The loop may have exited after a timeout; nothing to report then.
                let _ = tx.send(Completion { id, outcome });
            });

            match correlator.insert(id, task.abort_handle(), Instant::now() + timeout) {
                Ok(()) => None,
                Err(e) => {
                    task.abort();
                    Some(Response::new(Some(id), e.into()))
                }
            }
        }
    }
}

async fn write_response<W: AsyncWrite + Unpin>(output: &mut W, response: &Response) -> Result<()> {
    let mut line = response.to_line()?;
    line.push('\n');
    output.write_all(line.as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
