//! Trigger sources that drive [`CodeService::run_once`].
//!
//! Every source is its own tokio task and returns a `JoinHandle` the caller
//! aborts on shutdown. A source processes its own events one after another;
//! runs from different sources may overlap.

use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::models::{DeliveryResult, TriggerSource};
use crate::service::{CodeService, RunReport};

/// Sender half of an event-driven trigger (hotkey registrar, signal handler).
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    tx: mpsc::UnboundedSender<()>,
}

impl TriggerHandle {
    /// Request one run. Returns `false` once the trigger task has stopped.
    pub fn fire(&self) -> bool {
        self.tx.send(()).is_ok()
    }
}

/// Receiver half, consumed by [`spawn_channel_trigger`].
#[derive(Debug)]
pub struct TriggerReceiver {
    rx: mpsc::UnboundedReceiver<()>,
}

pub fn trigger_channel() -> (TriggerHandle, TriggerReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TriggerHandle { tx }, TriggerReceiver { rx })
}

/// Run periodically every `period`.
///
/// The first run happens one full period after spawning; the startup run
/// covers time zero. Ticks missed while a run is in flight are delayed, not
/// bunched up.
pub fn spawn_timer_trigger(service: CodeService, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(interval_secs = period.as_secs(), "Timer trigger started");

        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            service.run_once(TriggerSource::Timer).await;
        }
    })
}

/// Run once per [`TriggerHandle::fire`]. Stops when every handle is dropped.
pub fn spawn_channel_trigger(
    service: CodeService,
    mut receiver: TriggerReceiver,
    source: TriggerSource,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(source = %source, "Trigger listener started");

        while receiver.rx.recv().await.is_some() {
            service.run_once(source).await;
        }

        tracing::debug!(source = %source, "Trigger channel closed, stopping");
    })
}

/// Run once per line read from `reader`; stops at end of input.
///
/// A line reading `c` copies the last delivered code again instead of
/// fetching. The code is echoed to stdout since the requester is looking at
/// the terminal.
pub fn spawn_line_trigger<R>(service: CodeService, reader: R) -> JoinHandle<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = reader.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().eq_ignore_ascii_case("c") => {
                    recopy(&service).await;
                }
                Ok(Some(_)) => {
                    let report = service.run_once(TriggerSource::Manual).await;
                    print_report(&report);
                }
                Ok(None) => {
                    tracing::debug!("Input closed, stopping manual trigger");
                    break;
                }
                Err(e) => {
                    tracing::warn!("Failed to read manual trigger input: {}", e);
                    break;
                }
            }
        }
    })
}

/// Manual trigger on the process's stdin.
pub fn spawn_stdin_trigger(service: CodeService) -> JoinHandle<()> {
    spawn_line_trigger(service, tokio::io::BufReader::new(tokio::io::stdin()))
}

/// Fire `handle` on every SIGUSR1, so a desktop shortcut can run
/// `pkill -USR1 codefetch` to act as the hotkey.
#[cfg(unix)]
pub fn spawn_signal_forwarder(handle: TriggerHandle) -> std::io::Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut signals = signal(SignalKind::user_defined1())?;
    Ok(tokio::spawn(async move {
        while signals.recv().await.is_some() {
            tracing::debug!("SIGUSR1 received");
            if !handle.fire() {
                break;
            }
        }
    }))
}

async fn recopy(service: &CodeService) {
    let dispatcher = service.dispatcher();
    match dispatcher.recopy_last().await {
        Some(DeliveryResult::Delivered) => {
            if let Some(code) = dispatcher.last_delivered().await {
                println!("{} (copied again)", code);
            }
        }
        Some(_) => println!("Clipboard unavailable"),
        None => println!("No verification code delivered yet"),
    }
}

fn print_report(report: &RunReport) {
    match report.code() {
        Some(code) => println!("{} ({})", code, report.outcome.label()),
        None => println!("No verification code available"),
    }
}
