//! # Live Refresh Loop
//!
//! Drives a [`DisplayEngine`] from three timers and an operator command channel,
//! and publishes a fresh [`DisplayFrame`] whenever the visible output changes.
//!
//! ## Key Features:
//! - **One owner**: the loop is the only writer of engine state; renderers get
//!   frames through a `watch` channel and never see a half-applied update.
//! - **Ordered polls**: each poll is spawned with a monotonically increasing
//!   sequence number. A slow poll that completes after a newer one is discarded
//!   by the engine.
//! - **Fail quiet**: a failed poll is logged and the previous screen stays up.
//! - **Graceful shutdown**: a broadcast signal, or dropping the command sender,
//!   stops the loop and aborts any in-flight request.

use std::future::Future;
use std::sync::Arc;

use chrono::Local;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::engine::{
    DisplayEngine, DisplayFrame, EngineEvent, Transition, LANGUAGE_INTERVAL, PAGE_INTERVAL,
    POLL_INTERVAL,
};
use crate::models::PagingEntry;
use crate::retrieve::{ClientError, PagingClient};

/// # Paging Source
///
/// Anything that can return the full paging table.
pub trait PagingSource: Send + Sync + 'static {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<PagingEntry>, ClientError>> + Send;
}

impl PagingSource for PagingClient {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<PagingEntry>, ClientError>> + Send {
        self.get_pagings()
    }
}

/// Operator input for a running display.
#[derive(Debug, Clone)]
pub enum RuntimeCommand {
    /// Bind the screen to another belt; `None` or `""` unbinds it.
    SetBelt(Option<String>),
}

/// # Display Runtime
///
/// Owns the engine and its timers. Build it with [`DisplayRuntime::new`], keep the
/// returned receiver for rendering, then drive it with [`DisplayRuntime::run`].
pub struct DisplayRuntime<S: PagingSource> {
    source: Arc<S>,
    engine: DisplayEngine,
    frames: watch::Sender<DisplayFrame>,
}

impl<S: PagingSource> DisplayRuntime<S> {
    pub fn new(source: Arc<S>, belt_no: Option<String>) -> (Self, watch::Receiver<DisplayFrame>) {
        let engine = DisplayEngine::new(belt_no);
        let (frames, rx) = watch::channel(engine.frame(Local::now().date_naive()));
        (
            Self {
                source,
                engine,
                frames,
            },
            rx,
        )
    }

    /// # Run
    ///
    /// Runs until `shutdown` fires or every command sender is dropped. Polling
    /// only happens while a belt is bound; binding a belt polls right away.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<RuntimeCommand>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        info!(belt_no = ?self.engine.belt_no(), "Display runtime started");

        let mut poll = interval(POLL_INTERVAL);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut page = interval_at(Instant::now() + PAGE_INTERVAL, PAGE_INTERVAL);
        let mut language = interval_at(Instant::now() + LANGUAGE_INTERVAL, LANGUAGE_INTERVAL);

        let mut inflight: JoinSet<(u64, Result<Vec<PagingEntry>, ClientError>)> = JoinSet::new();
        let mut next_seq: u64 = 0;

        loop {
            let has_belt = self.engine.belt_no().is_some();

            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Display runtime shutting down");
                    break;
                }

                command = commands.recv() => match command {
                    Some(RuntimeCommand::SetBelt(belt_no)) => {
                        let transition = self.engine.apply(EngineEvent::BeltChanged(belt_no));
                        if transition.changed {
                            info!(belt_no = ?self.engine.belt_no(), "Belt changed");
                            poll.reset_immediately();
                        }
                        self.after(transition, &mut page);
                    }
                    None => {
                        info!("Command channel closed, display runtime stopping");
                        break;
                    }
                },

                _ = poll.tick(), if has_belt => {
                    next_seq += 1;
                    let seq = next_seq;
                    let source = Arc::clone(&self.source);
                    inflight.spawn(async move { (seq, source.fetch_all().await) });
                }

                Some(joined) = inflight.join_next() => match joined {
                    Ok((seq, Ok(entries))) => {
                        let transition = self.engine.apply(EngineEvent::PollCompleted { seq, entries });
                        if transition.stale {
                            debug!(seq, "Discarded out-of-order poll result");
                        }
                        self.after(transition, &mut page);
                    }
                    Ok((seq, Err(e))) => {
                        warn!(seq, error = %e, "Poll failed, keeping current screen");
                        self.engine.apply(EngineEvent::PollFailed { seq });
                    }
                    Err(e) => warn!(error = %e, "Poll task aborted"),
                },

                _ = page.tick() => {
                    let transition = self.engine.apply(EngineEvent::PageTick);
                    self.after(transition, &mut page);
                }

                _ = language.tick() => {
                    let transition = self.engine.apply(EngineEvent::LanguageTick);
                    self.after(transition, &mut page);
                }
            }
        }

        inflight.abort_all();
    }

    fn after(&self, transition: Transition, page: &mut tokio::time::Interval) {
        if transition.page_reset {
            page.reset();
        }
        if transition.changed {
            self.frames.send_replace(self.engine.frame(Local::now().date_naive()));
        }
    }
}
