//! Keyer worker task
//!
//! Idles on a wake signal, then steps the keyer once per millisecond until it
//! returns to idle. Paddle state is re-read on every tick, so the wake signal
//! only has to say "something changed"; redundant wakes collapse into one.

use std::future::Future;
use std::sync::Arc;

use keyer_core::{HalError, Keyer, OutputKey, PaddleInput, TICK};
use log::{debug, info, warn};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::error::{HostError, Result};

/// Shutdown request sent to the worker
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shutdown {
    /// Keep keying
    Running,
    /// Finish the character in progress and any pending wake, then stop
    Drain,
    /// Stop at the next tick
    Now,
}

/// Owns the keyer and runs its tick loop
pub struct KeyerWorker<K: OutputKey<Error = HalError>> {
    keyer: Keyer<K>,
    paddles: Arc<PaddleInput>,
    wake: Arc<Notify>,
    shutdown: watch::Receiver<Shutdown>,
}

impl<K: OutputKey<Error = HalError>> KeyerWorker<K> {
    pub fn new(
        keyer: Keyer<K>,
        paddles: Arc<PaddleInput>,
        wake: Arc<Notify>,
        shutdown: watch::Receiver<Shutdown>,
    ) -> Self {
        Self {
            keyer,
            paddles,
            wake,
            shutdown,
        }
    }

    /// Run until shut down. The key is released on every exit path.
    pub async fn run(mut self) -> Result<Keyer<K>> {
        info!("keyer worker started");
        let result = self.serve().await;
        let released = self.keyer.release();
        result?;
        released?;
        info!("keyer worker stopped, key up");
        Ok(self.keyer)
    }

    async fn serve(&mut self) -> Result<()> {
        loop {
            let signal = *self.shutdown.borrow_and_update();
            if signal == Shutdown::Now {
                return Ok(());
            }
            let draining = signal == Shutdown::Drain;

            tokio::select! {
                biased;
                _ = self.wake.notified() => {}
                _ = std::future::ready(()), if draining => return Ok(()),
                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        return Ok(());
                    }
                    continue;
                }
            }

            self.run_session().await?;
        }
    }

    /// One keying session: from wake until the state machine exits
    async fn run_session(&mut self) -> Result<()> {
        self.keyer.wake();
        let mut ticker = interval(TICK);
        // Late ticks are caught up so element lengths stay exact on average
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);

        while !self.keyer.is_idle() {
            ticker.tick().await;
            if *self.shutdown.borrow() == Shutdown::Now {
                debug!("session aborted by shutdown");
                return Ok(());
            }
            if let Some(level) = self.keyer.tick(&self.paddles)? {
                debug!("output {}", if level { "asserted" } else { "released" });
            }
        }
        Ok(())
    }
}

/// Drive a spawned worker to completion.
///
/// When `script` ends the worker drains; when `interrupt` fires it stops at
/// once. Every path joins the worker, so the key is released before this
/// returns, including when the interrupt source itself fails.
pub async fn supervise<K, S, F, I>(
    mut worker: JoinHandle<Result<Keyer<K>>>,
    shutdown: &watch::Sender<Shutdown>,
    script: S,
    mut interrupt: F,
) -> Result<Keyer<K>>
where
    K: OutputKey<Error = HalError>,
    S: Future<Output = ()>,
    F: FnMut() -> I,
    I: Future<Output = std::io::Result<()>>,
{
    let listened = tokio::select! {
        _ = script => {
            shutdown.send(Shutdown::Drain).ok();
            Ok(())
        }
        signal = interrupt() => {
            if signal.is_ok() {
                warn!("interrupted");
            }
            shutdown.send(Shutdown::Now).ok();
            signal
        }
    };

    let joined = tokio::select! {
        joined = &mut worker => joined,
        Ok(()) = interrupt() => {
            warn!("interrupted");
            shutdown.send(Shutdown::Now).ok();
            worker.await
        }
    };

    let keyer = joined??;
    listened.map_err(HostError::Signal)?;
    Ok(keyer)
}
