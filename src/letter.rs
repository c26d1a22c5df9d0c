//! The letter: unread speeches shown one page at a time.
//!
//! A speech counts as consumed once the reader has reached it. Closing the
//! letter deletes every consumed speech from the backend, because deletion is
//! the only "read" marker the backend keeps.

use crate::{
    domain::WallApi,
    errors::LetterError,
    models::{Speech, SpeechId},
};
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use futures::future::join_all;
use std::time::Duration;
use tracing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterState {
    Loading,
    /// Nothing left to read. Terminal until a new fetch returns speeches.
    AlreadyRead,
    /// The closed envelope.
    Unopened,
    Opened { index: usize, flipped: bool },
}

/// Result of sending deletions for consumed speeches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub deleted: Vec<SpeechId>,
    pub failed: Vec<SpeechId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub header: String,
    pub paragraphs: Vec<String>,
    pub from: String,
    /// 1-based.
    pub position: usize,
    pub total: usize,
    pub can_advance: bool,
    pub flipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LetterView {
    Loading,
    AlreadyRead,
    Envelope { unread: usize },
    Page(PageView),
}

/// Issues one DELETE per id concurrently and waits for all of them to settle.
pub async fn flush(api: &dyn WallApi, ids: &[SpeechId]) -> FlushReport {
    let results = join_all(ids.iter().map(|id| async move { (id, api.delete_speech(id).await) })).await;

    let mut report = FlushReport::default();
    for (id, result) in results {
        match result {
            Ok(()) => report.deleted.push(id.clone()),
            Err(e) if e.is_not_found() => {
                tracing::debug!(speech_id = %id, "Speech was already gone");
                report.deleted.push(id.clone());
            }
            Err(e) => {
                tracing::error!(speech_id = %id, error = %e, "Failed to delete speech");
                report.failed.push(id.clone());
            }
        }
    }
    report
}

/// Exponential backoff settings for re-sending failed deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub max_elapsed: Duration,
}

impl RetryPolicy {
    pub fn new(max_elapsed: Duration) -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(5),
            max_elapsed,
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_max_elapsed_time(Some(self.max_elapsed))
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct Letter {
    speeches: Vec<Speech>,
    state: LetterState,
    flip_delay: Duration,
    retry_policy: RetryPolicy,
    pending_retry: Vec<SpeechId>,
}

impl Letter {
    pub fn new(flip_delay: Duration, retry_max_elapsed: Duration) -> Self {
        let retry_policy = RetryPolicy::new(retry_max_elapsed);
        Self {
            speeches: Vec::new(),
            state: LetterState::Loading,
            flip_delay,
            retry_policy,
            pending_retry: Vec::new(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Fetches the unread speeches. A failure is logged and reads as "already read".
    ///
    /// Speeches still awaiting a retried deletion were already read and stay hidden.
    pub async fn load(&mut self, api: &dyn WallApi) {
        self.state = LetterState::Loading;
        self.speeches = match api.list_speeches().await {
            Ok(mut speeches) => {
                speeches.retain(|s| !self.pending_retry.contains(&s.id));
                speeches
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching speeches");
                Vec::new()
            }
        };
        tracing::info!("Letter holds {} unread speeches", self.speeches.len());
        self.state = self.resting_state();
    }

    fn resting_state(&self) -> LetterState {
        if self.speeches.is_empty() {
            LetterState::AlreadyRead
        } else {
            LetterState::Unopened
        }
    }

    pub fn state(&self) -> LetterState {
        self.state
    }

    pub fn speeches(&self) -> &[Speech] {
        &self.speeches
    }

    /// Ids whose deletion failed and that [`Letter::retry_pending`] will try again.
    pub fn pending_retry(&self) -> &[SpeechId] {
        &self.pending_retry
    }

    /// Opens the envelope at the first speech.
    pub fn open(&mut self) -> Result<(), LetterError> {
        match self.state {
            LetterState::Unopened => {
                self.state = LetterState::Opened {
                    index: 0,
                    flipped: false,
                };
                Ok(())
            }
            LetterState::Loading => Err(LetterError::Loading),
            LetterState::AlreadyRead => Err(LetterError::AlreadyRead),
            LetterState::Opened { .. } => Err(LetterError::AlreadyOpened),
        }
    }

    /// Flips to the next speech after the flip delay. Not allowed on the last one.
    pub async fn advance(&mut self) -> Result<usize, LetterError> {
        let LetterState::Opened { index, .. } = self.state else {
            return Err(LetterError::NotOpened);
        };
        if index + 1 >= self.speeches.len() {
            return Err(LetterError::AtLastSpeech);
        }

        self.state = LetterState::Opened {
            index,
            flipped: true,
        };
        tokio::time::sleep(self.flip_delay).await;

        let next = (index + 1) % self.speeches.len();
        self.state = LetterState::Opened {
            index: next,
            flipped: false,
        };
        Ok(next)
    }

    /// Ids of every speech up to and including the current page.
    pub fn consumed_through(&self) -> Result<Vec<SpeechId>, LetterError> {
        let LetterState::Opened { index, .. } = self.state else {
            return Err(LetterError::NotOpened);
        };
        Ok(self.speeches[..=index].iter().map(|s| s.id.clone()).collect())
    }

    /// Deletes the consumed speeches, drops them locally and folds the envelope.
    ///
    /// The local list shrinks only after every deletion has settled, and it
    /// shrinks by exactly the consumed prefix whatever the individual outcomes.
    pub async fn close(&mut self, api: &dyn WallApi) -> Result<FlushReport, LetterError> {
        let consumed = self.consumed_through()?;

        let report = flush(api, &consumed).await;
        if !report.failed.is_empty() {
            tracing::warn!(
                failed = report.failed.len(),
                total = consumed.len(),
                "Some consumed speeches could not be deleted"
            );
        }
        self.pending_retry.extend(report.failed.iter().cloned());

        self.speeches = self.speeches.split_off(consumed.len());
        self.state = self.resting_state();
        Ok(report)
    }

    /// Retries failed deletions with exponential backoff. Ids that still fail stay pending.
    pub async fn retry_pending(&mut self, api: &dyn WallApi) -> FlushReport {
        let pending = std::mem::take(&mut self.pending_retry);
        let policy = self.retry_policy;

        let results = join_all(pending.into_iter().map(|id| async move {
            let id_ref = &id;
            let result = backoff::future::retry(policy.backoff(), move || async move {
                match api.delete_speech(id_ref).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.is_not_found() => Ok(()),
                    Err(e) if e.is_transient() => {
                        tracing::debug!(speech_id = %id_ref, error = %e, "Retrying speech deletion");
                        Err(backoff::Error::transient(e))
                    }
                    Err(e) => Err(backoff::Error::permanent(e)),
                }
            })
            .await;
            (id, result)
        }))
        .await;

        let mut report = FlushReport::default();
        for (id, result) in results {
            match result {
                Ok(()) => report.deleted.push(id),
                Err(e) => {
                    tracing::error!(speech_id = %id, error = %e, "Giving up on speech deletion for now");
                    report.failed.push(id);
                }
            }
        }
        self.pending_retry = report.failed.clone();
        report
    }

    pub fn view(&self) -> LetterView {
        match self.state {
            LetterState::Loading => LetterView::Loading,
            LetterState::AlreadyRead => LetterView::AlreadyRead,
            LetterState::Unopened => LetterView::Envelope {
                unread: self.speeches.len(),
            },
            LetterState::Opened { index, flipped } => {
                let speech = &self.speeches[index];
                LetterView::Page(PageView {
                    header: speech.header.clone(),
                    paragraphs: speech.paragraphs().into_iter().map(str::to_string).collect(),
                    from: speech.from.clone(),
                    position: index + 1,
                    total: self.speeches.len(),
                    can_advance: index + 1 < self.speeches.len(),
                    flipped,
                })
            }
        }
    }
}
