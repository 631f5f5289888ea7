//! Batch materialization over a bounded worker pool.
//!
//! Keeps up to `max_concurrent` fetch tasks per batch; as each finishes the
//! next descriptor is started. The transfers themselves also take a permit
//! shared by every clone of the fetcher, so concurrent batches together stay
//! within the same bound. Results are slotted back by input index, so output
//! order never depends on completion order. No item's failure fails the batch.

use tokio::task::JoinSet;

use super::ImageFetcher;
use crate::descriptor::{ImageDescriptor, ImageOutcome};

const TASK_LOST: &str = "fetch task did not complete";

impl ImageFetcher {
    /// One entry per descriptor, in input order: the local path when the image
    /// was materialized, otherwise the descriptor's original URL.
    pub async fn fetch_batch(&self, descriptors: &[ImageDescriptor]) -> Vec<String> {
        self.fetch_batch_detailed(descriptors)
            .await
            .into_iter()
            .map(|outcome| outcome.path)
            .collect()
    }

    /// Like `fetch_batch`, but each entry says whether it is local or a
    /// fallback, and why.
    pub async fn fetch_batch_detailed(&self, descriptors: &[ImageDescriptor]) -> Vec<ImageOutcome> {
        if descriptors.is_empty() {
            return Vec::new();
        }

        let mut slots: Vec<Option<ImageOutcome>> = vec![None; descriptors.len()];
        let mut pending = descriptors.iter().cloned().enumerate();
        let mut join_set = JoinSet::new();

        loop {
            while join_set.len() < self.max_concurrent {
                let Some((index, descriptor)) = pending.next() else {
                    break;
                };
                let fetcher = self.clone();
                join_set.spawn(async move { (index, fetcher.fetch_outcome(&descriptor).await) });
            }

            let Some(res) = join_set.join_next().await else {
                break;
            };
            match res {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                // The slot stays empty and degrades below.
                Err(e) => tracing::error!("image fetch task failed: {}", e),
            }
        }

        let outcomes = settle(slots, descriptors);

        let local = outcomes.iter().filter(|o| o.is_local()).count();
        tracing::info!(
            total = outcomes.len(),
            local,
            fallback = outcomes.len() - local,
            "image batch finished"
        );
        outcomes
    }

    async fn fetch_outcome(&self, descriptor: &ImageDescriptor) -> ImageOutcome {
        match self.fetch_one(&descriptor.url, &descriptor.filename).await {
            Ok(path) => ImageOutcome::local(path),
            Err(e) => {
                tracing::warn!(
                    url = %descriptor.url,
                    filename = %descriptor.filename,
                    error = %e,
                    "image fetch failed, falling back to remote url"
                );
                ImageOutcome::fallback(&descriptor.url, e)
            }
        }
    }
}

/// Fill each empty slot (its task panicked or was cancelled) with the
/// descriptor's URL.
fn settle(slots: Vec<Option<ImageOutcome>>, descriptors: &[ImageDescriptor]) -> Vec<ImageOutcome> {
    slots
        .into_iter()
        .zip(descriptors)
        .map(|(slot, d)| slot.unwrap_or_else(|| ImageOutcome::fallback(&d.url, TASK_LOST)))
        .collect()
}
