//! LRU cache of question -> answer, keyed by the exact question text.

use std::future::Future;
use std::num::NonZeroUsize;

use lru::LruCache;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::errors::AssistantError;

pub struct AnswerCache {
    entries: Mutex<LruCache<String, String>>,
}

impl AnswerCache {
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Return the cached answer for `question`, or run `compute` and cache
    /// its result. Errors are returned as-is and never cached, so a failed
    /// question is recomputed on the next ask. The lock is not held while
    /// `compute` runs.
    pub async fn get_or_compute<F, Fut>(
        &self,
        question: &str,
        compute: F,
    ) -> Result<String, AssistantError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, AssistantError>>,
    {
        {
            let mut entries = self.entries.lock().await;
            if let Some(answer) = entries.get(question) {
                debug!("answer cache hit");
                return Ok(answer.clone());
            }
        }

        let answer = compute().await?;

        let mut entries = self.entries.lock().await;
        entries.put(question.to_string(), answer.clone());
        Ok(answer)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn identical_questions_compute_once() {
        let cache = AnswerCache::new(10);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let answer = cache
                .get_or_compute("what is rust?", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("a programming language".to_string())
                })
                .await
                .unwrap();
            assert_eq!(answer, "a programming language");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = AnswerCache::new(10);
        let calls = AtomicUsize::new(0);

        let err = cache
            .get_or_compute("flaky?", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AssistantError::provider("transient"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::Provider(_)));
        assert_eq!(cache.len().await, 0);

        let answer = cache
            .get_or_compute("flaky?", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("recovered".to_string())
            })
            .await
            .unwrap();
        assert_eq!(answer, "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn least_recently_used_entries_are_evicted() {
        let cache = AnswerCache::new(2);
        let recomputes = AtomicUsize::new(0);
        let answer = |text: &str| {
            let text = text.to_string();
            let recomputes = &recomputes;
            async move {
                recomputes.fetch_add(1, Ordering::SeqCst);
                Ok::<_, AssistantError>(text)
            }
        };

        cache.get_or_compute("a?", || answer("a")).await.unwrap();
        cache.get_or_compute("b?", || answer("b")).await.unwrap();
        // Touch "a?" so "b?" becomes the eviction candidate.
        cache.get_or_compute("a?", || answer("a")).await.unwrap();
        cache.get_or_compute("c?", || answer("c")).await.unwrap();
        assert_eq!(recomputes.load(Ordering::SeqCst), 3);

        // "a?" survived, "b?" was evicted and computes again.
        cache.get_or_compute("a?", || answer("a")).await.unwrap();
        assert_eq!(recomputes.load(Ordering::SeqCst), 3);
        cache.get_or_compute("b?", || answer("b")).await.unwrap();
        assert_eq!(recomputes.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped_to_one() {
        let cache = AnswerCache::new(0);
        cache
            .get_or_compute("q?", || async { Ok("a".to_string()) })
            .await
            .unwrap();
        assert_eq!(cache.len().await, 1);
    }
}
