//! Retry policy and transient-error classification
//!
//! Submission failures fall into two classes: transient blockhash problems
//! that a resubmission with a fresh blockhash can cure, and everything else.
//! The classifier prefers the transport's structured error and falls back to
//! substring matching for transports that only surface text.

use serde::{Deserialize, Serialize};
use solana_sdk::transaction::TransactionError;
use std::time::Duration;

use crate::rpc::RpcError;

/// Error fragments that mark a submission failure as transient when the
/// transport gives us nothing structured to go on. Case-sensitive by intent;
/// these are the exact strings RPC nodes emit.
const RETRYABLE_ERROR_PATTERNS: [&str; 3] = [
    "Blockhash not found",
    "block height exceeded",
    "BlockhashNotFound",
];

/// Whether a submission error is worth retrying with a fresh blockhash.
///
/// Structured check first; the substring fallback is a documented shim kept
/// in this one function so it can be swapped per network.
pub fn is_retryable(error: &RpcError) -> bool {
    if let Some(tx_err) = error.transaction_error() {
        return matches!(tx_err, TransactionError::BlockhashNotFound);
    }

    let message = error.to_string();
    RETRYABLE_ERROR_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// Backoff strategy between submission attempts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    /// Exponential backoff: delay = base_seconds * 2^attempt
    Exponential { base_seconds: u64 },
    /// Linear backoff: delay = increment_seconds * attempt
    Linear { increment_seconds: u64 },
    /// Fixed interval between retries
    Fixed { interval_seconds: u64 },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        BackoffStrategy::Fixed {
            interval_seconds: crate::RETRY_BACKOFF_SECS,
        }
    }
}

impl BackoffStrategy {
    /// Calculate the delay before the attempt following `attempt_count`
    pub fn calculate_delay(&self, attempt_count: usize) -> Duration {
        let seconds = match self {
            BackoffStrategy::Exponential { base_seconds } => {
                // caps at base * 2^6
                let exp = (attempt_count as u32).min(6);
                base_seconds * 2u64.pow(exp)
            }
            BackoffStrategy::Linear { increment_seconds } => {
                increment_seconds * (attempt_count as u64 + 1)
            }
            BackoffStrategy::Fixed { interval_seconds } => *interval_seconds,
        };

        Duration::from_secs(seconds)
    }
}

/// Bounded retry policy for transaction submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum submission attempts, including the first
    pub max_attempts: usize,
    /// Delay strategy between attempts
    pub backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: crate::MAX_SUBMIT_ATTEMPTS,
            backoff: BackoffStrategy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport_error(message: &str) -> RpcError {
        RpcError::Transport {
            message: message.to_string(),
        }
    }

    #[test]
    fn test_retryable_substrings() {
        assert!(is_retryable(&transport_error(
            "rpc error: Blockhash not found"
        )));
        assert!(is_retryable(&transport_error(
            "failed: TransactionExpiredBlockheightExceededError: block height exceeded"
        )));
        assert!(is_retryable(&transport_error("BlockhashNotFound")));
    }

    #[test]
    fn test_fatal_messages() {
        assert!(!is_retryable(&transport_error(
            "Attempt to debit an account but found no record of a prior credit"
        )));
        assert!(!is_retryable(&transport_error("insufficient funds")));
        // substring match is case-sensitive by design
        assert!(!is_retryable(&transport_error("blockhash not found")));
    }

    #[test]
    fn test_structured_classification() {
        assert!(is_retryable(&RpcError::Transaction {
            err: TransactionError::BlockhashNotFound,
        }));
        assert!(!is_retryable(&RpcError::Transaction {
            err: TransactionError::AlreadyProcessed,
        }));
    }

    #[test]
    fn test_backoff_fixed() {
        let strategy = BackoffStrategy::Fixed {
            interval_seconds: 2,
        };

        assert_eq!(strategy.calculate_delay(0).as_secs(), 2);
        assert_eq!(strategy.calculate_delay(5).as_secs(), 2);
    }

    #[test]
    fn test_backoff_exponential() {
        let strategy = BackoffStrategy::Exponential { base_seconds: 2 };

        assert_eq!(strategy.calculate_delay(0).as_secs(), 2); // 2 * 2^0
        assert_eq!(strategy.calculate_delay(1).as_secs(), 4); // 2 * 2^1
        assert_eq!(strategy.calculate_delay(3).as_secs(), 16); // 2 * 2^3
        assert_eq!(strategy.calculate_delay(10).as_secs(), 128); // capped at 2^6
    }

    #[test]
    fn test_backoff_linear() {
        let strategy = BackoffStrategy::Linear {
            increment_seconds: 5,
        };

        assert_eq!(strategy.calculate_delay(0).as_secs(), 5);
        assert_eq!(strategy.calculate_delay(2).as_secs(), 15);
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff.calculate_delay(0).as_secs(), 2);
    }
}
