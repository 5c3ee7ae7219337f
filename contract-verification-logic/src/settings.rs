use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct VerificationSettings {
    /// Maximum number of compilations running at the same time.
    #[serde(default = "default_compilation_threads")]
    pub compilation_threads: usize,
    /// Maximum number of in-flight balance requests during holder backfill.
    #[serde(default = "default_balance_request_concurrency")]
    pub balance_request_concurrency: usize,
}

fn default_compilation_threads() -> usize {
    4
}

fn default_balance_request_concurrency() -> usize {
    10
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            compilation_threads: default_compilation_threads(),
            balance_request_concurrency: default_balance_request_concurrency(),
        }
    }
}
