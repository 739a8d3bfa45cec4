/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 17/10/26
******************************************************************************/

//! Sequencer error types.
//!
//! Only construction and configuration can fail. Once a sequencer is
//! running, every operation either succeeds or degrades to a no-op.

use thiserror::Error;

/// Errors that can occur while building a [`Sequencer`](super::Sequencer).
#[derive(Debug, Error)]
pub enum SequencerError {
    /// A worker thread could not be spawned.
    #[error("failed to spawn thread `{thread}`: {source}")]
    Spawn {
        /// Name of the thread that failed to start.
        thread: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The timer runtime could not be built.
    #[error("failed to build timer runtime: {0}")]
    TimerRuntime(#[source] std::io::Error),

    /// The configuration could not be parsed.
    #[error("failed to parse sequencer configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration was parsed but is not usable.
    #[error("invalid sequencer configuration: {0}")]
    InvalidConfig(String),
}
