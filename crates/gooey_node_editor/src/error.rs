// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for graph mutation and configuration.

use crate::node::NodeId;
use crate::socket::SocketRef;
use thiserror::Error;

/// Error when mutating the graph
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// Empty name/title or non-finite geometry
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Socket not found
    #[error("Socket not found: {0}")]
    SocketNotFound(SocketRef),

    /// Endpoints are not an output followed by an input
    #[error("Connections must run from an output socket to an input socket")]
    WrongDirection,

    /// Both endpoints belong to the same node
    #[error("Self-loop not allowed on {0}")]
    SelfLoop(NodeId),
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error when loading or saving an editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse error
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization error
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// Parsed but semantically invalid
    #[error("Invalid config value: {0}")]
    Invalid(&'static str),
}
