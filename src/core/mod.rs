//! Core types & traits: protocol envelopes, error taxonomy and tool contracts.

pub mod content;
pub mod envelope;
pub mod error;
pub mod mcp;
pub mod tool;
