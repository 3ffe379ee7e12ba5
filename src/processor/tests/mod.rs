//! Integration tests for the processor module
//!
//! Tests the complete conversion pipeline using temporary ISF datasets.
