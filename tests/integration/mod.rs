//! Integration tests for the AgentFlow generation core

mod config_integration;
mod generation_flow;
mod test_utils;
