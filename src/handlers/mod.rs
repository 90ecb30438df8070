//! MCP tool handlers for the reminder server
//!
//! This module contains the implementation of all MCP tool handlers.
//! Each handler is in a separate file for better organization.

pub mod delete;
pub mod list;
pub mod save;
pub mod session;
pub mod toggle;
