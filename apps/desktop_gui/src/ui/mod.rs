//! UI layer for the desktop client: app shell and panels.

pub mod app;
