//! Input definitions for the files the server reads from disk.

pub mod translation;
