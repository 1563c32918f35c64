//! IDE 機能を提供するモジュール

pub mod backend;
pub mod completion;
pub mod diagnostics;
pub mod editor;
mod handlers;
pub mod hover;
pub mod state;
