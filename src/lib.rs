//! moodboard CLI
//!
//! バックエンドとの通信・画像入力・端末表示。
//! フィルタやページングのロジックは `moodboard-common` にある。

pub mod api;
pub mod browse;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod progress;
pub mod render;
pub mod results;
pub mod scanner;
