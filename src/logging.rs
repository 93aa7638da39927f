//! ログ初期化
//!
//! 結果は標準出力に出すため、ログは標準エラーへ書き出す。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `main` の最初に1回だけ呼ぶ
///
/// `RUST_LOG` があればそれに従う。なければ `warn`、`--verbose` 時は `debug`。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // テストなどで二重に初期化されても失敗させない
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
