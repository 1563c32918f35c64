//! Entry point for the Language Server Protocol implementation.

use ngx_translate_language_server::Backend;
use tower_lsp::{
    LspService,
    Server,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout は LSP のワイヤに使うため、ログはファイルに出力する
    let log_dir = std::env::temp_dir().join("ngx-translate-language-server");
    let file_appender = tracing_appender::rolling::daily(log_dir, "server.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let (stdin, stdout) = (tokio::io::stdin(), tokio::io::stdout());
    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
