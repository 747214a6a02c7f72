use lobby::logger::Logger;
use lobby_server::Server;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let server = Logger::bootstrap(|| Server::builder().build())?;

    let _log = Logger::from_settings(env!("CARGO_PKG_NAME"), server.logging(), server.base_dir())?;

    server.run().await
}
