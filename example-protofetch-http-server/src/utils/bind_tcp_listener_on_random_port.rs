use std::io::Result;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Binds a `TcpListener` to an OS-assigned port on `127.0.0.1`.
///
/// Returns the listener together with its resolved address, ready to be
/// turned into a server prefix such as `http://127.0.0.1:54321`.
pub async fn bind_tcp_listener_on_random_port() -> Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    Ok((listener, addr))
}
