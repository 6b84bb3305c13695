//! HTTP clients for the public address services.
//!
//! The resolver only sees the [`AddressLookup`] and [`Geocoder`] traits, so
//! tests substitute in-memory fakes for the network.

mod nominatim;
mod traits;
mod viacep;

pub use nominatim::*;
pub use traits::*;
pub use viacep::*;

/// Local HTTP endpoints for exercising the clients over a real socket.
#[cfg(test)]
pub(crate) mod test_server {
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer every connection with `status` and a JSON `body`. Returns the base URL.
    pub(crate) async fn respond(status: u16, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let response = format!(
                    "HTTP/1.1 {status} Canned\r\n\
                     content-type: application/json\r\n\
                     content-length: {}\r\n\
                     connection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    /// Accept connections and never answer.
    pub(crate) async fn stall() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    drop(socket);
                });
            }
        });
        format!("http://{addr}")
    }
}
