use async_trait::async_trait;
use futures::StreamExt;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_stream::wrappers::LinesStream;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Could not connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A connection carrying one text frame per message. Framing is the
/// transport's business; encoding the frames is not.
#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, frame: String) -> Result<(), TransportError>;

    /// `None` means the peer closed the connection.
    async fn receive(&mut self) -> Option<Result<String, TransportError>>;

    async fn close(&mut self) -> Result<(), TransportError>;
}

// Newline-delimited frames over any byte stream
pub struct LineTransport<R, W> {
    lines: LinesStream<BufReader<R>>,
    writer: W,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        LineTransport {
            lines: LinesStream::new(BufReader::new(reader).lines()),
            writer,
        }
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, frame: String) -> Result<(), TransportError> {
        debug!("sending frame: {}", frame);
        self.writer.write_all(frame.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> Option<Result<String, TransportError>> {
        let frame = self.lines.next().await?;
        debug!("received frame: {:?}", frame);
        Some(frame.map_err(TransportError::from))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

pub type TcpTransport = LineTransport<OwnedReadHalf, OwnedWriteHalf>;

pub async fn connect(host: &str, port: u16) -> Result<TcpTransport, TransportError> {
    let addr = format!("{}:{}", host, port);
    let stream = TcpStream::connect(addr.as_str())
        .await
        .map_err(|source| TransportError::Connect {
            addr: addr.clone(),
            source,
        })?;
    info!("connected to {}", addr);
    let (reader, writer) = stream.into_split();
    Ok(LineTransport::new(reader, writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, split};

    #[tokio::test]
    async fn test_line_framing() {
        let (client, server) = duplex(1024);
        let (client_read, client_write) = split(client);
        let mut transport = LineTransport::new(client_read, client_write);

        let (server_read, mut server_write) = split(server);
        server_write
            .write_all(b"{\"command\":\"NEW_MOVE\"}\nsecond\n")
            .await
            .unwrap();

        assert_eq!(
            transport.receive().await.unwrap().unwrap(),
            "{\"command\":\"NEW_MOVE\"}"
        );
        assert_eq!(transport.receive().await.unwrap().unwrap(), "second");

        transport.send("hello".to_string()).await.unwrap();
        let mut server_lines = BufReader::new(server_read).lines();
        assert_eq!(server_lines.next_line().await.unwrap().unwrap(), "hello");

        drop(server_write);
        drop(server_lines);
        assert!(transport.receive().await.is_none());
    }

    #[tokio::test]
    async fn test_close_shuts_down_writer() {
        let (client, server) = duplex(64);
        let (client_read, client_write) = split(client);
        let mut transport = LineTransport::new(client_read, client_write);
        transport.close().await.unwrap();

        let mut server_lines = BufReader::new(server).lines();
        assert!(server_lines.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // Bind then drop to find a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let err = connect("127.0.0.1", port).await.err().unwrap();
        assert!(matches!(err, TransportError::Connect { .. }));
    }
}
