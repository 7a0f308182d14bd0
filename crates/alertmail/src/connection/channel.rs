//! Readiness-driven byte channel.

use std::future::Future;
use std::io;

use tokio::io::Interest;
use tokio::net::TcpStream;

/// Non-blocking channel to the relay.
///
/// `ready` suspends until the runtime reports the channel readable or
/// writable; `try_read` and `try_write` then attempt the operation once and
/// return [`io::ErrorKind::WouldBlock`] if the readiness was spurious.
pub trait Channel {
    /// Waits until the channel may be ready for `interest`.
    fn ready(&mut self, interest: Interest) -> impl Future<Output = io::Result<()>> + Send;

    /// Reads once without blocking.
    ///
    /// # Errors
    ///
    /// Returns `WouldBlock` if no data is available, or the underlying error.
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Writes once without blocking.
    ///
    /// # Errors
    ///
    /// Returns `WouldBlock` if the socket cannot take data, or the underlying
    /// error.
    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize>;
}

impl Channel for TcpStream {
    async fn ready(&mut self, interest: Interest) -> io::Result<()> {
        TcpStream::ready(self, interest).await.map(|_| ())
    }

    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        TcpStream::try_read(self, buf)
    }

    fn try_write(&mut self, buf: &[u8]) -> io::Result<usize> {
        TcpStream::try_write(self, buf)
    }
}
