//! Connection driver.
//!
//! Opens the non-blocking TCP connection and runs a [`Session`] over it,
//! one readiness wait per step. Every wait is bounded by the same timeout;
//! any failure moves the session to its error stage and ends the exchange
//! without writing anything else.

mod channel;

pub use channel::Channel;

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::Interest;
use tokio::net::{TcpSocket, TcpStream};
use tokio::time::timeout;
use tracing::debug;

use crate::buffer::{READ_CHUNK, ResponseBuffer, is_final_read};
use crate::error::{Error, Result};
use crate::session::{Action, Session, Stage};

/// Connects to the relay.
///
/// The socket is created non-blocking and the connect is awaited for at most
/// `limit`. Once the socket turns writable its pending error is checked
/// before it is handed back.
///
/// # Errors
///
/// Returns [`Error::SocketCreate`] if no socket could be created,
/// [`Error::ConnectTimedOut`] if `limit` elapsed and [`Error::Connect`] if
/// the connection was refused or failed.
pub async fn connect(addr: SocketAddr, limit: Duration) -> Result<TcpStream> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(Error::SocketCreate)?;

    debug!(%addr, "connecting");
    let stream = match timeout(limit, socket.connect(addr)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(e)) => return Err(Error::Connect(e)),
        Err(_) => return Err(Error::ConnectTimedOut(limit)),
    };

    if let Some(e) = stream.take_error().map_err(Error::Connect)? {
        return Err(Error::Connect(e));
    }

    debug!(%addr, "connected");
    Ok(stream)
}

/// Runs `session` to completion over `channel`.
///
/// Returns once the session asks to close. The caller owns the channel and
/// closes it by dropping it.
///
/// # Errors
///
/// Returns the error that moved the session to [`Stage::Error`]: a timeout,
/// an I/O failure, an overflowing reply or an unexpected reply code. Errors
/// after the message was accepted (while quitting) are logged and ignored.
pub async fn exchange<C>(session: &mut Session, channel: &mut C, limit: Duration) -> Result<()>
where
    C: Channel + Send,
{
    loop {
        let step = match session.next_action() {
            Action::Send(cmd) => {
                debug!(stage = %session.stage(), command = cmd.verb(), "sending");
                send(channel, &cmd.serialize(), limit).await
            }
            Action::Receive => match receive(channel, limit).await {
                Ok(reply) => {
                    debug!(stage = %session.stage(), reply = %reply.text(), "received");
                    session.receive(&reply)
                }
                Err(e) => Err(e),
            },
            Action::Close if session.stage() == Stage::Error => {
                return Err(Error::InvalidState(
                    "no command for the current stage".into(),
                ));
            }
            Action::Close => return Ok(()),
        };

        if let Err(e) = step {
            if session.stage() == Stage::Quit {
                debug!(error = %e, "ignoring failure after delivery");
                return Ok(());
            }
            session.fail();
            return Err(e);
        }
    }
}

/// Waits for `interest` on `channel`, bounded by `limit`.
///
/// Returns `None` if the wait timed out.
async fn wait<C>(channel: &mut C, interest: Interest, limit: Duration) -> Option<io::Result<()>>
where
    C: Channel + Send,
{
    timeout(limit, channel.ready(interest)).await.ok()
}

/// Writes all of `data`, resuming after partial writes.
async fn send<C>(channel: &mut C, mut data: &[u8], limit: Duration) -> Result<()>
where
    C: Channel + Send,
{
    while !data.is_empty() {
        match wait(channel, Interest::WRITABLE, limit).await {
            None => return Err(Error::WriteTimedOut(limit)),
            Some(Err(e)) => return Err(Error::WriteFailed(e)),
            Some(Ok(())) => {}
        }

        match channel.try_write(data) {
            Ok(0) => return Err(Error::WriteFailed(io::ErrorKind::WriteZero.into())),
            Ok(n) => data = &data[n..],
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
            Err(e) => return Err(Error::WriteFailed(e)),
        }
    }
    Ok(())
}

/// Reads one complete reply.
///
/// Reads in [`READ_CHUNK`] pieces until a short read or end of stream. A
/// would-block read goes back to waiting and resumes into the same buffer.
async fn receive<C>(channel: &mut C, limit: Duration) -> Result<ResponseBuffer>
where
    C: Channel + Send,
{
    let mut reply = ResponseBuffer::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        match wait(channel, Interest::READABLE, limit).await {
            None => return Err(Error::ReadTimedOut(limit)),
            Some(Err(e)) => return Err(Error::ReadFailed(e)),
            Some(Ok(())) => {}
        }

        loop {
            match channel.try_read(&mut chunk) {
                Ok(n) => {
                    reply.push(&chunk[..n])?;
                    if is_final_read(n) {
                        return Ok(reply);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(Error::ReadFailed(e)),
            }
        }
    }
}
