//! The default connection plugin: a blocking `std::net::TcpStream` with read
//! timeouts. The read timeout is the single suspension point of the whole
//! client.

use std::{
    io::{ErrorKind, Read, Write},
    net::{Shutdown, TcpStream, ToSocketAddrs},
    time::Duration,
};

use log::{debug, error};

use opcua_core::comms::url::hostname_port_from_url;
use opcua_types::StatusCode;

use super::{Connection, Connector, ReceiveResult, TransportLimits};

/// Produces [`TcpConnection`] values for `opc.tcp` urls.
#[derive(Debug, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    fn connect(
        &self,
        endpoint_url: &str,
        limits: &TransportLimits,
        timeout: Duration,
    ) -> Result<Box<dyn Connection>, StatusCode> {
        let (host, port) = hostname_port_from_url(
            endpoint_url,
            opcua_core::constants::DEFAULT_OPC_UA_SERVER_PORT,
        )?;

        let addr = match (host.as_str(), port).to_socket_addrs() {
            Ok(mut addrs) => match addrs.next() {
                Some(addr) => addr,
                None => {
                    error!(
                        "Invalid address {}, does not resolve to any socket",
                        endpoint_url
                    );
                    return Err(StatusCode::BadTcpEndpointUrlInvalid);
                }
            },
            Err(e) => {
                error!("Invalid address {}, cannot be parsed {:?}", endpoint_url, e);
                return Err(StatusCode::BadTcpEndpointUrlInvalid);
            }
        };

        debug!("Connecting to {} with url {}", addr, endpoint_url);
        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(|err| {
            error!("Could not connect to host {}, {:?}", addr, err);
            StatusCode::BadConnectionRejected
        })?;
        stream.set_nodelay(true).map_err(|_| StatusCode::BadCommunicationError)?;

        Ok(Box::new(TcpConnection {
            stream,
            read_buffer: vec![0u8; limits.recv_buffer_size.max(8192)],
        }))
    }
}

/// A blocking TCP connection to a server.
pub struct TcpConnection {
    stream: TcpStream,
    read_buffer: Vec<u8>,
}

impl Connection for TcpConnection {
    fn send(&mut self, data: &[u8]) -> Result<(), StatusCode> {
        self.stream.write_all(data).map_err(|err| {
            error!("Failed to write to stream {}", err);
            StatusCode::BadCommunicationError
        })
    }

    fn receive(&mut self, timeout: Duration) -> ReceiveResult {
        // A zero duration would disable the timeout entirely, clamp it.
        let timeout = timeout.max(Duration::from_millis(1));
        if self.stream.set_read_timeout(Some(timeout)).is_err() {
            return ReceiveResult::Closed;
        }
        match self.stream.read(&mut self.read_buffer) {
            Ok(0) => ReceiveResult::Closed,
            Ok(n) => ReceiveResult::Bytes(self.read_buffer[..n].to_vec()),
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                ReceiveResult::Timeout
            }
            Err(err) => {
                error!("Error reading from stream {}", err);
                ReceiveResult::Closed
            }
        }
    }

    fn close(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}
