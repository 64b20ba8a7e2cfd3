use crate::consts::{DEFAULT_LOCAL_PORT, GATEWAY_UDP_PORT};
use crate::error::{Error, Result};
use crate::frame::ZipFrame;
use bytes::Bytes;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use typed_builder::TypedBuilder;
use zip_core::serialize::Serializable;

/// The transport seam of the client: something that moves whole Z/IP frames.
/// The driver only depends on this trait, so tests substitute a scripted
/// implementation.
pub trait ZipBinding: Send + 'static {
    /// Sends one frame as one datagram
    fn write(&mut self, frame: ZipFrame) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Receives the next frame. `None` means the transport is gone for good.
    fn read(&mut self) -> impl std::future::Future<Output = Option<ZipFrame>> + Send;
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct UdpBindingConfig {
    /// The gateway to talk to. Z/IP gateways live on IPv6; IPv4 works for
    /// portals that translate.
    pub gateway_ip: IpAddr,
    #[builder(default = GATEWAY_UDP_PORT)]
    pub gateway_port: u16,
    #[builder(default = DEFAULT_LOCAL_PORT)]
    pub local_port: u16,
}

/// The default transport: one UDP socket connected to the gateway, one
/// datagram per Z/IP frame.
pub struct UdpBinding {
    socket: UdpSocket,
    recv_buf: Vec<u8>,
}

impl UdpBinding {
    pub async fn open(config: UdpBindingConfig) -> Result<Self> {
        let local: SocketAddr = match config.gateway_ip {
            IpAddr::V6(_) => (IpAddr::V6(Ipv6Addr::UNSPECIFIED), config.local_port).into(),
            IpAddr::V4(_) => (IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), config.local_port).into(),
        };
        let socket = UdpSocket::bind(local).await?;
        socket
            .connect((config.gateway_ip, config.gateway_port))
            .await?;

        Ok(Self {
            socket,
            recv_buf: vec![0u8; 1500],
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Closes the socket. Dropping the binding has the same effect; this just
    /// makes the intent explicit at call sites.
    pub fn close(self) {}
}

impl ZipBinding for UdpBinding {
    async fn write(&mut self, frame: ZipFrame) -> Result<()> {
        let data = frame.as_bytes();
        let sent = self.socket.send(&data).await?;
        if sent != data.len() {
            return Err(Error::SocketClosed);
        }
        Ok(())
    }

    async fn read(&mut self) -> Option<ZipFrame> {
        match self.socket.recv(&mut self.recv_buf).await {
            Ok(len) => {
                let datagram = Bytes::copy_from_slice(&self.recv_buf[..len]);
                Some(ZipFrame::parse_datagram(datagram))
            }
            // A failed receive on a connected UDP socket is fatal here
            Err(_) => None,
        }
    }
}
