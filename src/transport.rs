//! Delivery of an encoded frame over plain TCP or TLS.
//!
//! One connection is opened per notification. The whole frame is written at
//! once, then everything the server sends back is relayed to the operator's
//! sink until the server closes the connection. Nothing is parsed and nothing
//! is retried.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::crypto::{
    aws_lc_rs, verify_tls12_signature, verify_tls13_signature, CryptoProvider,
};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tokio_rustls::TlsConnector;
use tracing::{debug, info, warn};

use crate::error::{NotifyError, Result};
use crate::target::ConnectionTarget;

const RELAY_BUFFER_SIZE: usize = 8 * 1024;

/// An open connection to the IRC server.
pub enum Connection {
    Tcp { stream: TcpStream },
    Tls { stream: Box<TlsStream<TcpStream>> },
}

macro_rules! with_stream {
    ($conn:expr, $stream:ident => $body:expr) => {
        match $conn {
            Connection::Tcp { stream: $stream } => $body,
            Connection::Tls { stream: $stream } => $body,
        }
    };
}

impl Connection {
    /// Dial the target and, for `ircs`, complete the TLS handshake.
    pub async fn open(target: &ConnectionTarget) -> Result<Self> {
        let addr = target.address();
        let stream = TcpStream::connect((target.host.as_str(), target.port))
            .await
            .map_err(|source| NotifyError::Connect {
                addr: addr.clone(),
                source,
            })?;

        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        if !target.secure {
            info!(addr = %addr, "connected");
            return Ok(Self::Tcp { stream });
        }

        let stream = upgrade_to_tls(stream, &target.host, !target.insecure_tls).await?;
        info!(addr = %addr, verify = !target.insecure_tls, "connected with TLS");
        Ok(Self::Tls {
            stream: Box::new(stream),
        })
    }

    fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls { .. })
    }

    /// Write the whole encoded frame.
    pub async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        with_stream!(self, stream => {
            stream.write_all(frame).await?;
            stream.flush().await?;
        });
        debug!(bytes = frame.len(), "frame sent");
        Ok(())
    }

    /// Copy everything the server sends into `sink` until it closes the
    /// connection. Returns the number of bytes relayed.
    pub async fn relay_to<W>(&mut self, sink: &mut W) -> Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let tls = self.is_tls();
        let relayed = with_stream!(self, stream => relay(stream, sink, tls).await)?;
        sink.flush().await?;
        debug!(bytes = relayed, "server closed connection");
        Ok(relayed)
    }

    /// Close our side of the connection. Errors are ignored since the peer
    /// has usually gone already.
    pub async fn close(mut self) {
        let _ = with_stream!(&mut self, stream => stream.shutdown().await);
    }
}

async fn relay<R, W>(stream: &mut R, sink: &mut W, tls: bool) -> Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = [0u8; RELAY_BUFFER_SIZE];
    let mut relayed = 0u64;
    loop {
        let n = match stream.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            // Servers commonly drop the socket after QUIT without close_notify.
            Err(e) if tls && e.kind() == std::io::ErrorKind::UnexpectedEof => {
                debug!("TLS peer closed without close_notify");
                break;
            }
            Err(e) => return Err(e.into()),
        };
        sink.write_all(&buf[..n]).await?;
        relayed += n as u64;
    }
    Ok(relayed)
}

/// Send `frame` to the target and relay the server's response to `sink`.
///
/// With a `deadline`, the whole exchange (dial, handshake, write and drain)
/// must finish in time or fails with [`NotifyError::TimedOut`]. The
/// connection is closed on every path.
pub async fn deliver<W>(
    target: &ConnectionTarget,
    frame: &[u8],
    sink: &mut W,
    deadline: Option<Duration>,
) -> Result<u64>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let exchange = async {
        let mut conn = Connection::open(target).await?;
        let result = match conn.send_frame(frame).await {
            Ok(()) => conn.relay_to(sink).await,
            Err(e) => Err(e),
        };
        conn.close().await;
        result
    };

    match deadline {
        Some(limit) => tokio::time::timeout(limit, exchange)
            .await
            .map_err(|_| NotifyError::TimedOut(limit))?,
        None => exchange.await,
    }
}

/// Upgrades a TCP stream to TLS.
///
/// With `verify_cert` the server chain is checked against the operating
/// system's trust store; without it any certificate is accepted.
pub async fn upgrade_to_tls(
    tcp_stream: TcpStream,
    hostname: &str,
    verify_cert: bool,
) -> Result<TlsStream<TcpStream>> {
    let tls_error = |source: std::io::Error| NotifyError::Tls {
        host: hostname.to_string(),
        source,
    };

    let config = client_config(verify_cert).map_err(|e| tls_error(std::io::Error::other(e)))?;
    let connector = TlsConnector::from(Arc::new(config));
    let server_name = ServerName::try_from(hostname.to_string())
        .map_err(|e| tls_error(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)))?;

    connector.connect(server_name, tcp_stream).await.map_err(tls_error)
}

/// Build the rustls client configuration.
pub fn client_config(
    verify_cert: bool,
) -> std::result::Result<ClientConfig, tokio_rustls::rustls::Error> {
    let provider = Arc::new(aws_lc_rs::default_provider());
    let builder = ClientConfig::builder_with_provider(Arc::clone(&provider))
        .with_safe_default_protocol_versions()?;

    if verify_cert {
        let mut roots = RootCertStore::empty();
        let native = rustls_native_certs::load_native_certs();
        for cert in native.certs {
            if let Err(e) = roots.add(cert) {
                warn!("failed to add root cert: {}", e);
            }
        }
        for e in &native.errors {
            warn!("error loading native certs: {}", e);
        }

        Ok(builder
            .with_root_certificates(roots)
            .with_no_client_auth())
    } else {
        Ok(builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(NoCertificateVerification(provider)))
            .with_no_client_auth())
    }
}

/// Accepts any server certificate. Handshake signatures are still checked,
/// so the peer must hold the key of the certificate it presents.
#[derive(Debug)]
struct NoCertificateVerification(Arc<CryptoProvider>);

impl ServerCertVerifier for NoCertificateVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, tokio_rustls::rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.0.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}
