use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tokio::sync::Mutex;
use tracing::info;

use crate::db::endpoint::Endpoint;
use crate::error::AppError;

/// Long-lived handle to the backend database.
///
/// One instance is shared by every concurrent request; implementations must
/// multiplex concurrent callers internally. The registry is the sole owner,
/// requests only ever hold [`SharedConn`] clones.
pub trait BackendConn: Send + Sync + fmt::Debug {
    /// Where this connection points, for logging and status output.
    fn describe(&self) -> String;
}

/// Shared reference to a [`BackendConn`]. Handle identity is `Arc::ptr_eq`.
pub type SharedConn = Arc<dyn BackendConn>;

/// Seam for establishing connections.
///
/// Production uses [`NetDialer`]; tests substitute a fake so no network I/O
/// ever happens. Implementations must not retry: a failed dial at startup is
/// fatal for this process instance.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        username: &str,
        password: &str,
    ) -> Result<SharedConn, AppError>;
}

#[async_trait]
impl<T: ConnectionProvider + ?Sized> ConnectionProvider for Arc<T> {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        username: &str,
        password: &str,
    ) -> Result<SharedConn, AppError> {
        (**self).connect(endpoint, username, password).await
    }
}

/// Authentication material carried by an established connection.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

// Never log the password.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Raw byte stream to the backend.
#[derive(Debug)]
pub enum Transport {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

/// Established connection over a raw socket.
///
/// Protocol framing and authentication exchanges live in the client layer
/// above; this type owns the transport and the credentials that layer needs.
#[derive(Debug)]
pub struct ObjDbConn {
    endpoint: Endpoint,
    credentials: Credentials,
    // Serializes writers; the backend multiplexes logical sessions itself.
    transport: Mutex<Transport>,
}

impl ObjDbConn {
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Exclusive access to the underlying transport for the protocol layer.
    pub async fn transport(&self) -> tokio::sync::MutexGuard<'_, Transport> {
        self.transport.lock().await
    }
}

impl BackendConn for ObjDbConn {
    fn describe(&self) -> String {
        format!("{}@{}", self.credentials.username, self.endpoint)
    }
}

/// Production [`ConnectionProvider`]: dials the endpoint exactly once.
pub struct NetDialer;

#[async_trait]
impl ConnectionProvider for NetDialer {
    async fn connect(
        &self,
        endpoint: &Endpoint,
        username: &str,
        password: &str,
    ) -> Result<SharedConn, AppError> {
        let transport = match endpoint {
            Endpoint::Tcp { host, port } => {
                let stream = TcpStream::connect((host.as_str(), *port))
                    .await
                    .map_err(|e| AppError::db(format!("failed to dial {endpoint}: {e}")))?;
                Transport::Tcp(stream)
            }
            #[cfg(unix)]
            Endpoint::Unix(path) => {
                let stream = UnixStream::connect(path)
                    .await
                    .map_err(|e| AppError::db(format!("failed to dial {endpoint}: {e}")))?;
                Transport::Unix(stream)
            }
            #[cfg(not(unix))]
            Endpoint::Unix(_) => {
                return Err(AppError::config(format!(
                    "local socket endpoint {endpoint} is not supported on this platform"
                )));
            }
        };

        info!(endpoint = %endpoint, username = %username, "database connection established");

        Ok(Arc::new(ObjDbConn {
            endpoint: endpoint.clone(),
            credentials: Credentials::new(username, password),
            transport: Mutex::new(transport),
        }))
    }
}
