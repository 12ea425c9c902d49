use crate::error::{Error, Result};
use crate::services::Gateway;
use crate::web::api::routes;
use log::info;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct WebServer {
    gateway: Arc<Gateway>,
}

impl WebServer {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Binds `addr` and serves until `shutdown` resolves.
    ///
    /// Binding errors (port in use, address unavailable) are returned before
    /// any request is served.
    pub async fn start<S>(&self, addr: SocketAddr, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let (bound, server) = warp::serve(routes(self.gateway.clone()))
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .map_err(|e| Error::ServerError(format!("Failed to bind {}: {}", addr, e)))?;

        info!("Web server listening on {}", bound);
        server.await;
        info!("Web server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockUpstream;

    #[tokio::test]
    async fn test_port_in_use_is_startup_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let gateway = Arc::new(Gateway::new(Arc::new(MockUpstream::new()), Default::default()));
        let server = WebServer::new(gateway);
        let result = server.start(addr, async {}).await;

        assert!(matches!(result, Err(Error::ServerError(_))));
        drop(listener);
    }
}
