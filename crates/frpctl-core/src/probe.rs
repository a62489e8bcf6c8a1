//! Best-effort network diagnostics run around `add`.
//!
//! Neither probe can fail a command: the port check only feeds a warning,
//! and the certificate request is sent from a detached process whose
//! result is thrown away.

use std::ffi::OsStr;
use std::io;
use std::process::Stdio;
use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;

/// Default budget for the local port check.
pub const PORT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Default budget for the HTTPS handshake probe.
pub const HTTPS_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Whether something accepts TCP connections on `127.0.0.1:<port>`.
pub async fn local_port_reachable(port: u16, timeout: Duration) -> bool {
    match tokio::time::timeout(timeout, TcpStream::connect(("127.0.0.1", port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(e)) => {
            debug!(port, error = %e, "local port refused connection");
            false
        }
        Err(_) => {
            debug!(port, ?timeout, "local port probe timed out");
            false
        }
    }
}

/// Issue one HTTPS request to `https://<host>` so a TLS-terminating edge in
/// front of frps starts issuing a certificate. Returns whether any HTTP
/// response came back; callers are free to ignore it.
pub async fn send_certificate_request(host: &str, timeout: Duration) -> bool {
    let url = format!("https://{host}");
    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            debug!(error = %e, "could not build certificate request client");
            return false;
        }
    };
    match client.head(&url).send().await {
        Ok(resp) => {
            debug!(%url, status = %resp.status(), "certificate request answered");
            true
        }
        Err(e) => {
            debug!(%url, error = %e, "certificate request failed");
            false
        }
    }
}

/// Fire and forget: start `program args..` with all stdio closed and never
/// wait on it.
///
/// The child is a separate process, so it keeps running after the caller
/// exits. Nothing reports its outcome back.
#[allow(clippy::zombie_processes)]
pub fn spawn_detached<S: AsRef<OsStr>>(program: impl AsRef<OsStr>, args: &[S]) -> io::Result<u32> {
    let child = std::process::Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();
    debug!(pid, "spawned detached process");
    Ok(pid)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listening_port_is_reachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(local_port_reachable(port, PORT_PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn closed_port_is_not_reachable() {
        let port = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        assert!(!local_port_reachable(port, PORT_PROBE_TIMEOUT).await);
    }

    #[tokio::test]
    async fn certificate_request_reaches_listener() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
        let request = tokio::spawn(async move { send_certificate_request(&host, Duration::from_secs(2)).await });

        let accepted = tokio::time::timeout(Duration::from_secs(2), listener.accept()).await;
        assert!(matches!(accepted, Ok(Ok(_))), "no connection reached the listener");

        // plain TCP, so the TLS handshake fails and no response is reported
        drop(accepted);
        assert!(!request.await.unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn detached_child_outlives_the_spawn_call() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("done");
        let script = format!("sleep 0.3; touch '{}'", marker.display());

        spawn_detached("sh", &["-c", script.as_str()]).unwrap();
        assert!(!marker.exists(), "spawn waited for the child");

        for _ in 0..50 {
            if marker.exists() {
                break;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
        assert!(marker.exists(), "detached child never finished");
    }
}
