use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Minimal HTTP responder for reachability tests.
///
/// Counts accepted connections and can be told to drop the first few without
/// answering, so tests can script "ready on the kth attempt".
pub struct HttpStub {
    addr: SocketAddr,
    connections: Arc<AtomicUsize>,
}

impl HttpStub {
    /// Serve `status_line` to every connection.
    pub fn respond_all(status_line: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        Self::serve(listener, status_line, 0)
    }

    /// Drop the first `failures` connections without answering, then serve 200s.
    pub fn respond_after(failures: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
        Self::serve(listener, "HTTP/1.1 200 OK", failures)
    }

    /// Serve 200s on a specific local port (one previously reserved).
    pub fn serve_on(port: u16) -> Self {
        let listener =
            TcpListener::bind(("127.0.0.1", port)).expect("bind stub listener on reserved port");
        Self::serve(listener, "HTTP/1.1 200 OK", 0)
    }

    fn serve(listener: TcpListener, status_line: &'static str, failures: usize) -> Self {
        let addr = listener.local_addr().expect("stub listener addr");
        let connections = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&connections);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let accepted = seen.fetch_add(1, Ordering::SeqCst) + 1;
                if accepted <= failures {
                    // Close without answering; the client sees a dead connection.
                    drop(stream);
                    continue;
                }
                answer(stream, status_line);
            }
        });

        Self { addr, connections }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

fn answer(mut stream: TcpStream, status_line: &str) {
    let mut buf = [0u8; 1024];
    let _ = stream.read(&mut buf);
    let response = format!("{status_line}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
    let _ = stream.write_all(response.as_bytes());
}

/// A URL nothing is listening on.
pub fn refused_url() -> String {
    format!("http://127.0.0.1:{}", reserve_port())
}

/// Grab a free local port and release it for the caller to use.
pub fn reserve_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind for port reservation");
    let port = listener.local_addr().expect("reserved addr").port();
    drop(listener);
    port
}
