use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, trace};

use crate::error::{Error, Result};

/// Sends one request line to a server and returns everything it answers.
pub trait Transport {
    fn query(&self, server: &str, port: u16, request: &str) -> Result<Vec<u8>>;
}

/// RFC 3912 over TCP: one connection per request, the reply ends when the
/// server closes the connection.
#[derive(Debug, Clone, Default)]
pub struct TcpTransport {
    connect_timeout: Option<Duration>,
}

impl TcpTransport {
    pub fn new() -> Self {
        TcpTransport::default()
    }

    /// Bounds each connection attempt. Reads are never bounded.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    fn open_conn(&self, server: &str, port: u16) -> Result<TcpStream> {
        let timeout = match self.connect_timeout {
            Some(timeout) => timeout,
            None => return TcpStream::connect((server, port)).map_err(|e| Error::transport(server, e)),
        };

        let addrs = (server, port)
            .to_socket_addrs()
            .map_err(|e| Error::transport(server, e))?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    debug!("Connection to {} ({}) failed: {}", server, addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(Error::transport(
            server,
            last_err.unwrap_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, format!("No address found for {}", server))
            }),
        ))
    }
}

impl Transport for TcpTransport {
    fn query(&self, server: &str, port: u16, request: &str) -> Result<Vec<u8>> {
        let mut stream = self.open_conn(server, port)?;

        trace!("Sending {:?} to {}:{}", request, server, port);
        let mut line = String::with_capacity(request.len() + 2);
        line.push_str(request);
        line.push_str("\r\n");
        stream
            .write_all(line.as_bytes())
            .and_then(|_| stream.flush())
            .map_err(|e| Error::transport(server, e))?;

        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .map_err(|e| Error::transport(server, e))?;

        trace!("Received {} bytes from {}", buf.len(), server);
        Ok(buf)
    }
}

/// A text encoding tried when decoding a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseEncoding {
    Utf8,
    /// ISO-8859-1. Every byte maps to the code point of the same value.
    Latin1,
}

impl ResponseEncoding {
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            ResponseEncoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            ResponseEncoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

pub const DEFAULT_ENCODINGS: &[ResponseEncoding] = &[ResponseEncoding::Utf8, ResponseEncoding::Latin1];

/// Decodes with the first encoding that accepts `bytes`.
pub fn decode_response(bytes: &[u8], server: &str, encodings: &[ResponseEncoding]) -> Result<String> {
    encodings
        .iter()
        .find_map(|encoding| encoding.decode(bytes))
        .ok_or_else(|| Error::Decode { server: server.to_owned() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one connection: reads the request line, answers, closes.
    fn serve_once(reply: &'static [u8]) -> (u16, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = String::new();
            BufReader::new(&stream).read_line(&mut request).unwrap();
            stream.write_all(reply).unwrap();
            request
        });

        (port, handle)
    }

    #[test]
    fn test_tcp_query() {
        let (port, handle) = serve_once(b"Domain Name: EXAMPLE.COM\r\nrefer: whois.example.net\r\n");

        let bytes = TcpTransport::new().query("127.0.0.1", port, "=example.com").unwrap();

        assert_eq!(handle.join().unwrap(), "=example.com\r\n");
        assert_eq!(bytes, b"Domain Name: EXAMPLE.COM\r\nrefer: whois.example.net\r\n");
    }

    #[test]
    fn test_tcp_query_with_connect_timeout() {
        let (port, handle) = serve_once(b"ok");

        let transport = TcpTransport::new().with_connect_timeout(Duration::from_secs(5));
        let bytes = transport.query("127.0.0.1", port, "example.org").unwrap();

        assert_eq!(handle.join().unwrap(), "example.org\r\n");
        assert_eq!(bytes, b"ok");
    }

    #[test]
    fn test_tcp_query_connection_refused() {
        // Bind then drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();

        let err = TcpTransport::new().query("127.0.0.1", port, "example.org").unwrap_err();
        match err {
            Error::Transport { server, .. } => assert_eq!(server, "127.0.0.1"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_utf8() {
        let text = decode_response("Inhaber: Müller".as_bytes(), "whois.denic.de", DEFAULT_ENCODINGS).unwrap();
        assert_eq!(text, "Inhaber: Müller");
    }

    #[test]
    fn test_decode_latin1_fallback() {
        // 0xFC is 'ü' in ISO-8859-1 and not valid UTF-8 on its own.
        let bytes = b"Inhaber: M\xfcller";
        let text = decode_response(bytes, "whois.denic.de", DEFAULT_ENCODINGS).unwrap();
        assert_eq!(text, "Inhaber: Müller");
    }

    #[test]
    fn test_decode_error_names_server() {
        let err = decode_response(b"M\xfcller", "whois.example.net", &[ResponseEncoding::Utf8]).unwrap_err();
        match err {
            Error::Decode { server } => assert_eq!(server, "whois.example.net"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
