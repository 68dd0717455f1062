use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Minimal HTTP server answering one canned JSON response per connection,
/// in order, and recording the JSON bodies it received.
pub struct MockServer {
  url: String,
  requests: Arc<Mutex<Vec<Value>>>,
}

impl MockServer {
  pub async fn start(responses: Vec<(u16, Value)>) -> Self {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));

    let seen = Arc::clone(&requests);
    tokio::spawn(async move {
      for (status, body) in responses {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_body(&mut socket).await;
        seen.lock().unwrap().push(request);

        let body = body.to_string();
        let reply = format!(
          "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
          status,
          body.len(),
          body
        );
        socket.write_all(reply.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
      }
    });

    Self { url, requests }
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  pub fn requests(&self) -> Vec<Value> {
    self.requests.lock().unwrap().clone()
  }
}

async fn read_body(socket: &mut TcpStream) -> Value {
  let mut buf = Vec::new();
  let mut chunk = [0u8; 4096];
  loop {
    let n = socket.read(&mut chunk).await.unwrap();
    if n == 0 {
      return Value::Null;
    }
    buf.extend_from_slice(&chunk[..n]);

    let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
      continue;
    };
    let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
    let length = head
      .lines()
      .find_map(|line| line.strip_prefix("content-length:"))
      .and_then(|value| value.trim().parse::<usize>().ok())
      .unwrap_or(0);
    let start = end + 4;
    if buf.len() >= start + length {
      return serde_json::from_slice(&buf[start..start + length]).unwrap_or(Value::Null);
    }
  }
}
