//! real http path against a local listener

use dappio::{Client, ClientConfig, Error, ErrorKind, TokenInfo};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const ETH_RESPONSE: &str = r#"{"data":{"TokenInfos":{"timestamp":"1700000000","price":"3000.12","protocol":"uniswap","chainId":"1","mint":"0xabc","name":"Ether","decimals":"18","symbol":"ETH","logoURI":"https://x/eth.png"}}}"#;

/// requests seen by a [`serve`] listener
#[derive(Default)]
struct Seen {
    count: AtomicUsize,
    bodies: Mutex<Vec<String>>,
}

/// answer every connection with one canned http response
async fn serve(status: &'static str, body: &'static str) -> (SocketAddr, Arc<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Seen::default());
    let seen_task = seen.clone();

    tokio::spawn(async move {
        loop {
            let (mut stream, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let request_body = read_request(&mut stream).await;
            seen_task.count.fetch_add(1, Ordering::SeqCst);
            seen_task.bodies.lock().unwrap().push(request_body);

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    (addr, seen)
}

/// read one request and return its body
async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    assert!(headers.starts_with("post "), "unexpected request: {headers}");
    let length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .map(|value| value.trim().parse::<usize>().unwrap())
        .unwrap_or(0);

    while buf.len() < header_end + length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8(buf[header_end..header_end + length].to_vec()).unwrap()
}

fn client_for(addr: SocketAddr) -> Client {
    let config = ClientConfig::new(format!("http://{addr}/graphql"))
        .with_timeout(Duration::from_secs(10))
        .with_http_client_builder(|b| b.no_proxy());
    Client::new(config).unwrap()
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn fetch_token_info_over_http() {
    let (addr, seen) = serve("200 OK", ETH_RESPONSE).await;
    let client = client_for(addr);

    let info = client.fetch_token_info("ETH").await.unwrap();
    assert_eq!(
        info,
        TokenInfo {
            timestamp: "1700000000".to_string(),
            price: "3000.12".to_string(),
            protocol: "uniswap".to_string(),
            chain_id: "1".to_string(),
            mint: "0xabc".to_string(),
            name: "Ether".to_string(),
            decimals: "18".to_string(),
            symbol: "ETH".to_string(),
            logo_uri: "https://x/eth.png".to_string(),
        }
    );

    let bodies = seen.bodies.lock().unwrap();
    let body: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(body["variables"]["symbol"], "ETH");
    assert_eq!(body["query"], dappio::TOKEN_INFO_QUERY);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn each_call_hits_the_network() {
    let (addr, seen) = serve("200 OK", ETH_RESPONSE).await;
    let client = client_for(addr);

    client.fetch_token_info("ETH").await.unwrap();
    client.fetch_token_info("ETH").await.unwrap();

    assert_eq!(seen.count.load(Ordering::SeqCst), 2);
    let bodies = seen.bodies.lock().unwrap();
    assert_eq!(bodies[0], bodies[1]);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn graphql_errors_reject() {
    let (addr, seen) = serve("200 OK", r#"{"errors":[{"message":"unknown symbol"}]}"#).await;
    let client = client_for(addr);

    let err = client.fetch_token_info("NOPE").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Query);
    assert_eq!(err.graphql_errors()[0].message, "unknown symbol");
    assert_eq!(seen.count.load(Ordering::SeqCst), 1);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn non_success_status_rejects() {
    let (addr, _seen) = serve("503 Service Unavailable", "{}").await;
    let client = client_for(addr);

    let err = client.fetch_token_info("ETH").await.unwrap_err();
    assert!(matches!(
        err,
        Error::GraphQl {
            status: Some(503),
            ..
        }
    ));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn dropped_connection_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let accepted_task = accepted.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            accepted_task.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    let client = client_for(addr);
    let err = client.fetch_token_info("ETH").await.unwrap_err();

    assert!(err.is_transport(), "unexpected error: {err:?}");
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn refused_connection_is_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let client = client_for(addr);
    let err = client.fetch_token_info("ETH").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
    assert!(err.is_transport());
}

/// reply with headers promising more body than is ever sent
async fn serve_partial(hold: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let _ = read_request(&mut stream).await;
            let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 500\r\n\r\n";
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(&ETH_RESPONSE.as_bytes()[..40]).await;
            let _ = stream.flush().await;
            tokio::time::sleep(hold).await;
            drop(stream);
        }
    });

    addr
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn truncated_body_is_transport_error() {
    let addr = serve_partial(Duration::ZERO).await;
    let client = client_for(addr);

    let err = client.fetch_token_info("ETH").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)), "unexpected error: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn stalled_body_times_out_as_transport_error() {
    let addr = serve_partial(Duration::from_secs(5)).await;
    let config = ClientConfig::new(format!("http://{addr}/graphql"))
        .with_timeout(Duration::from_millis(300))
        .with_http_client_builder(|b| b.no_proxy());
    let client = Client::new(config).unwrap();

    let err = client.fetch_token_info("ETH").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)), "unexpected error: {err:?}");
    assert_eq!(err.kind(), ErrorKind::Transport);
}
