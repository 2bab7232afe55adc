// SPDX-License-Identifier: MIT

use super::*;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(1);

#[test]
fn encode_prefixes_payload_length_big_endian() {
    let framed = encode(&Request::Ping).unwrap();
    let payload_len = u32::from_be_bytes([framed[0], framed[1], framed[2], framed[3]]) as usize;
    assert_eq!(payload_len, framed.len() - 4);
    let decoded: Request = decode(&framed[4..]).unwrap();
    assert_eq!(decoded, Request::Ping);
}

#[tokio::test]
async fn request_roundtrips_over_a_stream() {
    let (mut client, mut server) = tokio::io::duplex(1024);

    let request = Request::SendInput { data: "y\r".to_string() };
    write_request(&mut client, &request, TIMEOUT).await.unwrap();
    let received = read_request(&mut server, TIMEOUT).await.unwrap();
    assert_eq!(received, request);

    write_response(&mut server, &Response::Ok, TIMEOUT).await.unwrap();
    let reply = read_response(&mut client, TIMEOUT).await.unwrap();
    assert_eq!(reply, Response::Ok);
}

#[tokio::test]
async fn closed_stream_reads_as_connection_closed() {
    let (client, mut server) = tokio::io::duplex(64);
    drop(client);
    let result = read_request(&mut server, TIMEOUT).await;
    assert!(matches!(result, Err(ProtocolError::ConnectionClosed)));
}

#[tokio::test]
async fn truncated_frame_reads_as_connection_closed() {
    let (mut client, mut server) = tokio::io::duplex(64);
    // Announce 100 bytes but deliver only 3.
    tokio::io::AsyncWriteExt::write_all(&mut client, &100u32.to_be_bytes()).await.unwrap();
    tokio::io::AsyncWriteExt::write_all(&mut client, b"abc").await.unwrap();
    drop(client);
    let result = read_request(&mut server, TIMEOUT).await;
    assert!(matches!(result, Err(ProtocolError::ConnectionClosed)));
}

#[tokio::test]
async fn silent_peer_reads_as_timeout() {
    let (_client, mut server) = tokio::io::duplex(64);
    let result = read_request(&mut server, Duration::from_millis(50)).await;
    assert!(matches!(result, Err(ProtocolError::Timeout)));
}

#[tokio::test]
async fn oversized_length_prefix_is_rejected() {
    let (mut client, mut server) = tokio::io::duplex(64);
    let huge = (MAX_MESSAGE_SIZE as u32 + 1).to_be_bytes();
    tokio::io::AsyncWriteExt::write_all(&mut client, &huge).await.unwrap();
    let result = read_request(&mut server, TIMEOUT).await;
    assert!(matches!(result, Err(ProtocolError::MessageTooLarge(_))));
}
