//! `OperationClient` over a real socket pair: the peer must observe
//! end-of-file once the client closes or gives up on the connection.

#![cfg(unix)]

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::time::Duration;

use keywire_client::{ClientConfig, OperationClient, StreamTransport};
use keywire_core::wire::FIXED_HEADER_LEN;
use keywire_core::Request;

fn socket_client() -> (OperationClient<StreamTransport<UnixStream>>, UnixStream) {
    let (ours, peer) = UnixStream::pair().unwrap();
    ours.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    peer.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let client = OperationClient::new(StreamTransport::new(ours), ClientConfig::default()).unwrap();
    (client, peer)
}

#[test]
fn close_hangs_up_on_the_peer() {
    let (client, mut peer) = socket_client();
    client.close().unwrap();

    let mut buf = [0u8; 1];
    assert_eq!(peer.read(&mut buf).unwrap(), 0);
    assert!(client.ping().unwrap_err().is_transport());
}

#[test]
fn unreadable_response_hangs_up_on_the_peer() {
    let (client, mut peer) = socket_client();
    peer.write_all(&[0xff; FIXED_HEADER_LEN]).unwrap();

    assert!(client.ping().unwrap_err().is_transport());

    // The request arrived whole, then the stream ended.
    let mut received = Vec::new();
    peer.read_to_end(&mut received).unwrap();
    let request = Request::from_bytes(&received).unwrap();
    assert!(request.auth.is_empty());
}
