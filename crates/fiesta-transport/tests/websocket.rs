//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener on an OS-assigned port and talk to it
//! with a `tokio-tungstenite` client.

#[cfg(feature = "websocket")]
mod websocket {
    use fiesta_transport::{Connection, Transport, WebSocketTransport};
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    async fn connect_client(
        addr: &str,
    ) -> tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    > {
        let url = format!("ws://{addr}");
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    }

    #[tokio::test]
    async fn test_websocket_accept_and_send_receive() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound").to_string();

        let server_handle = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.expect("task should complete");
        assert!(server_conn.id().as_str().starts_with("conn-"));

        // Client → Server (text frame, as a browser would send JSON)
        client_ws
            .send(Message::Text(r#"{"event":"checkSession"}"#.into()))
            .await
            .expect("client send");
        let received = server_conn.recv().await.expect("recv ok");
        assert_eq!(
            received.as_deref(),
            Some(&br#"{"event":"checkSession"}"#[..])
        );

        // Server → Client goes out as a text frame
        server_conn
            .send(br#"{"event":"sessionNotFound"}"#)
            .await
            .expect("server send");
        match client_ws.next().await {
            Some(Ok(Message::Text(text))) => {
                assert_eq!(text.as_str(), r#"{"event":"sessionNotFound"}"#);
            }
            other => panic!("expected text frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_websocket_send_while_reader_is_waiting() {
        // A broadcast must not be blocked behind a pending recv().
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound").to_string();
        let server_handle =
            tokio::spawn(async move { transport.accept().await.unwrap() });
        let mut client_ws = connect_client(&addr).await;
        let conn = std::sync::Arc::new(server_handle.await.unwrap());

        let reader = {
            let conn = std::sync::Arc::clone(&conn);
            tokio::spawn(async move { conn.recv().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        tokio::time::timeout(
            std::time::Duration::from_secs(2),
            conn.send(b"{}"),
        )
        .await
        .expect("send should not wait for the reader")
        .expect("send ok");
        assert!(matches!(client_ws.next().await, Some(Ok(Message::Text(_)))));

        client_ws.close(None).await.expect("close");
        let end = reader.await.expect("reader task");
        assert!(matches!(end, Ok(None)));
    }

    #[tokio::test]
    async fn test_websocket_client_close_returns_none() {
        let mut transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("bound").to_string();
        let server_handle =
            tokio::spawn(async move { transport.accept().await.unwrap() });

        let mut client_ws = connect_client(&addr).await;
        let server_conn = server_handle.await.unwrap();

        client_ws.close(None).await.expect("close");
        let result = server_conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "clean close should return None");
    }
}
