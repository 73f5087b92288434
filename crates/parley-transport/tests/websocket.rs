//! Integration tests for the WebSocket client.
//!
//! These spin up a real `tokio-tungstenite` server on a random local port
//! and dial it with [`WebSocketConnector`], so bytes actually cross the
//! loopback interface.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use parley_transport::{Connection, Connector, WebSocketConnector};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio_tungstenite::tungstenite::Message;
    use tokio_tungstenite::tungstenite::handshake::server::{
        ErrorResponse, Request, Response,
    };

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener on a random port and returns it with its
    /// `http://` base URL (the connector maps it to `ws://`).
    async fn listen() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        (listener, format!("http://{addr}"))
    }

    /// Accepts one WebSocket client and reports the request URI it used.
    async fn accept_one(listener: TcpListener) -> (ServerWs, String) {
        let (stream, _) = listener.accept().await.expect("should accept");
        let (uri_tx, uri_rx) = oneshot::channel();
        let ws = tokio_tungstenite::accept_hdr_async(
            stream,
            move |req: &Request,
                  resp: Response|
                  -> Result<Response, ErrorResponse> {
                let _ = uri_tx.send(req.uri().to_string());
                Ok(resp)
            },
        )
        .await
        .expect("handshake should succeed");
        let uri = uri_rx.await.expect("callback should run");
        (ws, uri)
    }

    #[tokio::test]
    async fn test_connect_sends_query_and_receives_frames() {
        let (listener, base) = listen().await;
        let server = tokio::spawn(accept_one(listener));

        let connector = WebSocketConnector::new(&base).expect("valid url");
        let conn = connector
            .connect(&[("userId", "u1")])
            .await
            .expect("should connect");
        assert!(conn.id().into_inner() > 0);

        let (mut server_ws, uri) = server.await.expect("task should complete");
        assert_eq!(uri, "/?userId=u1");

        // Server pushes a text frame, client receives its bytes.
        server_ws
            .send(Message::Text(r#"{"event":"getOnlineUsers","data":[]}"#.into()))
            .await
            .unwrap();
        let received = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, br#"{"event":"getOnlineUsers","data":[]}"#);

        // Binary frames arrive as-is; pings are skipped.
        server_ws.send(Message::Ping(Vec::new().into())).await.unwrap();
        server_ws
            .send(Message::Binary(b"\x01\x02".to_vec().into()))
            .await
            .unwrap();
        let received = conn.recv().await.unwrap().expect("should have data");
        assert_eq!(received, b"\x01\x02");

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_server_closes() {
        let (listener, base) = listen().await;
        let server = tokio::spawn(accept_one(listener));

        let connector = WebSocketConnector::new(&base).unwrap();
        let conn = connector.connect(&[]).await.unwrap();
        let (mut server_ws, _) = server.await.unwrap();

        server_ws.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on server close");
    }

    #[tokio::test]
    async fn test_close_is_observed_by_server() {
        let (listener, base) = listen().await;
        let server = tokio::spawn(accept_one(listener));

        let connector = WebSocketConnector::new(&base).unwrap();
        let conn = connector.connect(&[("userId", "u9")]).await.unwrap();
        let (mut server_ws, _) = server.await.unwrap();

        conn.close().await.expect("close should succeed");

        let msg = server_ws.next().await;
        assert!(
            matches!(msg, Some(Ok(Message::Close(_))) | None),
            "server should see the close frame, got {msg:?}"
        );
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let (listener, base) = listen().await;
        drop(listener);

        let connector = WebSocketConnector::new(&base).unwrap();
        let result = connector.connect(&[("userId", "u1")]).await;
        assert!(result.is_err(), "nothing is listening");
    }
}
