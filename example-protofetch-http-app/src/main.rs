use example_protofetch_http_server::{DemoHttpServer, utils::bind_tcp_listener_on_random_port};
use example_protofetch_rpc_service_definition::{
    AddRequest, CountRequest, CountResponse, MultRequest, calculator,
};
use futures::StreamExt;
use protofetch_http_client::{RpcHttpClient, RpcHttpClientConfig, TraceDebug};
use protofetch_rpc_service_caller::{
    RpcCallServerStreaming, RpcCallUnary, RpcCallerError, RpcServiceCaller, RpcStreamObserver,
};
use std::sync::Arc;
use tokio::join;
use tracing_subscriber::EnvFilter;

/// Prints each streamed message as it arrives.
struct PrintingObserver;

impl RpcStreamObserver<CountResponse> for PrintingObserver {
    fn on_message(&mut self, message: CountResponse) {
        println!("count() message #{} ({} bytes)", message.index, message.payload.len());
    }

    fn on_error(&mut self, error: RpcCallerError) {
        println!("count() failed: {}", error);
    }

    fn on_complete(&mut self) {
        println!("count() completed");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Bind to a random available port
    let (listener, addr) = bind_tcp_listener_on_random_port().await?;

    let server = DemoHttpServer::new();
    let _server_task = tokio::spawn({
        let server = server.clone();
        async move {
            let _ = server.serve_with_listener(listener).await;
        }
    });

    let config = RpcHttpClientConfig::default()
        .with_server_prefix(format!("http://{}", addr))
        .with_streaming_http_enabled(true)
        .with_trace_debug(TraceDebug::from_page_url(
            &std::env::var("PAGE_URL").unwrap_or_default(),
        ));

    let client = RpcHttpClient::new(config)?;

    let mut completions = client.completion_events().subscribe();
    tokio::spawn(async move {
        while let Some(method) = completions.next().await {
            tracing::info!(%method, "Call completed");
        }
    });

    let caller = RpcServiceCaller::with_process_context(Arc::new(client));

    // `join!` will await all responses before proceeding
    let (res1, res2, res3) = join!(
        calculator::Add::call(
            &caller,
            AddRequest {
                numbers: vec![1.0, 2.0, 3.0],
                ..Default::default()
            }
        ),
        calculator::Add::call(
            &caller,
            AddRequest {
                numbers: vec![8.0, 3.0, 7.0],
                ..Default::default()
            }
        ),
        calculator::Mult::call(
            &caller,
            MultRequest {
                numbers: vec![8.0, 3.0, 7.0],
                ..Default::default()
            }
        ),
    );

    println!("Result from first add(): {:?}", res1);
    println!("Result from second add(): {:?}", res2);
    println!("Result from first mult(): {:?}", res3);

    let outcome = calculator::Count::stream(
        &caller,
        CountRequest {
            count: 5,
            payload_len: 16,
            interval_ms: 100,
            ..Default::default()
        },
    )
    .observe(PrintingObserver)
    .await;

    println!("count() outcome: {:?}", outcome);
    println!("Server handled {} requests", server.request_count());

    Ok(())
}
