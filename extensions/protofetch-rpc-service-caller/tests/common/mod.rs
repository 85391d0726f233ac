#![allow(dead_code)]

use protofetch_rpc_service::RpcMethodDescriptor;
use protofetch_rpc_service_caller::{RpcCallerError, RpcTransport};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Handler =
    dyn Fn(&RpcMethodDescriptor, &[u8]) -> Result<Vec<Vec<u8>>, RpcCallerError> + Send + Sync;

/// A transport that answers every call from an in-memory handler.
pub struct MockTransport {
    handler: Box<Handler>,
    pub requests: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MockTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&RpcMethodDescriptor, &[u8]) -> Result<Vec<Vec<u8>>, RpcCallerError>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(vec![]),
        })
    }
}

#[async_trait::async_trait]
impl RpcTransport for MockTransport {
    async fn invoke(
        &self,
        method: &RpcMethodDescriptor,
        request: Vec<u8>,
        on_message: &mut (dyn FnMut(Vec<u8>) + Send),
    ) -> Result<(), RpcCallerError> {
        self.requests
            .lock()
            .unwrap()
            .push((method.full_name.to_string(), request.clone()));

        for message in (self.handler)(method, &request)? {
            on_message(message);
        }

        Ok(())
    }
}

/// Sets a flag when dropped, standing in for an aborted network request.
pub struct AbortGuard(pub Arc<AtomicBool>);

impl Drop for AbortGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// A transport that delivers `messages` and then never finishes.
pub struct HangingTransport {
    pub messages: Vec<Vec<u8>>,
    pub aborted: Arc<AtomicBool>,
    pub started: Arc<AtomicUsize>,
}

impl HangingTransport {
    pub fn new(messages: Vec<Vec<u8>>) -> Arc<Self> {
        Arc::new(Self {
            messages,
            aborted: Arc::new(AtomicBool::new(false)),
            started: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait::async_trait]
impl RpcTransport for HangingTransport {
    async fn invoke(
        &self,
        _method: &RpcMethodDescriptor,
        _request: Vec<u8>,
        on_message: &mut (dyn FnMut(Vec<u8>) + Send),
    ) -> Result<(), RpcCallerError> {
        let _guard = AbortGuard(Arc::clone(&self.aborted));
        self.started.fetch_add(1, Ordering::SeqCst);

        for message in &self.messages {
            on_message(message.clone());
        }

        futures::future::pending::<()>().await;
        Ok(())
    }
}
