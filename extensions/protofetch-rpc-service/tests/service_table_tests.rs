use protofetch_rpc_service::{
    RequestContext, RpcMessage, RpcMethod, RpcMethodDescriptor, WithRequestContext,
    rpc_method_id, rpc_service,
};
use std::io;

#[derive(Debug, Default, PartialEq)]
pub struct PingRequest {
    pub context: Option<RequestContext>,
    pub body: Vec<u8>,
}

impl RpcMessage for PingRequest {
    fn encode_message(&self) -> Result<Vec<u8>, io::Error> {
        Ok(self.body.clone())
    }

    fn decode_message(bytes: &[u8]) -> Result<Self, io::Error> {
        Ok(PingRequest {
            context: None,
            body: bytes.to_vec(),
        })
    }
}

impl WithRequestContext for PingRequest {
    fn request_context(&self) -> Option<&RequestContext> {
        self.context.as_ref()
    }

    fn set_request_context(&mut self, context: RequestContext) {
        self.context = Some(context);
    }
}

rpc_service! {
    /// A tiny table used only by these tests.
    pub mod pinger = "test.Pinger" {
        unary Ping(PingRequest) -> Vec<u8>;
        server_streaming PingMany(PingRequest) -> Vec<u8>;
    }
}

#[test]
fn table_lists_every_method_in_declaration_order() {
    let names: Vec<_> = pinger::METHODS.iter().map(|d| d.method).collect();
    assert_eq!(names, vec!["Ping", "PingMany"]);
    assert_eq!(pinger::SERVICE_NAME, "test.Pinger");
}

#[test]
fn descriptors_carry_streaming_flag_and_path() {
    let ping = <pinger::Ping as RpcMethod>::DESCRIPTOR;
    let many = <pinger::PingMany as RpcMethod>::DESCRIPTOR;

    assert!(!ping.server_streaming);
    assert!(many.server_streaming);
    assert_eq!(ping.full_name, "test.Pinger/Ping");
    assert_eq!(many.path(), "/rpc/test.Pinger/PingMany");
}

#[test]
fn method_ids_match_the_compile_time_hash() {
    assert_eq!(
        <pinger::Ping as RpcMethod>::DESCRIPTOR.method_id,
        rpc_method_id!("test.Pinger/Ping")
    );
    assert_ne!(
        <pinger::Ping as RpcMethod>::DESCRIPTOR.method_id,
        <pinger::PingMany as RpcMethod>::DESCRIPTOR.method_id
    );
}

#[test]
fn find_looks_up_by_method_name() {
    let found = RpcMethodDescriptor::find(pinger::METHODS, "PingMany").unwrap();
    assert!(found.server_streaming);
    assert!(RpcMethodDescriptor::find(pinger::METHODS, "Missing").is_none());
}

#[test]
fn provided_codec_functions_defer_to_messages() {
    let request = PingRequest {
        context: None,
        body: b"payload".to_vec(),
    };

    let bytes = pinger::Ping::encode_request(&request).unwrap();
    assert_eq!(bytes, b"payload");
    assert_eq!(pinger::Ping::decode_response(&bytes).unwrap(), b"payload");
}

#[test]
fn merge_fills_only_an_empty_context() {
    let shared = RequestContext::new(-60, "Europe/Berlin");
    let own = RequestContext::new(300, "America/New_York");

    let mut empty = PingRequest::default();
    assert!(empty.merge_request_context(&shared));
    assert_eq!(empty.context.as_ref(), Some(&shared));

    let mut preset = PingRequest {
        context: Some(own.clone()),
        body: vec![],
    };
    assert!(!preset.merge_request_context(&shared));
    assert_eq!(preset.context, Some(own));
}

#[test]
fn process_context_is_computed_once() {
    let a = RequestContext::process();
    let b = RequestContext::process();

    assert!(std::ptr::eq(a, b));
    assert!(!a.timezone.is_empty());
}

#[test]
fn context_fields_survive_bitcode() {
    let context = RequestContext::new(0, "UTC").with_field("region", "us-west1");

    let bytes = bitcode::encode(&context);
    let decoded: RequestContext = bitcode::decode(&bytes).unwrap();

    assert_eq!(decoded, context);
    assert_eq!(decoded.fields.get("region").map(String::as_str), Some("us-west1"));
}
