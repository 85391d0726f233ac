use xxhash_rust::const_xxh3::xxh3_64 as const_xxh3_64;

pub const fn method_id_hash(name: &str) -> u64 {
    const_xxh3_64(name.as_bytes())
}

/// Compile-time RPC method ID generator using xxHash3.
///
/// The input is the fully qualified `"<Service>/<Method>"` name, the same
/// string a request path ends with, so servers can route on a hash of the
/// incoming path.
///
/// ## Example
///
/// ```rust,no_run
/// use protofetch_rpc_service::rpc_method_id;
/// let id_1 = rpc_method_id!("demo.Calculator/Add");
/// let id_2 = rpc_method_id!("demo.Calculator/Mult");
/// assert_ne!(id_1, id_2);
/// ```
#[macro_export]
macro_rules! rpc_method_id {
    ($name:expr) => {{
        const ID: u64 = $crate::method_id_hash($name);
        ID
    }};
}

/// Declares a service's method table at compile time.
///
/// Each entry becomes a unit type implementing [`RpcMethod`](crate::RpcMethod)
/// plus the marker trait for its call shape, and the whole table is exposed
/// as `METHODS` for code that needs to iterate it. Nothing about the
/// service is discovered at runtime.
///
/// ```rust,ignore
/// rpc_service! {
///     pub mod calculator = "demo.Calculator" {
///         unary Add(AddRequest) -> AddResponse;
///         server_streaming Count(CountRequest) -> CountResponse;
///     }
/// }
///
/// assert_eq!(calculator::METHODS.len(), 2);
/// assert!(<calculator::Count as RpcMethod>::DESCRIPTOR.server_streaming);
/// ```
#[macro_export]
macro_rules! rpc_service {
    (@streaming unary) => {
        false
    };
    (@streaming server_streaming) => {
        true
    };
    (@marker unary $method:ident) => {
        impl $crate::RpcUnaryMethod for $method {}
    };
    (@marker server_streaming $method:ident) => {
        impl $crate::RpcServerStreamingMethod for $method {}
    };
    (
        $(#[$service_meta:meta])*
        $vis:vis mod $module:ident = $service_name:literal {
            $(
                $(#[$method_meta:meta])*
                $kind:ident $method:ident ( $request:ty ) -> $response:ty ;
            )*
        }
    ) => {
        $(#[$service_meta])*
        $vis mod $module {
            #[allow(unused_imports)]
            use super::*;

            pub const SERVICE_NAME: &str = $service_name;

            $(
                $(#[$method_meta])*
                #[derive(Debug, Clone, Copy)]
                pub struct $method;

                impl $crate::RpcMethod for $method {
                    const DESCRIPTOR: $crate::RpcMethodDescriptor = $crate::RpcMethodDescriptor::new(
                        $service_name,
                        stringify!($method),
                        concat!($service_name, "/", stringify!($method)),
                        $crate::rpc_service!(@streaming $kind),
                    );

                    type Request = $request;
                    type Response = $response;
                }

                $crate::rpc_service!(@marker $kind $method);
            )*

            pub const METHODS: &[$crate::RpcMethodDescriptor] = &[
                $( <$method as $crate::RpcMethod>::DESCRIPTOR, )*
            ];
        }
    };
}
