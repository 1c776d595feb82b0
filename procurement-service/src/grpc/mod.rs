//! gRPC module for procurement-service.

mod service;
mod trace_interceptor;

pub use service::ProcurementServiceImpl;
pub use trace_interceptor::trace_context_interceptor;

/// Generated protobuf code.
pub mod proto {
    tonic::include_proto!("backoffice.procurement.v1");

    pub const FILE_DESCRIPTOR_SET: &[u8] =
        tonic::include_file_descriptor_set!("procurement_descriptor");
}
