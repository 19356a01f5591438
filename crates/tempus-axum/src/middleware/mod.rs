mod server_timing;

pub use server_timing::{
    ServerTimingLayer, ServerTimingService, server_timing_middleware,
    server_timing_middleware_with_config,
};
