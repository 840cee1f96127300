#![allow(dead_code)]

pub use rund_test_utils::builders::GraphBuilder;
pub use rund_test_utils::operators::{Event, EventLog, RecordingOperator};
pub use rund_test_utils::{init_tracing, with_timeout};
