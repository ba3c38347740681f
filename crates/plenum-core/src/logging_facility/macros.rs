//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use plenum_core::log_op_start;
/// log_op_start!("register_for_conference");
/// log_op_start!("register_for_conference", conference_key = "abc123");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = plenum_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = plenum_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use plenum_core::log_op_end;
/// log_op_end!("register_for_conference", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = plenum_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = plenum_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// # Example
///
/// ```ignore
/// # use plenum_core::{log_op_error, errors::ApiError};
/// let err = ApiError::ConferenceNotFound { conference_key: "abc".to_string() };
/// log_op_error!("get_conference", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ApiFault;
        let fault: ApiFault = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = plenum_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?fault.kind(),
            err.code = fault.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ApiFault;
        let fault: ApiFault = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = plenum_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?fault.kind(),
            err.code = fault.code(),
            $($field)*
        );
    }};
}
