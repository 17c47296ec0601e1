//! Error handling and exit codes.

use strassen_core::constants::exit_codes;
use strassen_core::MatmulError;

/// Exit code for a multiplication error.
pub fn handle_error(err: &MatmulError) -> i32 {
    match err {
        MatmulError::NotPowerOfTwo(_)
        | MatmulError::DimensionMismatch { .. }
        | MatmulError::MemoryLimit { .. }
        | MatmulError::Config(_) => exit_codes::ERROR_CONFIG,
        MatmulError::Mismatch { .. } => exit_codes::ERROR_MISMATCH,
        MatmulError::Allocation { .. } => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for any application error; anything that is not a
/// [`MatmulError`] is generic.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<MatmulError>())
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
