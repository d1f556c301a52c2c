//! Error macros for the pipeline

/// Macro for rejecting an input file
#[macro_export]
macro_rules! bail_input {
    ($path:expr, $reason:expr) => {
        return Err($crate::error::ArchiveError::invalid_input($path, $reason))
    };
}

/// Macro for mapping IO errors onto a target path
#[macro_export]
macro_rules! map_io_err {
    ($op:expr, $path:expr) => {
        |e| $crate::error::ArchiveError::io_operation($op, $path.display(), e)
    };
}
