
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle, with_thread, WriteMode};
use super::error::*;

///
/// Macros to write to the backing file logger.
///
pub use ::log::{trace as trace, debug as debug, info as info, warn as warn, error as error};

///
/// Initializes the logstream to write to the given directory, mirroring 
/// info-level records to stderr. The returned handle must be kept alive 
/// for the duration of the program so that buffered records get flushed.
///
pub fn initialize (path: & str, filename: & str) -> Result<LoggerHandle>
{
    let file_spec = FileSpec::default()
        .directory(path)
        .basename(filename)
        .use_timestamp(true)
        .suffix("log");

    let handle = Logger::try_with_str("info")?
        .log_to_file(file_spec)
        .write_mode(WriteMode::BufferAndFlush)
        .duplicate_to_stderr(Duplicate::Info)
        .format_for_files(with_thread)
        .start()?;

    Ok(handle)
}
