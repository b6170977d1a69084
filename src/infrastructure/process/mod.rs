pub mod command_executor;

pub use command_executor::{
    echo_lines,
    CommandExecutor,
    CommandExecutorError,
    CommandInvocation,
    ExecutionConfig,
    ProcessOutcome,
    ProcessRunner,
};
