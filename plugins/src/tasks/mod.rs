mod command;
mod echo;
mod fail;

pub use command::CommandTask;
pub use echo::EchoData;
pub use fail::Fail;
