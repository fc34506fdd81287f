use super::super::args::{Cli, Command};

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Verify(args) => super::verify::run(args),
        Command::Fingerprint(args) => super::fingerprint::run(args),
    }
}
