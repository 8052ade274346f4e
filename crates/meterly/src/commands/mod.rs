//! Command dispatch.

pub mod account;
pub mod meters;

use meterly_core::Portal;

use crate::cli::{GlobalOpts, MetersArgs};
use crate::error::CliError;

/// A command that talks to the portals.
#[derive(Debug)]
pub enum PortalCommand {
    Meters(MetersArgs),
    Account,
}

/// Route a portal-backed command to its handler.
pub async fn dispatch(
    cmd: PortalCommand,
    portal: &Portal,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        PortalCommand::Meters(args) => meters::handle(portal, args, global).await,
        PortalCommand::Account => account::handle(portal, global).await,
    }
}
