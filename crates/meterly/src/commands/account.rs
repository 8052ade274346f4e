//! `account` command: the backend's raw account details document.

use meterly_core::Portal;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(portal: &Portal, global: &GlobalOpts) -> Result<(), CliError> {
    let connected = portal.connect().await?;
    let details = connected.account_details().await?;

    let out = output::render_document(global.output, &details)?;
    output::print_output(&out)
}
