//! `meters` command: the full listing, or one type with `--type`.

use meterly_core::{MeterType, Portal};

use crate::cli::{GlobalOpts, MeterKind, MetersArgs};
use crate::error::CliError;
use crate::output;

impl From<MeterKind> for MeterType {
    fn from(kind: MeterKind) -> Self {
        match kind {
            MeterKind::Water => MeterType::Water,
            MeterKind::Electric => MeterType::Electric,
            MeterKind::Gas => MeterType::Gas,
        }
    }
}

pub async fn handle(portal: &Portal, args: MetersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let listing = match args.meter_type {
        Some(kind) => {
            let connected = portal.connect().await?;
            connected.meters_of_type(kind.into()).await?
        }
        None => portal.list_meters().await?,
    };

    tracing::debug!(count = listing.len(), "rendering meter listing");
    let out = output::render_listing(global.output, &listing)?;
    output::print_output(&out)
}
