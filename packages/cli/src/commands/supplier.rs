use anyhow::{Result, bail};

use crate::commands::{Ctx, remote_or};
use crate::output;

/// List the crops a supplier offers under their 3-digit code.
pub fn crops(ctx: &Ctx, code: &str, distributor: bool) -> Result<()> {
    let crops = remote_or(
        || {
            if distributor {
                ctx.api.crops_by_distributor(code)
            } else {
                ctx.api.crops_by_farmer(code)
            }
        },
        || {
            let store = ctx.open_store()?;
            if distributor {
                if store.find_distributor_by_code(code).is_none() {
                    bail!("Distributor not found");
                }
                Ok(store.crops_by_distributor_code(code))
            } else {
                if store.find_farmer_by_code(code).is_none() {
                    bail!("Farmer not found");
                }
                Ok(store.crops_by_farmer_code(code))
            }
        },
    )?;
    output::crop_list(&crops);
    Ok(())
}
