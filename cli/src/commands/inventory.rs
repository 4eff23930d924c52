use richtask_core::api::CliError;

use crate::app::App;
use crate::commands::cli::InventoryArgs;

pub fn handle_inventory(app: &App, args: &InventoryArgs) -> Result<i32, CliError> {
    app.rich.inventory(&app.inventory, args.passwords)?;
    Ok(0)
}
