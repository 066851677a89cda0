//! Shade ramp command.

use crate::cli::common::{output_json, parse_hex_arg, swatch, CliResult};
use crate::models::generate_shades;
use clap::Args;

/// Print the 50-950 shade ramp of a color
#[derive(Debug, Clone, Args)]
pub struct ShadesArgs {
    /// Base color (#RRGGBB)
    #[arg(value_name = "HEX")]
    pub hex: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ShadesArgs {
    /// Execute the shades command
    pub fn execute(&self) -> CliResult<()> {
        let base = parse_hex_arg(&self.hex)?.to_hex();
        let ramp = generate_shades(&base);

        if self.json {
            return output_json(&ramp);
        }

        println!("Shades of {base}");
        println!();
        for (stop, hex) in ramp.iter() {
            println!("  {:>3}  {}{hex}", stop.as_str(), swatch(hex));
        }
        Ok(())
    }
}
