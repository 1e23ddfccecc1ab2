extern crate atomspec as lib;

use lib::configuration::AtomSpecConfiguration;
use lib::species;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("atomspec=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> lib::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => AtomSpecConfiguration::from_yaml_file(path)?,
        None => AtomSpecConfiguration::default(),
    };

    let rb = species::rubidium87()?;
    println!("{}", rb.transitions());

    let d2 = rb.transitions().find("2S1/2:2P3/2")?;
    let magic = d2.magic_wavelength(790e-9, None, None, &config.root_finding)?;
    info!(transition = %d2, "magic wavelength {:.3} nm", magic * 1e9);

    let sr = species::strontium88()?;
    println!("{}", sr.transitions());
    println!("{}", sr.to_json()?);
    Ok(())
}
