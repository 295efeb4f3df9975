use azure_vnet_provision::config::Settings;
use azure_vnet_provision::{client_from_settings, preview_vnet, provision_vnet};
use clap::Parser;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default())?;
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let settings = Settings::parse();
    let params = settings.vnet_params();
    let client = client_from_settings(&settings)?;

    let xml = if settings.dry_run {
        preview_vnet(client.as_ref(), &params)?
    } else {
        provision_vnet(client.as_ref(), &params, &settings.config_file)?
    };
    println!("{xml}");

    log::info!("#End main()");
    Ok(())
}
