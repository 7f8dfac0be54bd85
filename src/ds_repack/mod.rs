use crate::prelude::*;
use clap::ArgMatches;

pub fn run(args: &ArgMatches) -> DsResult<()> {
    init_logger(args);

    let input = args
        .get_one::<String>("input")
        .ok_or_else(|| DsError::BadArguments("--input needed".to_string()))?;
    let output = args
        .get_one::<String>("output")
        .ok_or_else(|| DsError::BadArguments("--output needed".to_string()))?;

    let options = layout_options(args);
    let mode = match args.get_one::<String>("mode") {
        Some(name) => DexMode::from_name(name, &options)?,
        None => {
            log::warn!("no --mode given, detecting it from {input}");
            detect_secondary_dex_mode(input, &options)?
        }
    };
    mode.repackage(input, output, args.get_flag("locators"))?;
    Ok(())
}
