use crate::prelude::*;
use clap::ArgMatches;
use std::fs;

pub fn run(args: &ArgMatches) -> DsResult<()> {
    init_logger(args);

    let input = args
        .get_one::<String>("input")
        .ok_or_else(|| DsError::BadArguments("--input needed".to_string()))?;
    let output = args
        .get_one::<String>("output")
        .ok_or_else(|| DsError::BadArguments("--output needed".to_string()))?;

    let mode = detect_secondary_dex_mode(input, &layout_options(args))?;
    fs::create_dir_all(output)?;
    mode.unpackage(input, output)?;

    // printed so that it can be handed back to `repack --mode`
    println!("{}", mode.name());
    Ok(())
}
