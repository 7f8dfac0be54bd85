use crate::prelude::*;
use clap::ArgMatches;
use nu_ansi_term::Color;

pub fn run(args: &ArgMatches) -> DsResult<()> {
    init_logger(args);

    let input = args
        .get_one::<String>("input")
        .ok_or_else(|| DsError::BadArguments("--input needed".to_string()))?;
    let mode = detect_secondary_dex_mode(input, &layout_options(args))?;
    println!("{}", Color::Green.paint(mode.name()));
    Ok(())
}
