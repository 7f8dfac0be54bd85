use clap::ArgMatches;
use clap_complete::{generate, Shell};
use dexstore::prelude::*;
use dexstore::{cli, ds_detect, ds_repack, ds_unpack};
use std::io;

fn main() -> DsResult<()> {
    let args = cli::dexstore().get_matches();

    match &args.subcommand() {
        Some(("detect", cmd_args)) => ds_detect::run(cmd_args),
        Some(("repack", cmd_args)) => ds_repack::run(cmd_args),
        Some(("unpack", cmd_args)) => ds_unpack::run(cmd_args),
        Some(("gen-completions", sub_args)) => subcommand_gen_completions(sub_args),
        Some((subcommand, _)) => Err(DsError::BadArguments(format!(
            "unknown subcommand '{subcommand}'"
        ))),
        None => Err(DsError::BadArguments("missing subcommand".to_string())),
    }
}

fn subcommand_gen_completions(sub_args: &ArgMatches) -> DsResult<()> {
    let generator = *sub_args
        .get_one::<Shell>("shell")
        .ok_or_else(|| DsError::BadArguments("--shell needed".to_string()))?;
    let mut cmd = cli::dexstore();
    let cmd_name = cmd.get_name().to_string();
    generate(generator, &mut cmd, cmd_name, &mut io::stdout());
    Ok(())
}
