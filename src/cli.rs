//! Main `dexstore` binary command line arguments options.
//!
//! This module declares functions to build `clap` command line arguments
//! parsers, so that they can be used from other places than the main binary,
//! such as from the standalone tools or the completion file generator.

use clap::{value_parser, Arg, ArgAction, Command};
use clap_complete::Shell;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

fn arg_debug() -> Arg {
    Arg::new("debug")
        .short('d')
        .long("debug")
        .action(ArgAction::SetTrue)
        .help("Activate debug mode")
}

fn arg_verbose() -> Arg {
    Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(ArgAction::SetTrue)
        .help("Activate verbose mode")
}

fn arg_ecslog() -> Arg {
    Arg::new("ecslog")
        .short('e')
        .long("ecslog")
        .action(ArgAction::SetTrue)
        .help("Output logs in ECS format")
}

fn arg_input() -> Arg {
    Arg::new("input")
        .short('i')
        .long("input")
        .action(ArgAction::Set)
        .required(true)
        .help("Extracted application directory")
}

fn arg_output() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .action(ArgAction::Set)
        .required(true)
        .help("Dex working directory")
}

fn layout_args() -> [Arg; 6] {
    [
        Arg::new("asset-dir")
            .long("asset-dir")
            .action(ArgAction::Set)
            .help("Secondary dex directory, relative to the application root"),
        Arg::new("store-name")
            .long("store-name")
            .action(ArgAction::Set)
            .help("Secondary dex store name"),
        Arg::new("dex-prefix")
            .long("dex-prefix")
            .action(ArgAction::Set)
            .help("Dex files name prefix"),
        Arg::new("canary-prefix")
            .long("canary-prefix")
            .action(ArgAction::Set)
            .help("Canary classes package prefix"),
        Arg::new("xz")
            .long("xz")
            .action(ArgAction::Set)
            .help("xz program to use"),
        Arg::new("xz-threads")
            .long("xz-threads")
            .action(ArgAction::Set)
            .value_parser(value_parser!(u32))
            .help("Threads hint given to xz"),
    ]
}

#[must_use]
pub fn dexstore() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author(AUTHORS)
        .about(DESCRIPTION)
        .subcommand(detect())
        .subcommand(repack())
        .subcommand(unpack())
        .subcommand(
            Command::new("gen-completions")
                .about("Generates completions file")
                .arg(
                    Arg::new("shell")
                        .short('s')
                        .long("shell")
                        .action(ArgAction::Set)
                        .value_parser(value_parser!(Shell))
                        .required(true)
                        .help("Shell type for completion generation"),
                ),
        )
}

#[must_use]
pub fn detect() -> Command {
    Command::new("detect")
        .bin_name("ds-detect")
        .version(VERSION)
        .author(AUTHORS)
        .about("Prints the secondary dex mode of an extracted application")
        .arg(arg_debug())
        .arg(arg_verbose())
        .arg(arg_ecslog())
        .arg(arg_input())
        .args(layout_args())
}

#[must_use]
pub fn unpack() -> Command {
    Command::new("unpack")
        .bin_name("ds-unpack")
        .version(VERSION)
        .author(AUTHORS)
        .about("Moves dexes out of an extracted application into a working directory")
        .arg(arg_debug())
        .arg(arg_verbose())
        .arg(arg_ecslog())
        .arg(arg_input())
        .arg(arg_output())
        .args(layout_args())
}

#[must_use]
pub fn repack() -> Command {
    Command::new("repack")
        .bin_name("ds-repack")
        .version(VERSION)
        .author(AUTHORS)
        .about("Moves dexes from a working directory back into an extracted application")
        .arg(arg_debug())
        .arg(arg_verbose())
        .arg(arg_ecslog())
        .arg(arg_input())
        .arg(arg_output())
        .args(layout_args())
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .action(ArgAction::Set)
                .value_parser(["xzs", "subdir", "api21"])
                .help("Secondary dex mode printed by unpack (detected if missing)"),
        )
        .arg(
            Arg::new("locators")
                .short('l')
                .long("locators")
                .action(ArgAction::SetTrue)
                .help("Declare class locators in dex metadata"),
        )
}
