use dexstore::prelude::DsResult;
use dexstore::{cli, ds_detect};

fn main() -> DsResult<()> {
    let args = cli::detect().get_matches();
    ds_detect::run(&args)
}
