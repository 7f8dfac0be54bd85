use dexstore::prelude::DsResult;
use dexstore::{cli, ds_repack};

fn main() -> DsResult<()> {
    let args = cli::repack().get_matches();
    ds_repack::run(&args)
}
