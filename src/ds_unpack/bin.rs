use dexstore::prelude::DsResult;
use dexstore::{cli, ds_unpack};

fn main() -> DsResult<()> {
    let args = cli::unpack().get_matches();
    ds_unpack::run(&args)
}
