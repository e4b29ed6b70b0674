//! `seadkit list`

use super::load_archive;
use crate::config::ListArgs;
use crate::output::ArchiveListing;
use std::io::Write;

/// Print the archive's contents to `out`.
pub fn run(args: &ListArgs, out: &mut impl Write) -> anyhow::Result<ArchiveListing> {
    let archive = load_archive(&args.archive, args.zlib)?;
    let listing = ArchiveListing::new(&archive);
    listing.write_to(out, args.format)?;
    Ok(listing)
}
