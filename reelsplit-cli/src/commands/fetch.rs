//! Implementation of the 'fetch' subcommand: acquisition only.

use super::{acquire_with_progress, print_video_summary};
use crate::cli::FetchArgs;
use crate::config::fetch_config;

use anyhow::Result;
use reelsplit_core::Session;

pub fn fetch(args: FetchArgs) -> Result<()> {
    let config = fetch_config(&args);
    let mut session = Session::from_config(args.source.url.clone(), config)?;
    acquire_with_progress(&mut session)?;
    print_video_summary(&session);
    Ok(())
}
