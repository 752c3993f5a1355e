//! Converts a headerless batch-task CSV (`batch_task.csv`) into simulator workflow
//! lines (`workflow.txt`), one `TASK` line per row.

use anyhow::Context;
use clap::Parser;

use iiot_analysis::{convert::batch::convert_file, utils::config::ConvertArgs};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = ConvertArgs::parse();

    let count = convert_file(&args.input, &args.output).with_context(|| {
        format!("converting {} to {}", args.input.display(), args.output.display())
    })?;

    println!("{} tasks written to {}", count, args.output.display());
    Ok(())
}
