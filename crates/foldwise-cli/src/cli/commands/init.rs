use crate::cli::args::InitArgs;
use crate::exit_codes;

pub fn run(args: InitArgs) -> anyhow::Result<i32> {
    if args.config.exists() && !args.force {
        println!("Skipped {} (exists, use --force to overwrite)", args.config.display());
        return Ok(exit_codes::SUCCESS);
    }
    if let Err(e) = foldwise_core::config::write_sample_config(&args.config) {
        return Ok(super::report_error(&e));
    }
    println!("Created {}", args.config.display());
    Ok(exit_codes::SUCCESS)
}
