use clap::Parser;
use std::io::{self, BufWriter, Write};

use bincompare::compare::main_compare;
use bincompare::compare_opt::{Cli, CompareOpt, normalize_legacy_args};
use bincompare::error::{CompareError, EXIT_USAGE};

fn main() {
    let argv = normalize_legacy_args(std::env::args());
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { EXIT_USAGE } else { 0 });
        }
    };

    // Initialize logger based on verbosity level
    // Map verbosity (1=error, 2=warning, 3=message, 4=debug, 5+=trace)
    // to Rust log levels
    let log_level = match cli.verbosity {
        v if v <= 1 => log::LevelFilter::Error,
        2 => log::LevelFilter::Warn,
        3 => log::LevelFilter::Info,
        4 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None) // Don't show timestamps
        .format_target(false) // Don't show module names
        .init();

    let opt = match CompareOpt::from_cli(&cli) {
        Ok(opt) => opt,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    if opt.threads > 1 {
        // Cap at twice the core count to avoid accidental oversubscription
        let max_threads = num_cpus::get() * 2;
        let mut num_threads = opt.threads;
        if num_threads > max_threads {
            log::warn!(
                "Thread count {} exceeds recommended maximum {}, capping at {}",
                num_threads,
                max_threads,
                max_threads
            );
            num_threads = max_threads;
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            Ok(_) => log::debug!("Built global Rayon thread pool with {} threads", num_threads),
            Err(e) => log::warn!(
                "Failed to configure thread pool: {} (may already be initialized)",
                e
            ),
        }
        log::info!("Using {} threads", rayon::current_num_threads());
    }

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    let result = main_compare(&opt, &mut writer);
    let flushed = writer.flush();

    if let Err(e) = result {
        log::error!("{}", e);
        let code = e
            .downcast_ref::<CompareError>()
            .map(CompareError::exit_code)
            .unwrap_or(EXIT_USAGE);
        std::process::exit(code);
    }
    if let Err(e) = flushed {
        log::error!("Error writing results: {}", e);
        std::process::exit(CompareError::Output(e).exit_code());
    }
}
