use std::path::PathBuf;
use std::process::exit;

use clap::{Arg, ArgAction, Command};

use crate::disk_stat_diff::errors::Error;
use crate::disk_stat_diff::{run, Config};

mod disk_stat_diff;

fn main() {
    let mut command = Command::new("disk-stat-diff")
        .version("0.1.0")
        .about("Show how the I/O counters of a block device changed since the last call")
        .arg(Arg::new("dev-dir")
            .long("dev-dir")
            .help("Directory holding the device special files")
            .default_value("/dev")
            .value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("sysfs-dir")
            .long("sysfs-dir")
            .help("Mount point of sysfs")
            .default_value("/sys")
            .value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("store-dir")
            .long("store-dir")
            .help("Base directory for snapshots (default: system temp dir)")
            .long_help(
                "Snapshots are kept in <store-dir>/disk-stat-diff/<DEVICE>; \
                the modification time of that file is the time the snapshot was taken.")
            .value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("no-average")
            .long("no-average")
            .help("Do not print the per second average")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("debug")
            .short('d')
            .help("Enable debug output")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("DEVICE")
            .help("Device name, e.g. sda1")
            .long_help("Base name of the block device below the dev dir, e.g. sda1 (not /dev/sda1)"));
    let matches = command.get_matches_mut();

    let verbosity = if matches.get_flag("debug") {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    if let Err(e) = stderrlog::new()
        .verbosity(verbosity)
        .module(module_path!())
        .init() {
        eprintln!("unable to initialize logging: {}", e);
    }

    let device = match matches.get_one::<String>("DEVICE") {
        Some(device) => device,
        None => {
            println!("Provide a device name, e.g. `disk-stat-diff sda1`");
            println!("{}", command.render_usage());
            exit(1);
        }
    };

    let mut config = Config::new(device);
    if let Some(dir) = matches.get_one::<PathBuf>("dev-dir") {
        config.dev_dir = dir.clone();
    }
    if let Some(dir) = matches.get_one::<PathBuf>("sysfs-dir") {
        config.sysfs_dir = dir.clone();
    }
    if let Some(dir) = matches.get_one::<PathBuf>("store-dir") {
        config.store_dir = dir.clone();
    }
    config.averages = !matches.get_flag("no-average");
    log::debug!("{:?}", config);

    match run(&config) {
        Ok(()) => {}
        Err(e @ Error::Usage(_)) => {
            eprintln!("error: {}", e);
            eprintln!("{}", command.render_usage());
            exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            exit(2);
        }
    }
}
