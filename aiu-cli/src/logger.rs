use std::io::Write;

/// Route the library crates' `log` output to stderr.
///
/// Default level is `warn` (row errors and duplicate barcodes); `--verbose`
/// raises our crates to `debug`. A set `RUST_LOG` takes over completely.
pub fn init_logger(verbose: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        let _ = env_logger::try_init();
        return;
    }

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log::LevelFilter::Warn)
        .format(|buf, record| {
            if record.level() <= log::Level::Warn {
                writeln!(buf, "[{}] {}", record.level(), record.args())
            } else {
                writeln!(buf, "{}", record.args())
            }
        });

    if verbose {
        for module in ["aiu_core", "aiu_aspace", "aiu_reconcile"] {
            builder.filter_module(module, log::LevelFilter::Debug);
        }
        builder.filter_module("ureq", log::LevelFilter::Info);
    }

    let _ = builder.try_init();
}
