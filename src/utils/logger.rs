use colored::Colorize;
use env_logger::Builder;
use log::Level;
use std::io::Write;

/// Configure env_logger: Info for this crate (Debug with `verbose`), Warn
/// for dependencies. Logs go to stderr so the CSV on stdout stays clean.
pub fn setup_logging(verbose: bool) {
    use log::LevelFilter;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::from_default_env()
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let level_str = match record.level() {
                Level::Error => "ERROR".red(),
                Level::Warn => "WARN".yellow(),
                Level::Info => "INFO".normal(),
                Level::Debug => "DEBUG".dimmed(),
                Level::Trace => "TRACE".dimmed(),
            };
            writeln!(
                buf,
                "[{} {}] {}",
                name.cyan(),
                level_str,
                record.args()
            )
        })
        .init();
}
