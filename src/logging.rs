// Logger setup. Logs go to stderr so panels printed on stdout stay readable.

use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Install the global `env_logger` once. `RUST_LOG` wins over the default
/// filter, which is `warn`, or `debug` when `verbose` is set.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let default_filter = if verbose { "debug" } else { "warn" };
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {} {} {}",
                buf.timestamp_millis(),
                record.level(),
                record.target(),
                record.args()
            )
        });
        builder.target(env_logger::Target::Stderr);
        let _ = builder.try_init();
    });
}
