// Colored `file:line message` log lines for `env_logger`.
pub fn format_log(
  buf: &mut env_logger::fmt::Formatter,
  record: &log::Record,
) -> std::io::Result<()> {
  use std::io::Write;
  let mut style = buf.style();
  use env_logger::fmt::Color::*;
  use log::Level::*;
  style.set_color(match record.level() {
    Error => Red,
    Warn => Yellow,
    Info => Green,
    Debug => Magenta,
    Trace => Blue,
  });

  let location = format!("{}:{}",
    record.file().unwrap_or("?"),
    record.line().unwrap_or(0),
  );
  writeln!(buf, "{}", style.value(format!("{:30}{}", location, record.args())))
}

pub fn init_logging(verbose: bool) {
  let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
  // `try_init` so that repeated initialization, eg from tests, is harmless.
  let _ = env_logger::Builder::new()
    .filter_level(level)
    .format(format_log)
    .try_init();
}
