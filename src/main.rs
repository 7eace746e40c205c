mod commands;
mod core;
mod release;
mod ui;

use crate::core::error::print_error;
use crate::release::plan::Level;
use clap::Parser;
use std::str::FromStr;

/// Cut, sign, and publish release candidates for git-hosted projects
#[derive(Parser)]
#[command(name = "relcut")]
#[command(version, about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Version component the next development cycle increments
  #[arg(
    short = 'l',
    long = "level",
    value_name = "LEVEL",
    default_value = "patch",
    value_parser = parse_level
  )]
  level: Level,

  /// Release candidate sequence number
  #[arg(short = 'r', long = "rc", value_name = "N", default_value_t = 0)]
  rc: u32,

  /// Release this version instead of the marker file contents
  #[arg(short = 'v', long = "set-version", value_name = "VERSION")]
  set_version: Option<String>,

  /// Publish to the distribution store and push the signed tag
  /// (default: dry run with local commits and artifacts only)
  #[arg(short = 'p', long = "publish")]
  publish: bool,

  /// Print the computed release plan as JSON and exit without mutating
  #[arg(long)]
  json: bool,

  /// The keyword `publish`, equivalent to --publish
  #[arg(value_name = "publish", value_parser = clap::builder::PossibleValuesParser::new(["publish"]))]
  mode: Option<String>,
}

fn parse_level(s: &str) -> Result<Level, String> {
  Level::from_str(s)
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Cyan))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  // Help and version exit 0; any usage error exits 1 like every other failure
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      let _ = err.print();
      std::process::exit(if err.use_stderr() { 1 } else { 0 });
    }
  };

  let publish = cli.publish || cli.mode.is_some();

  if let Err(err) = commands::run_cut(cli.level, cli.rc, cli.set_version, publish, cli.json) {
    print_error(&err);
    std::process::exit(1);
  }
}
