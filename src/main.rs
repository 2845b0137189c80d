use crate::config::Settings;
use crate::convert::{Converter, Summary};
use crate::error::{Error, Result};
use crate::render::Renderer;
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod convert;
mod error;
mod lease;
mod parser;
mod render;

#[derive(clap::Parser, Debug)]
#[command(version, about = "dhcpd lease parser")]
struct Args {
    /// Source dhcpd leases file, usually under /var/lib/dhcp/dhcpd.leases
    #[arg(value_name = "LEASES_FILE")]
    leases: PathBuf,

    /// Destination hosts file
    #[arg(value_name = "HOSTS_FILE")]
    hosts: PathBuf,

    /// Destination table file
    #[arg(value_name = "TABLE_FILE")]
    table: PathBuf,

    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter such as "warn" or "debug", overrides the settings file
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();
    let settings = match &args.config {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let level = args.log_level.as_deref().unwrap_or(&settings.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args, &settings) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args, settings: &Settings) -> Result<Summary> {
    let leases = File::open(&args.leases).map_err(|source| Error::OpenLeases {
        path: args.leases.clone(),
        source,
    })?;
    let hosts = create_output(&args.hosts)?;
    let table = create_output(&args.table)?;

    let renderer = Renderer::new(&settings.domain)?;
    Converter::new(renderer, hosts, table).run(BufReader::new(leases))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|source| Error::CreateOutput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use indoc::indoc;
    use std::ffi::OsStr;

    fn args(leases: &Path, hosts: &Path, table: &Path) -> Args {
        Args::try_parse_from([
            OsStr::new("dhcpd-leasetab"),
            leases.as_os_str(),
            hosts.as_os_str(),
            table.as_os_str(),
        ])
        .unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn requires_exactly_three_paths() {
        assert!(Args::try_parse_from(["dhcpd-leasetab", "a", "b"]).is_err());
        assert!(Args::try_parse_from(["dhcpd-leasetab", "a", "b", "c", "d"]).is_err());
        assert!(Args::try_parse_from(["dhcpd-leasetab", "a", "b", "c"]).is_ok());
    }

    #[test]
    fn converts_files_and_truncates_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let leases = dir.path().join("dhcpd.leases");
        let hosts = dir.path().join("hosts");
        let table = dir.path().join("leases.html");
        std::fs::write(
            &leases,
            indoc! {r#"
                lease 192.168.1.20 {
                  starts 4 2024/03/07 10:00:00;
                  ends 4 2024/03/07 22:00:00;
                  hardware ethernet 52:54:00:12:34:56;
                  client-hostname "printer";
                }
            "#},
        )
        .unwrap();
        std::fs::write(&hosts, "stale contents that must disappear\n").unwrap();

        let summary = run(&args(&leases, &hosts, &table), &Settings::default()).unwrap();
        assert_eq!(summary.leases, 1);
        assert_eq!(
            std::fs::read_to_string(&hosts).unwrap(),
            "192.168.1.20 printer.local printer\n"
        );
        let report = std::fs::read_to_string(&table).unwrap();
        assert!(report.starts_with("<table border=\"1\">"));
        assert!(report.contains("<td>52:54:00:12:34:56</td>"));
        assert!(report.ends_with("</tbody></table>"));
    }

    #[test]
    fn missing_leases_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let leases = dir.path().join("missing.leases");
        let hosts = dir.path().join("hosts");
        let table = dir.path().join("leases.html");
        let err = run(&args(&leases, &hosts, &table), &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::OpenLeases { .. }));
        assert!(err.to_string().contains("missing.leases"));
        assert!(!hosts.exists());
    }

    #[test]
    fn unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let leases = dir.path().join("dhcpd.leases");
        std::fs::write(&leases, "").unwrap();
        let hosts = dir.path().join("no-such-dir").join("hosts");
        let table = dir.path().join("leases.html");
        let err = run(&args(&leases, &hosts, &table), &Settings::default()).unwrap_err();
        assert!(matches!(err, Error::CreateOutput { .. }));
        assert!(err.to_string().contains("no-such-dir"));
    }
}
