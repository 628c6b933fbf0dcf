use itertools::Itertools;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use bgpkit_codec::models::*;
use bgpkit_codec::{BgpMessage, ParserError};
use clap::Parser;
use log::debug;

/// bgpkit-codec decodes hex-encoded BGP messages, one per line.
///
/// Failures are printed as the NOTIFICATION a BGP speaker would send back.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// File with one hex-encoded message per line. Reads stdin if omitted.
    #[clap(name = "FILE")]
    file_path: Option<PathBuf>,

    /// Decode AS numbers in AS_PATH and AGGREGATOR as 4 octets
    #[clap(short = '4', long)]
    four_octet_as: bool,

    /// Do not require the header marker to be all ones
    #[clap(long)]
    skip_marker_check: bool,

    /// Output as JSON objects
    #[clap(long)]
    json: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pretty: bool,
}

fn summary(msg: &BgpMessage) -> String {
    match msg {
        BgpMessage::Open(open) => format!(
            "OPEN|{}|{}|{}|{}|{}",
            open.version,
            open.four_octet_asn().unwrap_or(open.asn),
            open.hold_time,
            open.bgp_identifier,
            open.capabilities()
                .map(|caps| caps.iter().map(|c| c.code).join(" "))
                .unwrap_or_default(),
        ),
        BgpMessage::Update(update) => format!(
            "UPDATE|{}|{}|{}|{}|{}|{}",
            update.withdrawn_prefixes.iter().join(" "),
            update.announced_prefixes.iter().join(" "),
            update
                .attributes
                .as_path()
                .map(|p| p.to_string())
                .unwrap_or_default(),
            update
                .attributes
                .origin()
                .map(|o| o.to_string())
                .unwrap_or_default(),
            update
                .attributes
                .next_hop()
                .map(|n| n.to_string())
                .unwrap_or_default(),
            update
                .attributes
                .communities()
                .map(|c| c.iter().join(" "))
                .unwrap_or_default(),
        ),
        BgpMessage::Notification(n) => {
            format!("NOTIFICATION|{}|{}", n.error, hex::encode(&n.data))
        }
        BgpMessage::KeepAlive(_) => "KEEPALIVE".to_string(),
    }
}

fn error_output(err: &ParserError, as_json: bool) -> String {
    let notification = err.to_notification();
    if as_json {
        json!({
            "error": err.to_string(),
            "notification": notification,
        })
        .to_string()
    } else {
        format!(
            "ERROR|{}|{}|{}",
            notification.error,
            hex::encode(&notification.data),
            err
        )
    }
}

fn main() {
    let opts: Opts = Opts::parse();

    env_logger::init();

    let ctx = BgpContext {
        asn_len: match opts.four_octet_as {
            true => AsnLength::Bits32,
            false => AsnLength::Bits16,
        },
        check_marker: !opts.skip_marker_check,
    };

    let reader: Box<dyn BufRead> = match &opts.file_path {
        Some(path) => match std::fs::File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!("cannot open {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut stdout = std::io::stdout();
    for (index, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        };
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let data = match hex::decode(line.replace(' ', "")) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("line {}: invalid hex: {}", index + 1, e);
                continue;
            }
        };
        debug!("line {}: {} bytes", index + 1, data.len());

        let output_str = match BgpMessage::from_bytes(&data, &ctx) {
            Ok(msg) if opts.json => {
                let val = json!(msg);
                if opts.pretty {
                    serde_json::to_string_pretty(&val).unwrap_or_default()
                } else {
                    val.to_string()
                }
            }
            Ok(msg) => summary(&msg),
            Err(err) => error_output(&err, opts.json),
        };
        if let Err(e) = writeln!(stdout, "{}", &output_str) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("{}", e);
            }
            std::process::exit(1);
        }
    }
}
