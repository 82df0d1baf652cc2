//! Sequential TCP connect sweep.

use super::{ShellProxy, report};
use mysh_types::{Context, ExitStatus, MyshError, MyshResult};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::ops::RangeInclusive;
use std::time::Duration;

/// Per-port connect timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(200);

const USAGE: &str = "usage: scan <host> <start> <end>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub host: String,
    pub ports: RangeInclusive<u16>,
}

/// Parses `scan <host> <start> <end>`. Returns `Ok(None)` when the arity is wrong.
pub fn parse_args(argv: &[String]) -> MyshResult<Option<ScanRequest>> {
    let [_, host, start, end] = argv else {
        return Ok(None);
    };
    let parse_port = |s: &str| {
        s.parse::<u16>()
            .ok()
            .filter(|port| *port > 0)
            .ok_or_else(|| MyshError::Parse(format!("invalid port: {s}")))
    };
    let start = parse_port(start.as_str())?;
    let end = parse_port(end.as_str())?;
    if start > end {
        return Err(MyshError::Parse(format!(
            "start port {start} is greater than end port {end}"
        )));
    }
    Ok(Some(ScanRequest {
        host: host.clone(),
        ports: start..=end,
    }))
}

/// Tries each port in order, one connection at a time. Connect failures are ignored.
pub fn scan_ports(
    addr: SocketAddr,
    ports: RangeInclusive<u16>,
    timeout: Duration,
    mut on_open: impl FnMut(u16),
) {
    for port in ports {
        let mut target = addr;
        target.set_port(port);
        if let Ok(stream) = TcpStream::connect_timeout(&target, timeout) {
            drop(stream);
            on_open(port);
        }
    }
}

fn resolve_target(host: &str) -> MyshResult<SocketAddr> {
    (host, 0)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| MyshError::Parse(format!("cannot resolve {host}")))
}

pub fn command(ctx: &Context, argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    let request = match parse_args(&argv) {
        Ok(Some(request)) => request,
        Ok(None) => {
            let _ = ctx.write_stderr(USAGE);
            return ExitStatus::ExitedWith(2);
        }
        Err(err) => return report(ctx, "scan", err),
    };

    let addr = match resolve_target(&request.host) {
        Ok(addr) => addr,
        Err(err) => return report(ctx, "scan", err),
    };

    scan_ports(addr, request.ports, CONNECT_TIMEOUT, |port| {
        let _ = ctx.write_stdout(&format!("OPEN: {port}"));
    });
    ExitStatus::ExitedWith(0)
}
