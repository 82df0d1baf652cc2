//! Network diagnostics. Most of these delegate to whichever system tool is installed.

use super::{ShellProxy, first_operand, report, run_tool};
use mysh_types::{Context, ExitStatus};
use std::net::{IpAddr, ToSocketAddrs};
use std::time::Duration;

const PING_COUNT: &str = "4";
const PUBLIC_IP_ENDPOINT: &str = "https://api.ipify.org";
const PUBLIC_IP_TIMEOUT: Duration = Duration::from_secs(10);
const TRACEROUTE_MISSING: &str = "traceroute not installed";
const NETSTAT_MISSING: &str = "No netstat or ss available.";

/// Prints a bare notice when none of the candidate tools is installed.
fn missing_tool(ctx: &Context, notice: &str) -> ExitStatus {
    let _ = ctx.write_stderr(notice);
    ExitStatus::ExitedWith(1)
}

/// Picks the first tool the proxy can resolve, in preference order.
fn first_available<'a, T>(
    proxy: &dyn ShellProxy,
    candidates: &'a [(&'a str, T)],
) -> Option<&'a (&'a str, T)> {
    candidates
        .iter()
        .find(|(tool, _)| proxy.lookup(tool).is_some())
}

fn argv_of(tool: &str, args: &[&str]) -> Vec<String> {
    std::iter::once(tool)
        .chain(args.iter().copied())
        .map(str::to_string)
        .collect()
}

pub fn ping(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let Some(host) = first_operand(ctx, &argv, "host") else {
        return ExitStatus::ExitedWith(2);
    };
    run_tool(ctx, proxy, "ping", argv_of("ping", &["-c", PING_COUNT, host]))
}

pub fn traceroute(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let Some(host) = first_operand(ctx, &argv, "host") else {
        return ExitStatus::ExitedWith(2);
    };
    match first_available(proxy, &[("traceroute", ()), ("tracepath", ())]) {
        Some((tool, _)) => run_tool(ctx, proxy, "traceroute", argv_of(tool, &[host])),
        None => missing_tool(ctx, TRACEROUTE_MISSING),
    }
}

pub fn netstat(ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    match first_available(proxy, &[("ss", "-tunap"), ("netstat", "-tulpn")]) {
        Some((tool, flags)) => run_tool(ctx, proxy, "netstat", argv_of(tool, &[*flags])),
        None => missing_tool(ctx, NETSTAT_MISSING),
    }
}

pub fn ifconfig(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let name = argv.first().map(String::as_str).unwrap_or("ifconfig");
    let tool_argv = if proxy.lookup("ip").is_some() {
        argv_of("ip", &["addr"])
    } else {
        argv_of("ifconfig", &[])
    };
    run_tool(ctx, proxy, name, tool_argv)
}

pub fn whois(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let Some(domain) = first_operand(ctx, &argv, "domain") else {
        return ExitStatus::ExitedWith(2);
    };
    run_tool(ctx, proxy, "whois", argv_of("whois", &[domain]))
}

/// Resolves a hostname, preferring an IPv4 address.
pub fn resolve(host: &str) -> std::io::Result<IpAddr> {
    let addrs: Vec<IpAddr> = (host, 0).to_socket_addrs()?.map(|a| a.ip()).collect();
    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no address associated")
        })
}

pub fn dnslookup(ctx: &Context, argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    let Some(host) = first_operand(ctx, &argv, "host") else {
        return ExitStatus::ExitedWith(2);
    };
    match resolve(host) {
        Ok(ip) => {
            let _ = ctx.write_stdout(&format!("{host} -> {ip}"));
            ExitStatus::ExitedWith(0)
        }
        Err(err) => report(ctx, "dnslookup", err),
    }
}

fn fetch_public_ip() -> anyhow::Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(PUBLIC_IP_TIMEOUT)
        .build()?;
    let body = client
        .get(PUBLIC_IP_ENDPOINT)
        .send()?
        .error_for_status()?
        .text()?;
    Ok(body.trim().to_string())
}

pub fn publicip(ctx: &Context, _argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    match fetch_public_ip() {
        Ok(ip) => {
            let _ = ctx.write_stdout(&format!("Public IP: {ip}"));
            ExitStatus::ExitedWith(0)
        }
        Err(err) => report(ctx, "publicip", err),
    }
}

pub fn hostinfo(ctx: &Context, _argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    let host = match nix::unistd::gethostname() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(err) => return report(ctx, "hostinfo", err),
    };
    match resolve(&host) {
        Ok(ip) => {
            let _ = ctx.write_stdout(&format!("Hostname: {host}"));
            let _ = ctx.write_stdout(&format!("Local IP: {ip}"));
            ExitStatus::ExitedWith(0)
        }
        Err(err) => report(ctx, "hostinfo", err),
    }
}
