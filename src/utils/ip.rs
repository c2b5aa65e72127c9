//! 客户端地址解析
//!
//! 访问记录里的 ip 取自这里。连接来自可信代理时读取转发头，
//! 否则直接使用连接地址。

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::debug;

/// 私有、回环或链路本地地址
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
        IpAddr::V6(v6) => {
            let head = v6.segments()[0];
            v6.is_loopback()
                || (head & 0xfe00) == 0xfc00 // fc00::/7
                || (head & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}

/// 解析 `ip` 或 `ip:port`
pub fn parse_ip(raw: &str) -> Option<IpAddr> {
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|s| s.ip()))
}

/// `entry` 可以是单个地址或 CIDR
fn proxy_entry_matches(addr: &IpAddr, entry: &str) -> bool {
    match entry.split_once('/') {
        Some((network, prefix)) => {
            match (network.parse::<IpAddr>(), prefix.parse::<u32>()) {
                (Ok(network), Ok(prefix)) => in_network(addr, &network, prefix),
                _ => false,
            }
        }
        None => entry.parse::<IpAddr>().is_ok_and(|proxy| proxy == *addr),
    }
}

fn in_network(addr: &IpAddr, network: &IpAddr, prefix: u32) -> bool {
    match (addr, network) {
        (IpAddr::V4(a), IpAddr::V4(n)) if prefix <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
            u32::from(*a) & mask == u32::from(*n) & mask
        }
        (IpAddr::V6(a), IpAddr::V6(n)) if prefix <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix).unwrap_or(0);
            u128::from(*a) & mask == u128::from(*n) & mask
        }
        _ => false,
    }
}

/// 连接地址是否在配置的代理列表里
pub fn is_trusted_proxy(peer: &str, trusted_proxies: &[String]) -> bool {
    parse_ip(peer).is_some_and(|addr| {
        trusted_proxies
            .iter()
            .any(|entry| proxy_entry_matches(&addr, entry.trim()))
    })
}

/// 第一个 X-Forwarded-For 地址，其次 X-Real-IP
pub fn forwarded_client_ip(headers: &HeaderMap) -> Option<String> {
    let first_forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    first_forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        })
        .map(String::from)
}

/// 决定记录哪个客户端地址
///
/// - 配置了 `trusted_proxies`：只有列表内的连接才读取转发头
/// - 未配置：来自私有地址的连接视为反向代理
/// - 其余情况使用连接地址，转发头可被伪造
pub fn resolve_client_ip<F>(
    peer: Option<&str>,
    trusted_proxies: &[String],
    forwarded: F,
) -> Option<String>
where
    F: FnOnce() -> Option<String>,
{
    let peer = peer?;

    let behind_proxy = if trusted_proxies.is_empty() {
        parse_ip(peer).is_some_and(|addr| is_private_or_local(&addr))
    } else {
        is_trusted_proxy(peer, trusted_proxies)
    };

    if behind_proxy && let Some(client) = forwarded() {
        debug!("Client {} forwarded by proxy {}", client, peer);
        return Some(client);
    }
    Some(peer.to_string())
}

/// 从 actix 请求中提取客户端地址
pub fn extract_client_ip(req: &HttpRequest, trusted_proxies: &[String]) -> Option<String> {
    let conn = req.connection_info();
    resolve_client_ip(conn.peer_addr(), trusted_proxies, || {
        forwarded_client_ip(req.headers())
    })
}
