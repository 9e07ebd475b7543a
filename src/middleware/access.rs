//! Remote-address allow-list middleware.

use super::Middleware;
use crate::context::Context;
use ipnet::IpNet;
use std::net::IpAddr;

/// Finishes requests with 403 unless the remote host falls inside one of the
/// configured CIDR ranges. A remote that cannot be parsed as an IP address is
/// rejected as well.
pub struct AccessIp {
    nets: Vec<IpNet>,
}

impl AccessIp {
    /// Build an allow-list from CIDR strings such as `10.0.0.0/8` or
    /// `127.0.0.1/32`.
    pub fn new(cidrs: &[&str]) -> Result<Self, ipnet::AddrParseError> {
        let nets = cidrs
            .iter()
            .map(|c| c.parse())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { nets })
    }
}

impl Middleware for AccessIp {
    fn handle(&self, ctx: &mut Context) {
        if let Ok(addr) = ctx.remote().parse::<IpAddr>() {
            if self.nets.iter().any(|net| net.contains(&addr)) {
                return;
            }
        }
        ctx.error(403);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_from(remote: &str) -> Context {
        let mut ctx = Context::default();
        ctx.request.remote_addr = remote.to_string();
        ctx
    }

    #[test]
    fn test_allows_listed_range() {
        let mw = AccessIp::new(&["127.0.0.1/32"]).unwrap();
        let mut ctx = ctx_from("127.0.0.1:44321");
        mw.handle(&mut ctx);
        assert!(!ctx.is_finished());
    }

    #[test]
    fn test_rejects_outside_range() {
        let mw = AccessIp::new(&["10.0.0.0/8"]).unwrap();
        let mut ctx = ctx_from("192.168.1.5:80");
        mw.handle(&mut ctx);
        assert_eq!(ctx.status(), 403);
    }

    #[test]
    fn test_rejects_unparseable_remote() {
        let mw = AccessIp::new(&["10.0.0.0/8"]).unwrap();
        let mut ctx = ctx_from("");
        mw.handle(&mut ctx);
        assert_eq!(ctx.status(), 403);
    }

    #[test]
    fn test_invalid_cidr_is_an_error() {
        assert!(AccessIp::new(&["not-a-cidr"]).is_err());
    }
}
