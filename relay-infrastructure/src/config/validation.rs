use anyhow::{anyhow, Result};

pub fn validate_bind_addr(value: &str) -> Result<()> {
    value
        .parse::<std::net::SocketAddr>()
        .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
    Ok(())
}

pub fn require_positive(name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(anyhow!("{} must be greater than 0", name));
    }
    Ok(())
}
